//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the shared resources the
//! binary hands to [`GeoLiteService`](crate::GeoLiteService):
//! - Logger (plain or JSON output)
//! - HTTP client

mod client;
mod logger;

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;
