//! Service configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, size limits, file names)
//! - The [`GeoLiteConfig`] struct and its environment loader
//! - CLI option types and parsing

mod cli;
mod constants;
mod types;

// Re-export all constants
pub use cli::{Command, Opt};
pub use constants::*;
pub use types::{GeoLiteConfig, LogFormat, LogLevel};
