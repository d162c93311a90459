//! Error handling.
//!
//! Every failure mode of the service is a variant of a `thiserror` enum:
//! - [`GeoLiteError`] for lookups and the update pipeline
//! - [`DecodeError`] for database decoders
//! - [`ConfigError`] for unusable configuration values
//! - [`InitializationError`] for logger and HTTP client setup

mod types;

// Re-export public API
pub use types::{ConfigError, DecodeError, GeoLiteError, InitializationError};
