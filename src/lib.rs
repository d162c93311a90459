//! geolite_service library: IP geolocation backed by a self-updating GeoLite2 City database
//!
//! This library answers "which country and city is this IP address in?" from a
//! local MaxMind GeoLite2 City database, labels internal addresses (LAN,
//! Tailscale, localhost) without touching the database, and keeps the database
//! fresh by downloading, validating and atomically installing new releases.
//!
//! # Example
//!
//! ```no_run
//! use geolite_service::{initialization::init_client, GeoLiteConfig, GeoLiteService};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = GeoLiteService::new(GeoLiteConfig::from_env(), init_client()?);
//!
//! if !service.updater_disabled() {
//!     service.update_database(&CancellationToken::new()).await?;
//! }
//!
//! let location = service.lookup("8.8.8.8")?;
//! println!("{} / {}", location.country, location.city);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! [`GeoLiteService::update_database`] requires a Tokio runtime. Lookups are
//! blocking and can be called from any thread.

#![warn(missing_docs)]

pub mod config;
mod error_handling;
mod geoip;
pub mod initialization;

// Re-export public API
pub use config::{GeoLiteConfig, LogFormat, LogLevel};
pub use error_handling::{ConfigError, DecodeError, GeoLiteError, InitializationError};
pub use geoip::{
    DatabaseRecord, GeoDatabase, GeoDecoder, GeoLiteService, LocalRanges, Location,
    MaxMindDecoder, INTERNAL_NETWORK, LAN, LOCALHOST, TAILSCALE,
};
