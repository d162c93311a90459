//! Configuration types.
//!
//! This module defines the service configuration and the logging enums shared
//! with the command-line interface.

use std::path::PathBuf;

use clap::ValueEnum;
use url::form_urlencoded;

use crate::config::constants::{
    DEFAULT_DB_PATH, GEOLITE_DB_PATH_ENV, GEOLITE_DB_URL_ENV, LICENSE_KEY_PLACEHOLDER,
    LOCAL_IPV6_RANGES_ENV, MAXMIND_GEOLITE_CITY_URL, MAXMIND_LICENSE_KEY_ENV, MAX_EXTRACT_SIZE,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Service configuration (no CLI dependencies).
///
/// # Examples
///
/// ```
/// use geolite_service::GeoLiteConfig;
/// use std::path::PathBuf;
///
/// let config = GeoLiteConfig {
///     db_path: PathBuf::from("/var/lib/geolite/GeoLite2-City.mmdb"),
///     local_ipv6_ranges: "fd00::/8".to_string(),
///     ..Default::default()
/// };
/// assert!(config.uses_default_url());
/// ```
#[derive(Debug, Clone)]
pub struct GeoLiteConfig {
    /// MaxMind license key (may be empty)
    pub license_key: String,

    /// Download URL template; `%s` receives the license key
    pub db_url: String,

    /// Location of the installed database file
    pub db_path: PathBuf,

    /// Comma-separated IPv6 CIDR blocks treated as the local network
    pub local_ipv6_ranges: String,

    /// Ceiling for decompressed bytes extracted from one archive
    pub max_extract_bytes: u64,
}

impl Default for GeoLiteConfig {
    fn default() -> Self {
        Self {
            license_key: String::new(),
            db_url: MAXMIND_GEOLITE_CITY_URL.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            local_ipv6_ranges: String::new(),
            max_extract_bytes: MAX_EXTRACT_SIZE,
        }
    }
}

impl GeoLiteConfig {
    /// Builds the configuration from process environment variables.
    ///
    /// Unset variables keep their defaults. An empty `GEOLITE_DB_URL` or
    /// `GEOLITE_DB_PATH` is treated as unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        Self {
            license_key: lookup(MAXMIND_LICENSE_KEY_ENV).unwrap_or(defaults.license_key),
            db_url: non_empty(GEOLITE_DB_URL_ENV).unwrap_or(defaults.db_url),
            db_path: non_empty(GEOLITE_DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            local_ipv6_ranges: lookup(LOCAL_IPV6_RANGES_ENV).unwrap_or(defaults.local_ipv6_ranges),
            max_extract_bytes: defaults.max_extract_bytes,
        }
    }

    /// Returns the download URL with the URL-encoded license key substituted.
    pub fn download_url(&self) -> String {
        // URL-encode the license key to handle special characters
        let encoded_key =
            form_urlencoded::byte_serialize(self.license_key.as_bytes()).collect::<String>();
        self.db_url.replacen(LICENSE_KEY_PLACEHOLDER, &encoded_key, 1)
    }

    /// Whether the URL template is the stock MaxMind one (which needs a license key).
    pub fn uses_default_url(&self) -> bool {
        self.db_url == MAXMIND_GEOLITE_CITY_URL
    }
}
