//! Command-line options.
//!
//! Every service setting can be given as a flag or through its environment
//! variable (a `.env` file is honoured by the binary).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::constants::{
    DEFAULT_DB_PATH, GEOLITE_DB_PATH_ENV, GEOLITE_DB_URL_ENV, LOCAL_IPV6_RANGES_ENV,
    MAXMIND_GEOLITE_CITY_URL, MAXMIND_LICENSE_KEY_ENV,
};
use crate::config::types::{GeoLiteConfig, LogFormat, LogLevel};

/// Top-level command-line options.
#[derive(Debug, Parser)]
#[command(
    name = "geolite_service",
    version,
    about = "Keeps a local GeoLite2 City database fresh and looks up IP locations"
)]
pub struct Opt {
    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain, global = true)]
    pub log_format: LogFormat,

    /// Location of the installed database file
    #[arg(long, env = GEOLITE_DB_PATH_ENV, default_value = DEFAULT_DB_PATH, global = true)]
    pub db_path: PathBuf,

    /// MaxMind license key
    #[arg(long, env = MAXMIND_LICENSE_KEY_ENV, default_value = "", hide_env_values = true, global = true)]
    pub license_key: String,

    /// Download URL template (`%s` receives the license key)
    #[arg(long, env = GEOLITE_DB_URL_ENV, default_value = MAXMIND_GEOLITE_CITY_URL, global = true)]
    pub db_url: String,

    /// Comma-separated IPv6 CIDR blocks treated as the local network
    #[arg(long, env = LOCAL_IPV6_RANGES_ENV, default_value = "", global = true)]
    pub local_ipv6_ranges: String,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands of the `geolite_service` binary.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up the country and city of one or more IP addresses
    Lookup {
        /// IP addresses to look up
        #[arg(required = true)]
        ips: Vec<String>,
    },
    /// Download and install a fresh database if the installed one is stale
    Update,
    /// Show the installed database and updater state
    Status,
}

impl Opt {
    /// Converts the parsed options into the service configuration.
    pub fn geolite_config(&self) -> GeoLiteConfig {
        GeoLiteConfig {
            license_key: self.license_key.clone(),
            db_url: self.db_url.clone(),
            db_path: self.db_path.clone(),
            local_ipv6_ranges: self.local_ipv6_ranges.clone(),
            ..Default::default()
        }
    }
}
