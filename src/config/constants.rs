//! Configuration constants.
//!
//! This module defines the constants used throughout the service,
//! including timeouts, size limits, file names and environment variable names.

use std::time::Duration;

/// Default download URL template for the GeoLite2 City archive.
///
/// `%s` is replaced with the URL-encoded license key.
pub const MAXMIND_GEOLITE_CITY_URL: &str =
    "https://download.maxmind.com/app/geoip_download?edition_id=GeoLite2-City&license_key=%s&suffix=tar.gz";

/// Placeholder in the URL template that receives the license key
pub const LICENSE_KEY_PLACEHOLDER: &str = "%s";

/// Default location of the installed database file
pub const DEFAULT_DB_PATH: &str = "data/GeoLite2-City.mmdb";

/// Base name of the database file inside the downloaded archive (case-sensitive)
pub const GEOLITE_DB_FILENAME: &str = "GeoLite2-City.mmdb";

// Update pipeline limits
/// Databases younger than this are not re-downloaded (14 days)
pub const DATABASE_MAX_AGE: Duration = Duration::from_secs(14 * 24 * 60 * 60);
/// Upper bound for the whole download, headers and body (10 minutes)
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(10 * 60);
/// Maximum total decompressed size extracted from one archive (300 MiB)
/// Protects against decompression bombs
pub const MAX_EXTRACT_SIZE: u64 = 300 * 1024 * 1024;
/// Maximum number of tar entries examined before the archive is rejected
/// Zero-sized entries make no decompression progress, so the byte ceiling alone
/// does not bound iteration
pub const MAX_ARCHIVE_ENTRIES: usize = 10_000;
/// Buffer size used when streaming an archive entry into the staging file
pub const COPY_BUFFER_SIZE: usize = 64 * 1024;

// Staging files live next to the database so the final rename stays on one filesystem
/// Name prefix of staging files
pub const STAGING_FILE_PREFIX: &str = "geolite.";
/// Name suffix of staging files
pub const STAGING_FILE_SUFFIX: &str = ".mmdb.tmp";

// HTTP client
/// TCP connect timeout for the shared HTTP client
pub const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
/// User-Agent sent with download requests
pub const USER_AGENT: &str = concat!("geolite_service/", env!("CARGO_PKG_VERSION"));

// Environment variables
/// Environment variable name for the MaxMind license key
pub const MAXMIND_LICENSE_KEY_ENV: &str = "MAXMIND_LICENSE_KEY";
/// Environment variable name for the download URL template
pub const GEOLITE_DB_URL_ENV: &str = "GEOLITE_DB_URL";
/// Environment variable name for the database file path
pub const GEOLITE_DB_PATH_ENV: &str = "GEOLITE_DB_PATH";
/// Environment variable name for the comma-separated local IPv6 ranges
pub const LOCAL_IPV6_RANGES_ENV: &str = "LOCAL_IPV6_RANGES";
