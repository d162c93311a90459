//! Error type definitions.
//!
//! This module defines all error types used throughout the service.

use std::io;
use std::path::PathBuf;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for configuration values that cannot be used as given.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An entry of the local IPv6 ranges setting is not an IPv6 CIDR block.
    #[error("invalid IPv6 range '{range}': {reason}")]
    InvalidIpv6Range {
        /// The offending (trimmed) entry.
        range: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Errors raised by a database decoder.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The database file could not be opened or is not a valid database.
    #[error("failed to open GeoIP database {}: {message}", path.display())]
    Open {
        /// Path that was opened.
        path: PathBuf,
        /// Decoder-specific reason.
        message: String,
    },

    /// The record for an address could not be decoded.
    #[error("failed to decode GeoIP record: {0}")]
    Lookup(String),
}

/// Errors returned by [`GeoLiteService`](crate::GeoLiteService) operations.
///
/// A database miss is not an error: lookups return an empty
/// [`Location`](crate::Location) instead.
#[derive(Error, Debug)]
pub enum GeoLiteError {
    /// The string given to `lookup` is not an IP address.
    #[error("failed to parse IP address '{0}'")]
    InvalidAddress(String),

    /// The installed database could not be opened or decoded.
    #[error("GeoIP database lookup failed: {0}")]
    Database(#[source] DecodeError),

    /// Transport error or non-200 response while downloading.
    #[error("failed to download database: {0}")]
    DownloadFailed(String),

    /// The gzip/tar stream is malformed or does not contain the database file.
    #[error("invalid database archive: {0}")]
    ArchiveInvalid(String),

    /// Decompressed content would exceed the configured ceiling.
    #[error("total decompressed size exceeds maximum allowed limit of {limit} bytes")]
    SizeLimitExceeded {
        /// The ceiling in bytes.
        limit: u64,
    },

    /// Writing the staging file failed.
    #[error("failed to write database file: {0}")]
    StageFailed(#[source] io::Error),

    /// The staged file does not open as a valid database.
    #[error("failed to open downloaded database file: {0}")]
    ValidationFailed(#[source] DecodeError),

    /// Renaming the staging file onto the database path failed.
    #[error("failed to replace database file: {0}")]
    InstallFailed(#[source] io::Error),

    /// The caller cancelled the update.
    #[error("database update cancelled")]
    Cancelled,
}
