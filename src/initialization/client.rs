//! HTTP client initialization.

use reqwest::ClientBuilder;

use crate::config::{HTTP_CONNECT_TIMEOUT, USER_AGENT};
use crate::error_handling::InitializationError;

/// Initializes the HTTP client used for database downloads.
///
/// Creates a `reqwest::Client` configured with:
/// - The service User-Agent
/// - A connect timeout
///
/// No overall timeout is set on the client; the update pipeline applies its
/// own per-request bound so a large download is not cut short.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_client() -> Result<reqwest::Client, InitializationError> {
    ClientBuilder::new()
        .user_agent(USER_AGENT)
        .connect_timeout(HTTP_CONNECT_TIMEOUT)
        .build()
        .map_err(InitializationError::from)
}
