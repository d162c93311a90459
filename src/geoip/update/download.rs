//! Archive download.

use std::io;

use futures::{FutureExt, StreamExt, TryStreamExt};
use reqwest::StatusCode;
use tokio::io::AsyncRead;
use tokio_util::io::StreamReader;
use tokio_util::sync::CancellationToken;

use crate::config::DOWNLOAD_TIMEOUT;
use crate::error_handling::GeoLiteError;

/// Sends the download request and checks the status.
///
/// The request timeout covers the body too, so a stalled stream ends as a read
/// error during extraction.
pub(crate) async fn fetch(
    client: &reqwest::Client,
    url: &str,
    cancel: &CancellationToken,
) -> Result<reqwest::Response, GeoLiteError> {
    let send = client.get(url).timeout(DOWNLOAD_TIMEOUT).send();

    let response = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(GeoLiteError::Cancelled),
        result = send => result.map_err(download_error)?,
    };

    let status = response.status();
    if status != StatusCode::OK {
        return Err(GeoLiteError::DownloadFailed(format!(
            "received HTTP {}",
            status.as_u16()
        )));
    }

    log::debug!(
        "Downloading GeoLite2 City archive ({} bytes announced)",
        response
            .content_length()
            .map_or_else(|| "unknown".to_string(), |len| len.to_string())
    );

    Ok(response)
}

/// Turns the response body into a byte reader that ends early on cancellation.
pub(crate) fn body_reader(
    response: reqwest::Response,
    cancel: &CancellationToken,
) -> impl AsyncRead + Send + Unpin + 'static {
    let stream = response
        .bytes_stream()
        .map_err(io::Error::other)
        .take_until(cancel.clone().cancelled_owned().boxed());
    StreamReader::new(Box::pin(stream))
}

/// Formats a transport error without its URL, which carries the license key.
pub(crate) fn download_error(error: reqwest::Error) -> GeoLiteError {
    let error = error.without_url();
    if error.is_timeout() {
        GeoLiteError::DownloadFailed(format!("timed out: {}", error))
    } else {
        GeoLiteError::DownloadFailed(error.to_string())
    }
}
