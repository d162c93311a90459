//! Database update pipeline.
//!
//! `freshness check → download → extract → stage → validate → install`
//!
//! Each step fails closed: the installed database only ever changes through
//! the final rename, and every error path removes the staging file.

mod download;
mod extract;
mod install;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::{Duration, SystemTime};

use tokio_util::io::SyncIoBridge;
use tokio_util::sync::CancellationToken;

use super::decoder::GeoDecoder;
use super::GeoLiteService;
use crate::config::DATABASE_MAX_AGE;
use crate::error_handling::GeoLiteError;

/// State shared by the blocking steps of one pipeline run.
pub(crate) struct PipelineContext {
    pub(crate) db_path: PathBuf,
    pub(crate) lock: Arc<RwLock<()>>,
    pub(crate) decoder: Arc<dyn GeoDecoder>,
    pub(crate) max_bytes: u64,
    pub(crate) cancel: CancellationToken,
}

/// Age of the file at `path` from its modification time.
///
/// Returns `None` if the file is missing or its mtime can't be read. A
/// modification time in the future counts as age zero.
pub(crate) fn database_age(path: &Path) -> Option<Duration> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    Some(
        SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO),
    )
}

fn is_fresh(path: &Path) -> bool {
    matches!(database_age(path), Some(age) if age < DATABASE_MAX_AGE)
}

/// Directory that receives the staging file; `.` for a bare file name.
fn staging_dir(db_path: &Path) -> PathBuf {
    match db_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

impl GeoLiteService {
    /// Downloads and installs a new database unless the current one is fresh.
    ///
    /// The installed file is replaced only by an atomic rename of a staged file
    /// that the decoder has already opened successfully. On any error the
    /// previous database is left untouched.
    ///
    /// This does not consult [`updater_disabled`](Self::updater_disabled);
    /// schedulers are expected to check it first.
    ///
    /// # Errors
    ///
    /// - [`GeoLiteError::DownloadFailed`] on transport errors or a non-200 status
    /// - [`GeoLiteError::ArchiveInvalid`] if the archive is malformed or lacks the database file
    /// - [`GeoLiteError::SizeLimitExceeded`] if extraction exceeds the configured ceiling
    /// - [`GeoLiteError::StageFailed`] if the staging file can't be written
    /// - [`GeoLiteError::ValidationFailed`] if the staged file doesn't open as a database
    /// - [`GeoLiteError::InstallFailed`] if the final rename fails
    /// - [`GeoLiteError::Cancelled`] if `cancel` fires first
    pub async fn update_database(&self, cancel: &CancellationToken) -> Result<(), GeoLiteError> {
        let db_path = self.config.db_path.clone();

        if is_fresh(&db_path) {
            log::info!(
                "GeoLite2 City database is up-to-date: {}",
                db_path.display()
            );
            return Ok(());
        }

        log::info!("Updating GeoLite2 City database: {}", db_path.display());

        let url = self.config.download_url();
        let response = download::fetch(&self.client, &url, cancel).await?;

        // The bridge captures the runtime handle, so it is built on this task
        let reader = SyncIoBridge::new(download::body_reader(response, cancel));

        let context = PipelineContext {
            db_path,
            lock: Arc::clone(&self.db_lock),
            decoder: Arc::clone(&self.decoder),
            max_bytes: self.config.max_extract_bytes,
            cancel: cancel.clone(),
        };

        let result = tokio::task::spawn_blocking(move || -> Result<u64, GeoLiteError> {
            let dir = staging_dir(&context.db_path);
            std::fs::create_dir_all(&dir).map_err(GeoLiteError::StageFailed)?;

            let staged =
                extract::extract_database(reader, &dir, context.max_bytes, &context.cancel)?;
            install::validate_and_install(staged, &context)
        })
        .await
        .map_err(|e| GeoLiteError::StageFailed(io::Error::other(e)))
        .and_then(|result| result);

        match result {
            Ok(size) => {
                log::info!(
                    "Installed GeoLite2 City database at {} ({} bytes)",
                    self.config.db_path.display(),
                    size
                );
                Ok(())
            }
            // A cancelled body stream surfaces as a truncated archive
            Err(_) if cancel.is_cancelled() => Err(GeoLiteError::Cancelled),
            Err(e) => Err(e),
        }
    }
}
