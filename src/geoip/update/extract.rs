//! Archive extraction.
//!
//! Streams a `.tar.gz` archive and copies the database entry into a staging
//! file. Nothing is buffered in memory beyond one copy buffer.

use std::ffi::OsStr;
use std::io::{self, Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive;
use tempfile::NamedTempFile;
use tokio_util::sync::CancellationToken;

use super::download::download_error;
use crate::config::{
    COPY_BUFFER_SIZE, GEOLITE_DB_FILENAME, MAX_ARCHIVE_ENTRIES, STAGING_FILE_PREFIX,
    STAGING_FILE_SUFFIX,
};
use crate::error_handling::GeoLiteError;

/// A database file extracted next to its install location.
///
/// Dropping it removes the staging file.
#[derive(Debug)]
pub(crate) struct StagedDatabase {
    pub(crate) file: NamedTempFile,
    pub(crate) size: u64,
}

/// Extracts the first `GeoLite2-City.mmdb` regular file from a gzip'd tar stream.
///
/// `max_bytes` bounds the total decompressed size of all entries read up to
/// and including the database. Both the sizes declared in the tar headers and
/// the bytes actually copied are checked against it.
pub(crate) fn extract_database<R: Read>(
    reader: R,
    staging_dir: &Path,
    max_bytes: u64,
    cancel: &CancellationToken,
) -> Result<StagedDatabase, GeoLiteError> {
    log::debug!("Extracting {} from tar.gz archive", GEOLITE_DB_FILENAME);

    let mut archive = Archive::new(GzDecoder::new(reader));
    let entries = archive.entries().map_err(read_error)?;

    let mut examined = 0usize;
    let mut consumed = 0u64;

    for entry_result in entries {
        if cancel.is_cancelled() {
            return Err(GeoLiteError::Cancelled);
        }

        examined += 1;
        if examined > MAX_ARCHIVE_ENTRIES {
            return Err(GeoLiteError::ArchiveInvalid(format!(
                "more than {} entries in archive",
                MAX_ARCHIVE_ENTRIES
            )));
        }

        let mut entry = entry_result.map_err(read_error)?;

        let declared = entry.size();
        let budget = max_bytes.saturating_sub(consumed);
        consumed = consumed.saturating_add(declared);
        if consumed > max_bytes {
            return Err(GeoLiteError::SizeLimitExceeded { limit: max_bytes });
        }

        let path = entry
            .path()
            .map_err(|e| GeoLiteError::ArchiveInvalid(format!("invalid entry path: {}", e)))?
            .into_owned();

        if !entry.header().entry_type().is_file()
            || path.file_name() != Some(OsStr::new(GEOLITE_DB_FILENAME))
        {
            log::debug!("Skipping archive entry {}", path.display());
            continue;
        }

        let mut file = tempfile::Builder::new()
            .prefix(STAGING_FILE_PREFIX)
            .suffix(STAGING_FILE_SUFFIX)
            .tempfile_in(staging_dir)
            .map_err(GeoLiteError::StageFailed)?;
        log::debug!(
            "Staging {} at {}",
            path.display(),
            file.path().display()
        );

        let size = copy_bounded(&mut entry, &mut file, budget, max_bytes, cancel)?;
        if size != declared {
            return Err(GeoLiteError::ArchiveInvalid(format!(
                "truncated entry: expected {} bytes, got {}",
                declared, size
            )));
        }

        file.flush().map_err(GeoLiteError::StageFailed)?;
        file.as_file()
            .sync_all()
            .map_err(GeoLiteError::StageFailed)?;

        return Ok(StagedDatabase { file, size });
    }

    Err(GeoLiteError::ArchiveInvalid(format!(
        "{} not found in archive",
        GEOLITE_DB_FILENAME
    )))
}

fn copy_bounded<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    budget: u64,
    limit: u64,
    cancel: &CancellationToken,
) -> Result<u64, GeoLiteError> {
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut written = 0u64;

    loop {
        if cancel.is_cancelled() {
            return Err(GeoLiteError::Cancelled);
        }

        let n = match reader.read(&mut buffer) {
            Ok(0) => return Ok(written),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(read_error(e)),
        };

        written += n as u64;
        if written > budget {
            return Err(GeoLiteError::SizeLimitExceeded { limit });
        }

        writer
            .write_all(&buffer[..n])
            .map_err(GeoLiteError::StageFailed)?;
    }
}

/// Network failures surfacing through the decompressor stay download errors;
/// everything else means the archive itself is broken.
fn read_error(error: io::Error) -> GeoLiteError {
    let from_network = error
        .get_ref()
        .is_some_and(|inner| inner.is::<reqwest::Error>());

    if !from_network {
        return GeoLiteError::ArchiveInvalid(error.to_string());
    }

    match error.into_inner().map(|inner| inner.downcast::<reqwest::Error>()) {
        Some(Ok(e)) => download_error(*e),
        _ => GeoLiteError::DownloadFailed("failed to read response body".to_string()),
    }
}
