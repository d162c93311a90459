//! Validation and atomic install of a staged database.

use std::sync::PoisonError;

use super::extract::StagedDatabase;
use super::PipelineContext;
use crate::error_handling::GeoLiteError;

/// Opens the staged file with the lookup decoder, then renames it over the
/// installed database under the exclusive lock.
///
/// Returns the installed size. On failure the staging file is removed and the
/// installed database is left as it was.
pub(crate) fn validate_and_install(
    staged: StagedDatabase,
    context: &PipelineContext,
) -> Result<u64, GeoLiteError> {
    let StagedDatabase { file, size } = staged;

    // The handle is dropped right away; only a successful open matters
    context
        .decoder
        .open(file.path())
        .map_err(GeoLiteError::ValidationFailed)?;
    log::debug!("Validated staged database {}", file.path().display());

    if context.cancel.is_cancelled() {
        return Err(GeoLiteError::Cancelled);
    }

    let _guard = context
        .lock
        .write()
        .unwrap_or_else(PoisonError::into_inner);

    file.persist(&context.db_path)
        .map_err(|e| GeoLiteError::InstallFailed(e.error))?;

    Ok(size)
}
