//! Plain-text log of identifiers that could not be enriched.

use std::fs;
use std::path::Path;

use cnpj_core::ErrorLogDetail;
use cnpj_core::record::{FailedLookup, NOT_FOUND_SUFFIX};
use tracing::info;

use crate::StoreError;

/// One log line per failure, newline-terminated.
pub fn render(failed: &[FailedLookup], detail: ErrorLogDetail) -> String {
    let mut out = String::new();
    for entry in failed {
        let line = match detail {
            ErrorLogDetail::Fixed => format!("{}: {NOT_FOUND_SUFFIX}\n", entry.identifier),
            ErrorLogDetail::Cause => format!(
                "{}: {NOT_FOUND_SUFFIX} ({})\n",
                entry.identifier, entry.message
            ),
        };
        out.push_str(&line);
    }
    out
}

/// Overwrite the log at `path`. An empty `failed` list writes nothing, so a
/// log from an earlier batch survives an all-success run untouched.
///
/// Returns whether the file was written.
pub fn write(path: &Path, failed: &[FailedLookup], detail: ErrorLogDetail) -> Result<bool, StoreError> {
    if failed.is_empty() {
        info!("no failures to log");
        return Ok(false);
    }
    fs::write(path, render(failed, detail)).map_err(|e| StoreError::io(path, e))?;
    info!(path = %path.display(), count = failed.len(), "wrote error log");
    Ok(true)
}
