//! Error conversion utilities for CLI.
//!
//! Converts zipview-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use zipview_core::ZipviewError;

/// Converts `ZipviewError` to user-friendly anyhow error with context
pub fn convert_zipview_error(err: ZipviewError, request_path: &str) -> anyhow::Error {
    let category = err.category();
    match err {
        ZipviewError::OutsideRoot { .. } => {
            anyhow!(
                "Security violation [{category}]: request path '{request_path}' escapes the trusted root\n\
                 HINT: Request paths must be plain relative paths without '..' or '.' segments."
            )
        }
        ZipviewError::IncompletePath { .. } => {
            anyhow!(
                "Request path '{request_path}' does not name an entry inside an archive [{category}]\n\
                 HINT: Use ARCHIVE.zip/PATH/IN/ARCHIVE."
            )
        }
        ZipviewError::NotAnArchive { path } => {
            anyhow!(
                "'{}' is not an archive under the root [{category}]\n\
                 HINT: The first segment must name an existing archive file directly under ROOT (see --extension).",
                path.display()
            )
        }
        ZipviewError::InvalidPath { reason } => {
            let hint = invalid_path_hint(&reason);
            anyhow!("Invalid request path '{request_path}' [{category}]: {reason}\nHINT: {hint}")
        }
        ZipviewError::ArchiveIo { path, source } => {
            anyhow!(
                "Failed to read archive '{}' [{category}]: {source}\n\
                 HINT: The archive may be corrupted or truncated.",
                path.display()
            )
        }
        ZipviewError::EntryNotFound { archive, entry } => {
            anyhow!(
                "Entry '{entry}' not found in '{}' [{category}]\n\
                 HINT: Directory entries cannot be read; name a file inside the archive.",
                archive.display()
            )
        }
        ZipviewError::Io(io_err) => {
            anyhow!("I/O error while reading '{request_path}' [{category}]: {io_err}")
        }
    }
}

fn invalid_path_hint(reason: &str) -> &'static str {
    if reason.contains("null byte") {
        "Remove NUL characters from the request path."
    } else if reason.contains("route prefix") {
        "Start the URL path with the route prefix, or change it with --prefix."
    } else if reason.contains("depth") {
        "Use --max-depth to allow deeper entry paths if legitimate."
    } else {
        "Check the request path for unsupported characters."
    }
}

/// Adds request context to a core result
pub fn add_request_context<T>(
    result: Result<T, ZipviewError>,
    request_path: &str,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_zipview_error(e, request_path))
}
