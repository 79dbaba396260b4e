//! High-level API combining request resolution and entry reads.

use std::io::Read;

use crate::Result;
use crate::ServeConfig;
use crate::ZipviewError;
use crate::formats::ZipEntry;
use crate::formats::read_zip_entry;
use crate::security::resolve_request_path;
use crate::types::ResolvedTarget;
use crate::types::TrustedRoot;

/// Resolves an untrusted request path and streams the entry it names.
///
/// This is the main high-level API. The request path is validated against
/// `root` first; only a [`ResolvedTarget`] ever reaches the archive reader.
/// `reader` receives the resolved target alongside the entry stream so it can
/// derive response metadata (for example a media type) from the entry path.
///
/// # Returns
///
/// - `Ok(Some(value))` with whatever `reader` returned
/// - `Ok(None)` if the archive has no such regular entry
///
/// # Errors
///
/// - Any rejection from [`resolve_request_path`], converted into `E`
/// - `ZipviewError::ArchiveIo`, converted into `E`
/// - Any error returned by `reader`, unchanged
///
/// # Examples
///
/// ```no_run
/// use std::io::Read;
/// use zipview_core::ServeConfig;
/// use zipview_core::ZipviewError;
/// use zipview_core::fetch_entry;
/// use zipview_core::types::TrustedRoot;
///
/// # fn main() -> Result<(), ZipviewError> {
/// let root = TrustedRoot::new("/srv/results")?;
/// let config = ServeConfig::default();
///
/// let text = fetch_entry(&root, "/r.zip/notes.txt", &config, |_target, entry| {
///     let mut text = String::new();
///     entry.read_to_string(&mut text)?;
///     Ok::<_, ZipviewError>(text)
/// })?;
/// # Ok(())
/// # }
/// ```
pub fn fetch_entry<T, E, F>(
    root: &TrustedRoot,
    request_path: &str,
    config: &ServeConfig,
    reader: F,
) -> std::result::Result<Option<T>, E>
where
    F: FnOnce(&ResolvedTarget, &mut ZipEntry<'_>) -> std::result::Result<T, E>,
    E: From<ZipviewError>,
{
    let target = resolve_request_path(root, request_path, config)?;
    read_zip_entry(target.archive_path(), target.entry_path(), |entry| {
        reader(&target, entry)
    })
}

/// Resolves a request path and reads the whole entry into memory.
///
/// Convenience for small entries. A missing or directory entry becomes
/// `ZipviewError::EntryNotFound`.
///
/// # Errors
///
/// Returns any error from [`fetch_entry`], or `EntryNotFound`.
pub fn fetch_entry_bytes(
    root: &TrustedRoot,
    request_path: &str,
    config: &ServeConfig,
) -> Result<Vec<u8>> {
    let target = resolve_request_path(root, request_path, config)?;
    let bytes = read_zip_entry(target.archive_path(), target.entry_path(), |entry| {
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes)?;
        Ok::<_, ZipviewError>(bytes)
    })?;

    bytes.ok_or_else(|| {
        let (archive, entry) = target.into_parts();
        ZipviewError::EntryNotFound { archive, entry }
    })
}
