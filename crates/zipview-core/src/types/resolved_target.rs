//! Validated `(archive, entry)` pair resolved from an untrusted request path.

use crate::Result;
use crate::ServeConfig;
use crate::ZipviewError;
use crate::error::fault;
use std::ffi::OsStr;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;

use super::TrustedRoot;

/// An archive file under the trusted root plus the entry to read from it.
///
/// # Security Properties
///
/// - Can ONLY be constructed through [`ResolvedTarget::resolve`]
/// - `archive_path` is absolute, canonical and strictly inside the root
/// - `archive_path` was a regular file with the archive extension when
///   resolved
/// - `entry_path` is non-empty and contains no `.`, `..` or empty segments
///
/// The archive may still be replaced or removed after resolution. Readers
/// treat that as an ordinary archive I/O failure.
///
/// # Examples
///
/// ```no_run
/// use zipview_core::ServeConfig;
/// use zipview_core::types::ResolvedTarget;
/// use zipview_core::types::TrustedRoot;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let root = TrustedRoot::new("/srv/results")?;
/// let config = ServeConfig::default();
///
/// let target = ResolvedTarget::resolve(&root, "/r.zip/data.json", &config)?;
/// assert_eq!(target.entry_path(), "data.json");
///
/// // Traversal is rejected regardless of what exists on disk
/// assert!(ResolvedTarget::resolve(&root, "../../etc/passwd", &config).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    archive_path: PathBuf,
    entry_path: String,
}

impl ResolvedTarget {
    /// Resolves an untrusted request path against the trusted root.
    ///
    /// # Validation Steps
    ///
    /// 1. Strip a single leading `/`
    /// 2. Reject null bytes (not representable as a host path)
    /// 3. Reject a remaining leading `/`, then collapse repeated and
    ///    trailing `/` so `r.zip//a/` reads as `r.zip/a`
    /// 4. Join onto the root and normalize lexically; the normalized path
    ///    must be byte-for-byte identical to the joined one (no `.` or `..`
    ///    segments) and must lie strictly inside the root
    /// 5. Require at least two segments and at most `max_path_depth`
    /// 6. Require the first segment to be an existing regular file with the
    ///    archive extension, whose canonical path is still inside the root
    ///
    /// # Errors
    ///
    /// - `ZipviewError::InvalidPath` for null bytes or excessive depth
    /// - `ZipviewError::OutsideRoot` for traversal, `.` or `..` segments, an
    ///   absolute remainder, or an archive that canonicalizes outside the root
    /// - `ZipviewError::IncompletePath` for fewer than two segments
    /// - `ZipviewError::NotAnArchive` when the first segment is not an
    ///   archive file
    pub fn resolve(root: &TrustedRoot, request_path: &str, config: &ServeConfig) -> Result<Self> {
        let relative = request_path.strip_prefix('/').unwrap_or(request_path);

        if relative.contains('\0') {
            debug!(request = %relative.escape_default(), "rejected request path with null byte");
            return Err(ZipviewError::InvalidPath {
                reason: "request path contains a null byte".to_string(),
            });
        }

        // A second leading `/` would make the join replace the root.
        if relative.starts_with('/') {
            debug!(request = %relative, "rejected absolute request path");
            return Err(ZipviewError::OutsideRoot {
                path: PathBuf::from(relative),
            });
        }

        let collapsed = collapse_separators(relative);
        if collapsed.is_empty() {
            debug!("rejected empty request path");
            return Err(ZipviewError::IncompletePath {
                path: PathBuf::from(relative),
            });
        }

        let candidate = root.as_path().join(&collapsed);
        let normalized = normalize_lexically(&candidate);

        // A `.` or `..` segment is treated as a traversal attempt, even when
        // the normalized form would stay inside the root.
        if candidate.as_os_str() != normalized.as_os_str()
            || !root.is_proper_ancestor_of(&normalized)
        {
            debug!(request = %relative, "rejected request path outside trusted root");
            return Err(ZipviewError::OutsideRoot {
                path: PathBuf::from(relative),
            });
        }

        let segments = relative_segments(root, &normalized);

        if segments.len() < 2 {
            debug!(request = %relative, "rejected request path without entry segment");
            return Err(ZipviewError::IncompletePath {
                path: PathBuf::from(relative),
            });
        }

        if segments.len() > config.max_path_depth {
            debug!(
                request = %relative,
                depth = segments.len(),
                max = config.max_path_depth,
                "rejected request path exceeding maximum depth"
            );
            return Err(ZipviewError::InvalidPath {
                reason: format!(
                    "path depth {} exceeds maximum {}",
                    segments.len(),
                    config.max_path_depth
                ),
            });
        }

        let archive_name = segments[0];
        let archive_path = validate_archive(root, archive_name, config)?;
        let entry_path = segments[1..].join("/");

        Ok(Self {
            archive_path,
            entry_path,
        })
    }

    /// Returns the absolute, canonical path of the archive file.
    #[inline]
    #[must_use]
    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    /// Returns the `/`-joined entry path to look up inside the archive.
    #[inline]
    #[must_use]
    pub fn entry_path(&self) -> &str {
        &self.entry_path
    }

    /// Returns the final segment of the entry path.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.entry_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.entry_path)
    }

    /// Splits into `(archive_path, entry_path)`.
    #[must_use]
    pub fn into_parts(self) -> (PathBuf, String) {
        (self.archive_path, self.entry_path)
    }
}

/// Drops empty segments, so repeated and trailing `/` disappear.
fn collapse_separators(relative: &str) -> String {
    relative
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Resolves `.` and `..` without touching the filesystem.
///
/// `..` at the filesystem root stays at the root.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Splits a normalized path below `root` into its UTF-8 segments.
fn relative_segments<'a>(root: &TrustedRoot, normalized: &'a Path) -> Vec<&'a str> {
    let Ok(relative) = normalized.strip_prefix(root.as_path()) else {
        fault("normalized path was already checked to be inside the trusted root")
    };

    relative
        .components()
        .map(|component| match component {
            Component::Normal(segment) => segment
                .to_str()
                .unwrap_or_else(|| fault("segment of a UTF-8 request path is UTF-8")),
            _ => fault("normalized relative path has only normal components"),
        })
        .collect()
}

fn validate_archive(root: &TrustedRoot, archive_name: &str, config: &ServeConfig) -> Result<PathBuf> {
    let not_an_archive = || ZipviewError::NotAnArchive {
        path: PathBuf::from(archive_name),
    };

    let has_archive_extension = Path::new(archive_name)
        .extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| config.is_archive_extension(ext));
    if !has_archive_extension {
        debug!(archive = %archive_name, "rejected request for non-archive file");
        return Err(not_an_archive());
    }

    let archive_path = root.as_path().join(archive_name);
    match std::fs::metadata(&archive_path) {
        Ok(metadata) if metadata.is_file() => {}
        Ok(_) => {
            debug!(archive = %archive_name, "rejected request for non-regular archive path");
            return Err(not_an_archive());
        }
        Err(e) => {
            debug!(archive = %archive_name, error = %e, "rejected request for missing archive");
            return Err(not_an_archive());
        }
    }

    // A symlink inside the root may point anywhere; follow it and check again.
    let canonical = archive_path.canonicalize().map_err(|e| {
        debug!(archive = %archive_name, error = %e, "failed to canonicalize archive path");
        not_an_archive()
    })?;
    if !root.is_proper_ancestor_of(&canonical) {
        debug!(archive = %archive_name, "rejected archive resolving outside trusted root");
        return Err(ZipviewError::OutsideRoot {
            path: PathBuf::from(archive_name),
        });
    }

    Ok(canonical)
}
