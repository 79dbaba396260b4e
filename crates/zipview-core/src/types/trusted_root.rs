//! Validated trusted root directory type.

use crate::Result;
use crate::ZipviewError;
use std::path::Path;
use std::path::PathBuf;

/// The directory under which every servable archive must live.
///
/// This type represents a directory that has been validated to:
/// - Exist on the filesystem
/// - Be a directory (not a file)
/// - Be represented as an absolute canonical path
///
/// # Security Properties
///
/// The containment check in [`ResolvedTarget::resolve`] compares candidate
/// paths byte-for-byte against this path, so it must never contain `.`, `..`
/// or symlinked components. Canonicalizing once at construction guarantees
/// that.
///
/// [`ResolvedTarget::resolve`]: super::ResolvedTarget::resolve
///
/// # Examples
///
/// ```no_run
/// use zipview_core::types::TrustedRoot;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let root = TrustedRoot::new("/srv/results")?;
/// println!("Serving archives from: {}", root.as_path().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedRoot(PathBuf);

impl TrustedRoot {
    /// Creates a new `TrustedRoot` after validating the path.
    ///
    /// # Validation
    ///
    /// 1. Verifies the path exists
    /// 2. Verifies the path is a directory
    /// 3. Canonicalizes the path to an absolute path
    ///
    /// The root is only ever read from, so unlike an extraction destination
    /// no write permission is required.
    ///
    /// # Errors
    ///
    /// Returns `ZipviewError::Io` if the path does not exist, is not a
    /// directory, or cannot be canonicalized.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let metadata = std::fs::metadata(&path).map_err(|e| {
            ZipviewError::Io(std::io::Error::new(
                e.kind(),
                format!("trusted root is not accessible: {}: {e}", path.display()),
            ))
        })?;

        if !metadata.is_dir() {
            return Err(ZipviewError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("trusted root is not a directory: {}", path.display()),
            )));
        }

        let canonical = path.canonicalize().map_err(|e| {
            ZipviewError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to canonicalize path {}: {}", path.display(), e),
            ))
        })?;

        Ok(Self(canonical))
    }

    /// Returns the path as a `&Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Returns `true` if `path` lies strictly below this root.
    ///
    /// The root itself is not contained in itself.
    #[inline]
    #[must_use]
    pub fn is_proper_ancestor_of(&self, path: &Path) -> bool {
        path != self.0 && path.starts_with(&self.0)
    }

    /// Converts into the inner `PathBuf`.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}
