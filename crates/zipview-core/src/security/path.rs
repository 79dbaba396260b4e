//! Request path containment validation.

use crate::Result;
use crate::ServeConfig;
use crate::types::ResolvedTarget;
use crate::types::TrustedRoot;

/// Resolves an untrusted request path to an archive and entry under `root`.
///
/// This function delegates to `ResolvedTarget::resolve()`, which performs:
/// - Null byte detection and collapsing of repeated `/`
/// - Lexical normalization with a byte-for-byte comparison
/// - Proper-ancestor containment against the canonical root
/// - Segment count and depth limiting
/// - Archive extension and regular-file checks
/// - Symlink containment for the archive file
///
/// # Performance
///
/// Rejections before step 6 involve no syscalls. Accepted paths cost one
/// `metadata()` and one `canonicalize()` call.
///
/// # Errors
///
/// Returns one of the rejection variants of `ZipviewError`; see
/// [`ZipviewError::is_rejection`](crate::ZipviewError::is_rejection).
///
/// # Examples
///
/// ```no_run
/// use zipview_core::ServeConfig;
/// use zipview_core::security::resolve_request_path;
/// use zipview_core::types::TrustedRoot;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let root = TrustedRoot::new("/srv/results")?;
/// let config = ServeConfig::default();
///
/// let target = resolve_request_path(&root, "r.zip/data.json", &config)?;
/// println!("{} in {}", target.entry_path(), target.archive_path().display());
///
/// assert!(resolve_request_path(&root, "../etc/passwd", &config).is_err());
/// # Ok(())
/// # }
/// ```
pub fn resolve_request_path(
    root: &TrustedRoot,
    request_path: &str,
    config: &ServeConfig,
) -> Result<ResolvedTarget> {
    ResolvedTarget::resolve(root, request_path, config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::ZipviewError;
    use tempfile::TempDir;

    fn create_test_root() -> (TempDir, TrustedRoot) {
        let temp = TempDir::new().expect("failed to create temp dir");
        std::fs::write(temp.path().join("r.zip"), b"PK").expect("failed to write archive");
        let root = TrustedRoot::new(temp.path()).expect("failed to create root");
        (temp, root)
    }

    #[test]
    fn test_resolve_request_path_valid() {
        let (_temp, root) = create_test_root();
        let config = ServeConfig::default();
        assert!(resolve_request_path(&root, "r.zip/foo/bar.txt", &config).is_ok());
    }

    #[test]
    fn test_resolve_request_path_traversal() {
        let (_temp, root) = create_test_root();
        let config = ServeConfig::default();
        let result = resolve_request_path(&root, "../etc/passwd", &config);
        assert!(matches!(result, Err(ZipviewError::OutsideRoot { .. })));
    }

    #[test]
    fn test_resolve_request_path_absolute_after_strip() {
        let (_temp, root) = create_test_root();
        let config = ServeConfig::default();
        let result = resolve_request_path(&root, "//etc/passwd", &config);
        assert!(matches!(result, Err(ZipviewError::OutsideRoot { .. })));
    }

    #[test]
    fn test_resolve_request_path_current_dir() {
        let (_temp, root) = create_test_root();
        let config = ServeConfig::default();
        let result = resolve_request_path(&root, "./r.zip/bar.txt", &config);
        assert!(result.is_err());
    }
}
