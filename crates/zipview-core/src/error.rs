//! Error types for request resolution and archive entry reads.

use std::path::PathBuf;
use thiserror::Error;
use zip::result::ZipError;

/// Result type alias using `ZipviewError`.
pub type Result<T> = std::result::Result<T, ZipviewError>;

/// Errors that can occur while resolving a request path or reading an entry.
///
/// The resolution variants (`InvalidPath`, `OutsideRoot`, `IncompletePath`,
/// `NotAnArchive`) are all reported as "not found" to remote callers, but are
/// kept distinct here so logs and tests can tell them apart.
#[derive(Error, Debug)]
pub enum ZipviewError {
    /// The request path cannot be interpreted as a relative path.
    #[error("invalid request path: {reason}")]
    InvalidPath {
        /// Why the path was rejected.
        reason: String,
    },

    /// The request path escapes the trusted root, or needed normalization.
    #[error("request path escapes the trusted root: {path}")]
    OutsideRoot {
        /// The offending request path.
        path: PathBuf,
    },

    /// The request path has no room for both an archive and an entry.
    #[error("request path does not name an archive entry: {path}")]
    IncompletePath {
        /// The offending request path.
        path: PathBuf,
    },

    /// The first path segment is not an existing archive file.
    #[error("not an archive: {path}")]
    NotAnArchive {
        /// The candidate archive path, relative to the trusted root.
        path: PathBuf,
    },

    /// The archive could not be opened or its directory could not be read.
    #[error("failed to read archive {path}: {source}")]
    ArchiveIo {
        /// The archive path.
        path: PathBuf,
        /// The underlying zip or I/O error.
        #[source]
        source: ZipError,
    },

    /// The archive does not contain a regular entry with this name.
    #[error("entry not found in {archive}: {entry}")]
    EntryNotFound {
        /// The archive path.
        archive: PathBuf,
        /// The requested entry name.
        entry: String,
    },

    /// I/O operation failed while consuming an entry stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ZipviewError {
    /// Returns `true` if the request path itself was rejected before any
    /// archive was opened.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use zipview_core::ZipviewError;
    ///
    /// let err = ZipviewError::OutsideRoot {
    ///     path: PathBuf::from("../etc/passwd"),
    /// };
    /// assert!(err.is_rejection());
    ///
    /// let err = ZipviewError::Io(std::io::Error::other("broken pipe"));
    /// assert!(!err.is_rejection());
    /// ```
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidPath { .. }
                | Self::OutsideRoot { .. }
                | Self::IncompletePath { .. }
                | Self::NotAnArchive { .. }
        )
    }

    /// Returns `true` if this error represents an attempted escape from the
    /// trusted root.
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(self, Self::OutsideRoot { .. })
    }

    /// Returns `true` if the request simply names nothing servable: a
    /// rejected path or a missing entry. Archive and stream failures are
    /// not included.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        self.is_rejection() || matches!(self, Self::EntryNotFound { .. })
    }

    /// Returns a short, stable category name for logs and machine output.
    ///
    /// # Examples
    ///
    /// ```
    /// use zipview_core::ZipviewError;
    ///
    /// let err = ZipviewError::InvalidPath {
    ///     reason: "null byte".into(),
    /// };
    /// assert_eq!(err.category(), "invalid-path");
    /// ```
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::InvalidPath { .. } => "invalid-path",
            Self::OutsideRoot { .. } => "outside-root",
            Self::IncompletePath { .. } => "incomplete",
            Self::NotAnArchive { .. } => "not-an-archive",
            Self::ArchiveIo { .. } => "archive-io",
            Self::EntryNotFound { .. } => "entry-not-found",
            Self::Io(_) => "io",
        }
    }
}

/// Aborts on a branch that cannot be reached given the invariants already
/// established by the caller.
///
/// These are not runtime conditions and are never folded into
/// [`ZipviewError`]. Reaching one means a bug in this crate.
#[cold]
#[track_caller]
pub(crate) fn fault(invariant: &str) -> ! {
    panic!("internal fault: {invariant}")
}
