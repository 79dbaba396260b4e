//! Single-entry reads from ZIP archives.

use std::fs::File;
use std::io::Read;
use std::io::Seek;
use std::path::Path;

use tracing::trace;
use tracing::warn;
use zip::ZipArchive;
use zip::read::ZipFile;
use zip::result::ZipError;
use zip::result::ZipResult;

use crate::ZipviewError;

const S_IFMT: u32 = 0o170_000;
const S_IFDIR: u32 = 0o040_000;

/// An open stream over one regular entry of a ZIP archive.
///
/// Handed to the caller's reader by [`read_zip_entry`]. Decompression
/// happens on the fly; nothing is buffered beyond what the caller reads.
pub struct ZipEntry<'a> {
    inner: ZipFile<'a, File>,
}

impl ZipEntry<'_> {
    /// Returns the entry name as stored in the archive.
    #[must_use]
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Returns the declared uncompressed size of the entry in bytes.
    ///
    /// This is read from the archive directory and is not verified until
    /// the stream has been fully consumed.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.inner.size()
    }
}

impl Read for ZipEntry<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl std::fmt::Debug for ZipEntry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipEntry")
            .field("name", &self.name())
            .field("size", &self.size())
            .finish()
    }
}

/// Reads one entry from a ZIP archive through a caller-supplied reader.
///
/// The archive is opened, the entry located, and `reader` invoked exactly
/// once with the entry stream. Nothing is cached: every call re-opens the
/// archive, so a file replaced on disk is picked up by the next call.
///
/// A single leading `/` is ignored on both sides: `"hello.txt"` and
/// `"/hello.txt"` name the same entry, whether the archive stores it as
/// `hello.txt` or `/hello.txt`.
///
/// # Returns
///
/// - `Ok(Some(value))` with whatever `reader` returned
/// - `Ok(None)` if the archive has no such entry, or the entry is a
///   directory; `reader` is not invoked
///
/// The archive file handle and the entry stream are owned by this call and
/// are released before it returns, including when `reader` fails or panics.
///
/// # Errors
///
/// - `ZipviewError::InvalidPath` (converted into `E`) if `entry_name`
///   contains a null byte
/// - `ZipviewError::ArchiveIo` (converted into `E`) if the archive is
///   missing, unreadable, a directory, or not a valid ZIP file
/// - Any error returned by `reader`, unchanged
///
/// # Examples
///
/// ```no_run
/// use std::io::Read;
/// use zipview_core::ZipviewError;
/// use zipview_core::read_zip_entry;
///
/// # fn main() -> Result<(), ZipviewError> {
/// let bytes = read_zip_entry("results.zip", "/hello.txt", |entry| {
///     let mut buf = Vec::new();
///     entry.read_to_end(&mut buf)?;
///     Ok::<_, ZipviewError>(buf)
/// })?;
///
/// match bytes {
///     Some(bytes) => println!("read {} bytes", bytes.len()),
///     None => println!("no such entry"),
/// }
/// # Ok(())
/// # }
/// ```
pub fn read_zip_entry<T, E, F>(
    archive_path: impl AsRef<Path>,
    entry_name: &str,
    reader: F,
) -> Result<Option<T>, E>
where
    F: FnOnce(&mut ZipEntry<'_>) -> Result<T, E>,
    E: From<ZipviewError>,
{
    let archive_path = archive_path.as_ref();
    let archive_io = |source: ZipError| {
        warn!(archive = %archive_path.display(), error = %source, "failed to read archive");
        ZipviewError::ArchiveIo {
            path: archive_path.to_path_buf(),
            source,
        }
    };

    if entry_name.contains('\0') {
        return Err(ZipviewError::InvalidPath {
            reason: format!("entry name contains a null byte: {}", entry_name.escape_default()),
        }
        .into());
    }

    let mut archive = open_archive(archive_path).map_err(archive_io)?;

    let name = entry_name.strip_prefix('/').unwrap_or(entry_name);
    let Some(index) = find_entry(&archive, name) else {
        trace!(archive = %archive_path.display(), entry = %name, "entry not found");
        return Ok(None);
    };
    let entry = archive.by_index(index).map_err(archive_io)?;

    if is_directory(&entry) {
        trace!(archive = %archive_path.display(), entry = %name, "skipping directory entry");
        return Ok(None);
    }

    trace!(
        archive = %archive_path.display(),
        entry = %name,
        size = entry.size(),
        "streaming entry"
    );
    let mut stream = ZipEntry { inner: entry };
    reader(&mut stream).map(Some)
}

/// Looks up an entry stored either as `name` or as `/name`.
///
/// Archivers disagree on whether stored names carry a leading slash; the
/// exact stored name wins when both exist.
fn find_entry<R: Read + Seek>(archive: &ZipArchive<R>, name: &str) -> Option<usize> {
    archive
        .index_for_name(name)
        .or_else(|| archive.index_for_name(&format!("/{name}")))
}

/// Opens a ZIP archive and loads its central directory.
fn open_archive(path: &Path) -> ZipResult<ZipArchive<File>> {
    let file = File::open(path)?;

    // Opening a directory succeeds on some platforms; fail before parsing.
    if file.metadata()?.is_dir() {
        return Err(ZipError::Io(std::io::Error::new(
            std::io::ErrorKind::IsADirectory,
            "archive path is a directory",
        )));
    }

    ZipArchive::new(file)
}

/// Returns `true` if the entry is a directory marker.
///
/// An explicit file type in the entry's mode bits wins. Entries written
/// without one fall back to the trailing-slash naming convention.
fn is_directory<R: Read + Seek>(entry: &ZipFile<'_, R>) -> bool {
    match entry.unix_mode() {
        Some(mode) if mode & S_IFMT != 0 => mode & S_IFMT == S_IFDIR,
        _ => entry.is_dir(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::test_utils::ZipTestBuilder;
    use std::fs;
    use std::io::ErrorKind;
    use tempfile::TempDir;

    const PRESENT_ENTRY: &str = "hello.txt";
    const PRESENT_BYTES: &[u8] = b"Hello!";

    fn read_all(entry: &mut ZipEntry<'_>) -> Result<Vec<u8>, ZipviewError> {
        let mut buf = Vec::new();
        entry.read_to_end(&mut buf)?;
        Ok(buf)
    }

    fn unused_reader(_: &mut ZipEntry<'_>) -> Result<(), ZipviewError> {
        panic!("this reader should not have been used")
    }

    fn create_test_archive() -> (TempDir, std::path::PathBuf) {
        let temp = TempDir::new().expect("failed to create temp dir");
        let data = ZipTestBuilder::new()
            .add_file(PRESENT_ENTRY, PRESENT_BYTES)
            .add_directory("dir/")
            .add_file("dir/nested.css", b"body{}")
            .build();
        let path = temp.path().join("test.zip");
        fs::write(&path, data).expect("failed to write archive");
        (temp, path)
    }

    #[test]
    fn test_read_relative_entry_name() {
        let (_temp, zip) = create_test_archive();
        let bytes = read_zip_entry(&zip, PRESENT_ENTRY, read_all).unwrap();
        assert_eq!(bytes.as_deref(), Some(PRESENT_BYTES));
    }

    #[test]
    fn test_read_absolute_entry_name() {
        let (_temp, zip) = create_test_archive();
        let bytes = read_zip_entry(&zip, "/hello.txt", read_all).unwrap();
        assert_eq!(bytes.as_deref(), Some(PRESENT_BYTES));
    }

    #[test]
    fn test_read_nested_entry() {
        let (_temp, zip) = create_test_archive();
        let bytes = read_zip_entry(&zip, "dir/nested.css", read_all).unwrap();
        assert_eq!(bytes.as_deref(), Some(&b"body{}"[..]));
    }

    #[test]
    fn test_stored_leading_slash_is_ignored() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let path = temp.path().join("slashed.zip");
        let data = ZipTestBuilder::new().add_file("/hello.txt", PRESENT_BYTES).build();
        fs::write(&path, data).expect("failed to write archive");

        for name in ["hello.txt", "/hello.txt"] {
            let bytes = read_zip_entry(&path, name, read_all).unwrap();
            assert_eq!(bytes.as_deref(), Some(PRESENT_BYTES), "lookup of {name}");
        }
    }

    #[test]
    fn test_exact_stored_name_wins() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let path = temp.path().join("both.zip");
        let data = ZipTestBuilder::new()
            .add_file("/a.txt", b"slashed")
            .add_file("a.txt", b"plain")
            .build();
        fs::write(&path, data).expect("failed to write archive");

        let bytes = read_zip_entry(&path, "/a.txt", read_all).unwrap();
        assert_eq!(bytes.as_deref(), Some(&b"plain"[..]));
    }

    #[test]
    fn test_only_one_leading_slash_is_stripped() {
        let (_temp, zip) = create_test_archive();
        let result = read_zip_entry(&zip, "//hello.txt", unused_reader).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_entry_exposes_name_and_size() {
        let (_temp, zip) = create_test_archive();
        let meta = read_zip_entry(&zip, "/hello.txt", |entry| {
            Ok::<_, ZipviewError>((entry.name().to_string(), entry.size()))
        })
        .unwrap();
        assert_eq!(meta, Some((PRESENT_ENTRY.to_string(), PRESENT_BYTES.len() as u64)));
    }

    #[test]
    fn test_missing_entry_is_none() {
        let (_temp, zip) = create_test_archive();
        let result = read_zip_entry(&zip, "absent.txt", unused_reader).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_directory_entry_is_none() {
        let (_temp, zip) = create_test_archive();
        let result = read_zip_entry(&zip, "dir/", unused_reader).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_directory_without_slash_is_none() {
        let (_temp, zip) = create_test_archive();
        let result = read_zip_entry(&zip, "dir", unused_reader).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_reject_missing_file() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        let result = read_zip_entry(&missing, PRESENT_ENTRY, unused_reader);
        match result {
            Err(ZipviewError::ArchiveIo { path, source }) => {
                assert_eq!(path, missing);
                assert!(matches!(source, ZipError::Io(e) if e.kind() == ErrorKind::NotFound));
            }
            other => panic!("expected ArchiveIo, got {other:?}"),
        }
    }

    #[test]
    fn test_reject_wrong_file_format() {
        let temp = TempDir::new().unwrap();
        let text = temp.path().join("text.txt");
        fs::write(&text, "This is not a zip file\n").unwrap();

        let result = read_zip_entry(&text, PRESENT_ENTRY, unused_reader);
        assert!(matches!(result, Err(ZipviewError::ArchiveIo { .. })));
    }

    #[test]
    fn test_reject_empty_file() {
        let temp = TempDir::new().unwrap();
        let empty = temp.path().join("empty.zip");
        fs::write(&empty, b"").unwrap();

        let result = read_zip_entry(&empty, PRESENT_ENTRY, unused_reader);
        assert!(matches!(result, Err(ZipviewError::ArchiveIo { .. })));
    }

    #[test]
    fn test_reject_directory() {
        let temp = TempDir::new().unwrap();
        let result = read_zip_entry(temp.path(), PRESENT_ENTRY, unused_reader);
        assert!(matches!(result, Err(ZipviewError::ArchiveIo { .. })));
    }

    #[test]
    fn test_reject_null_byte_entry_name() {
        let (_temp, zip) = create_test_archive();
        let result = read_zip_entry(&zip, "\0", unused_reader);
        assert!(matches!(result, Err(ZipviewError::InvalidPath { .. })));
    }

    #[test]
    fn test_io_error_from_reader_is_uncaught() {
        let (_temp, zip) = create_test_archive();
        let result = read_zip_entry(&zip, PRESENT_ENTRY, |_| -> Result<(), ZipviewError> {
            Err(std::io::Error::new(ErrorKind::BrokenPipe, "client went away").into())
        });
        match result {
            Err(ZipviewError::Io(e)) => {
                assert_eq!(e.kind(), ErrorKind::BrokenPipe);
                assert_eq!(e.to_string(), "client went away");
            }
            other => panic!("expected the reader's error, got {other:?}"),
        }
    }

    #[test]
    #[should_panic(expected = "reader blew up")]
    fn test_panic_from_reader_is_uncaught() {
        let (_temp, zip) = create_test_archive();
        let _ = read_zip_entry(&zip, PRESENT_ENTRY, |_| -> Result<(), ZipviewError> {
            panic!("reader blew up")
        });
    }

    #[test]
    fn test_reader_invoked_exactly_once() {
        let (_temp, zip) = create_test_archive();
        let mut calls = 0;
        let result = read_zip_entry(&zip, PRESENT_ENTRY, |_| {
            calls += 1;
            Ok::<_, ZipviewError>(())
        })
        .unwrap();
        assert_eq!(result, Some(()));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_reads_deflated_entry() {
        let temp = TempDir::new().unwrap();
        let payload = "compressible ".repeat(1000);
        let data = ZipTestBuilder::new()
            .add_deflated_file("big.txt", payload.as_bytes())
            .build();
        let path = temp.path().join("deflated.zip");
        fs::write(&path, data).unwrap();

        let bytes = read_zip_entry(&path, "big.txt", read_all).unwrap().unwrap();
        assert_eq!(bytes, payload.as_bytes());
    }

    #[test]
    fn test_archive_replaced_between_calls() {
        let (_temp, zip) = create_test_archive();
        assert!(read_zip_entry(&zip, "fresh.txt", unused_reader).unwrap().is_none());

        let data = ZipTestBuilder::new().add_file("fresh.txt", b"new").build();
        fs::write(&zip, data).unwrap();

        let bytes = read_zip_entry(&zip, "fresh.txt", read_all).unwrap();
        assert_eq!(bytes.as_deref(), Some(&b"new"[..]));
    }
}
