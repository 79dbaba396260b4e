//! Buffered stream copy for entry bodies.
//!
//! Entry bytes are moved from the decompressing entry stream to the response
//! body through a caller-owned buffer, so a handler serving many requests can
//! reuse one buffer instead of allocating per copy.

use std::io::Read;
use std::io::Write;
use std::io::{self};

use crate::ZipviewError;

/// Buffer size for entry copies (64KB).
///
/// This matches typical filesystem block sizes and the ZIP reader's own
/// internal buffering.
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Reusable buffer for streaming entry bytes.
///
/// # Examples
///
/// ```no_run
/// # use zipview_core::copy::{CopyBuffer, copy_with_buffer};
/// # use zipview_core::ZipviewError;
/// # fn example() -> Result<(), ZipviewError> {
/// let mut buffer = CopyBuffer::new();
/// let mut input = std::fs::File::open("input.txt")?;
/// let mut output = std::io::stdout().lock();
///
/// let bytes_copied = copy_with_buffer(&mut input, &mut output, &mut buffer)?;
/// eprintln!("Copied {bytes_copied} bytes");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CopyBuffer {
    buf: Box<[u8]>,
}

impl CopyBuffer {
    /// Creates a new zero-initialized copy buffer.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; COPY_BUFFER_SIZE].into_boxed_slice(),
        }
    }

    /// Returns the buffer size in bytes.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.buf.len()
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies data from reader to writer using the provided reusable buffer.
///
/// Interrupted reads are retried. Any other read or write error is returned
/// as `ZipviewError::Io` and the copy stops; bytes already written stay
/// written.
///
/// # Errors
///
/// Returns an error if:
/// - Reading from the source fails
/// - Writing to the destination fails
/// - The byte count would overflow `u64`
#[inline]
pub fn copy_with_buffer<R: Read + ?Sized, W: Write + ?Sized>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut CopyBuffer,
) -> Result<u64, ZipviewError> {
    let mut total: u64 = 0;

    loop {
        let bytes_read = match reader.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ZipviewError::Io(e)),
        };

        writer
            .write_all(&buffer.buf[..bytes_read])
            .map_err(ZipviewError::Io)?;

        total = total.checked_add(bytes_read as u64).ok_or_else(|| {
            ZipviewError::Io(io::Error::other("copied byte count overflowed"))
        })?;
    }

    Ok(total)
}
