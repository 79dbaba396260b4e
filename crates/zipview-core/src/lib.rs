//! Safe single-entry reads from ZIP archives under a trusted root.
//!
//! `zipview-core` resolves an untrusted request path such as
//! `/results.zip/logs/run.txt` to an archive file and an entry inside it,
//! refusing anything that could escape the trusted root, and streams the
//! entry to a caller-supplied reader without extracting the archive.
//!
//! # Examples
//!
//! ```no_run
//! use std::io::Read;
//! use zipview_core::ServeConfig;
//! use zipview_core::ZipviewError;
//! use zipview_core::fetch_entry;
//! use zipview_core::types::TrustedRoot;
//!
//! # fn main() -> Result<(), ZipviewError> {
//! let root = TrustedRoot::new("/srv/results")?;
//! let config = ServeConfig::default();
//!
//! let size = fetch_entry(&root, "/r.zip/data.json", &config, |_target, entry| {
//!     let mut bytes = Vec::new();
//!     entry.read_to_end(&mut bytes)?;
//!     Ok::<_, ZipviewError>(bytes.len())
//! })?;
//! println!("entry size: {size:?}");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod copy;
pub mod error;
pub mod formats;
pub mod handler;
pub mod media_type;
pub mod security;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
#[doc(hidden)]
pub mod test_utils;

// Re-export main API types
pub use api::fetch_entry;
pub use api::fetch_entry_bytes;
pub use config::ServeConfig;
pub use error::Result;
pub use error::ZipviewError;
pub use formats::ZipEntry;
pub use formats::read_zip_entry;
pub use handler::BufferedResponse;
pub use handler::ResponseSink;
pub use handler::UnzipHandler;
pub use media_type::guess_media_type;

// Re-export types module for easier access
pub use types::ResolvedTarget;
pub use types::TrustedRoot;
