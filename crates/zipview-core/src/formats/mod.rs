//! Archive format handlers.

pub mod zip;

pub use self::zip::ZipEntry;
pub use self::zip::read_zip_entry;
