//! Security validation for untrusted request paths.

pub mod path;

pub use path::resolve_request_path;
