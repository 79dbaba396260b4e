//! Type-safe wrappers for request resolution.
//!
//! Both types are validated upon construction and cannot be created from raw
//! paths or strings without going through validation.
//!
//! # Design Principles
//!
//! - Type-driven security: an unvalidated request path cannot reach the
//!   archive reader through these types
//! - No `From<PathBuf>` or `From<String>` implementations
//! - All constructors perform validation

pub mod resolved_target;
pub mod trusted_root;

pub use resolved_target::ResolvedTarget;
pub use trusted_root::TrustedRoot;
