//! Subcommand implementations.

pub mod completion;
pub mod get;
pub mod request;
pub mod resolve;

use std::path::Path;

use anyhow::Result;
use anyhow::bail;

use crate::output::OutputFormatter;

/// Refuses to clobber an existing output file unless `force` is set.
pub fn check_output_path(path: &Path, force: bool, formatter: &dyn OutputFormatter) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    if !force {
        bail!(
            "Output file '{}' already exists\n\
             HINT: Use --force to overwrite.",
            path.display()
        );
    }
    formatter.format_warning(&format!("Overwriting {}", path.display()));
    Ok(())
}
