//! Resolve command implementation

use crate::cli::ResolveArgs;
use crate::error::add_request_context;
use crate::output::OutputFormatter;
use crate::output::ResolveReport;
use anyhow::Context;
use anyhow::Result;
use zipview_core::TrustedRoot;
use zipview_core::config::DEFAULT_ROUTE_PREFIX;
use zipview_core::guess_media_type;
use zipview_core::security::resolve_request_path;

pub fn execute(args: &ResolveArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let root = TrustedRoot::new(args.root.clone())
        .with_context(|| format!("Cannot use '{}' as the root", args.root.display()))?;
    let config = args.options.to_config(DEFAULT_ROUTE_PREFIX);

    // Resolution only; the archive's directory is never read.
    let target = add_request_context(
        resolve_request_path(&root, &args.request_path, &config),
        &args.request_path,
    )?;

    formatter.format_resolution(&ResolveReport {
        request_path: args.request_path.clone(),
        media_type: guess_media_type(target.file_name()),
        archive: target.archive_path().to_path_buf(),
        entry: target.entry_path().to_string(),
    })
}
