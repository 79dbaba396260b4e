//! Get command implementation

use crate::cli::GetArgs;
use crate::commands::check_output_path;
use crate::error::add_request_context;
use crate::error::convert_zipview_error;
use crate::output::GetReport;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use tracing::debug;
use zipview_core::ResolvedTarget;
use zipview_core::ServeConfig;
use zipview_core::TrustedRoot;
use zipview_core::ZipviewError;
use zipview_core::config::DEFAULT_ROUTE_PREFIX;
use zipview_core::copy::CopyBuffer;
use zipview_core::copy::copy_with_buffer;
use zipview_core::guess_media_type;
use zipview_core::read_zip_entry;
use zipview_core::security::resolve_request_path;

pub fn execute(
    args: &GetArgs,
    formatter: &dyn OutputFormatter,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let root = TrustedRoot::new(args.root.clone())
        .with_context(|| format!("Cannot use '{}' as the root", args.root.display()))?;
    let config = args.options.to_config(DEFAULT_ROUTE_PREFIX);

    let Some(output) = &args.output else {
        if json {
            bail!(
                "Entry bytes and JSON output would share stdout\n\
                 HINT: Use --output to write the entry to a file."
            );
        }
        return write_to_stdout(&root, &args.request_path, &config);
    };

    check_output_path(output, args.force, formatter)?;
    let target = add_request_context(
        resolve_request_path(&root, &args.request_path, &config),
        &args.request_path,
    )?;

    let show_progress = !quiet && CliProgress::should_show();
    let mut created = false;
    let written = read_zip_entry(target.archive_path(), target.entry_path(), |entry| {
        let mut writer = BufWriter::new(File::create(output)?);
        created = true;

        let mut buffer = CopyBuffer::new();
        let bytes = if show_progress {
            let progress = CliProgress::new(entry.size(), "Reading");
            copy_with_buffer(entry, &mut progress.wrap_write(&mut writer), &mut buffer)?
        } else {
            copy_with_buffer(entry, &mut writer, &mut buffer)?
        };
        writer.flush()?;
        Ok::<_, ZipviewError>(bytes)
    });

    let written = match written {
        Ok(written) => written,
        Err(e) => {
            if created {
                debug!(output = %output.display(), "removing partial output");
                let _ = std::fs::remove_file(output);
            }
            return Err(convert_zipview_error(e, &args.request_path));
        }
    };
    let Some(bytes_written) = written else {
        return Err(entry_not_found(target, &args.request_path));
    };

    formatter.format_get_result(&GetReport {
        media_type: guess_media_type(target.file_name()),
        archive: target.archive_path().to_path_buf(),
        entry: target.entry_path().to_string(),
        bytes_written,
        output: output.clone(),
    })
}

fn write_to_stdout(root: &TrustedRoot, request_path: &str, config: &ServeConfig) -> Result<()> {
    let target = add_request_context(resolve_request_path(root, request_path, config), request_path)?;

    let written = read_zip_entry(target.archive_path(), target.entry_path(), |entry| {
        let mut stdout = std::io::stdout().lock();
        let bytes = copy_with_buffer(entry, &mut stdout, &mut CopyBuffer::new())?;
        stdout.flush()?;
        Ok::<_, ZipviewError>(bytes)
    });

    match add_request_context(written, request_path)? {
        Some(bytes) => {
            debug!(bytes, path = request_path, "entry written to stdout");
            Ok(())
        }
        None => Err(entry_not_found(target, request_path)),
    }
}

fn entry_not_found(target: ResolvedTarget, request_path: &str) -> anyhow::Error {
    let (archive, entry) = target.into_parts();
    convert_zipview_error(ZipviewError::EntryNotFound { archive, entry }, request_path)
}
