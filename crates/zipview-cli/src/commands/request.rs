//! Request command implementation

use crate::cli::RequestArgs;
use crate::commands::check_output_path;
use crate::output::OutputFormatter;
use crate::output::ResponseReport;
use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use zipview_core::BufferedResponse;
use zipview_core::TrustedRoot;
use zipview_core::UnzipHandler;
use zipview_core::handler::Outcome;
use zipview_core::handler::STATUS_OK;

pub fn execute(args: &RequestArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let root = TrustedRoot::new(args.root.clone())
        .with_context(|| format!("Cannot use '{}' as the root", args.root.display()))?;
    let handler = UnzipHandler::new(root, args.options.to_config(&args.prefix));

    if let Some(output) = &args.output {
        check_output_path(output, args.force, formatter)?;
    }

    let mut response = BufferedResponse::new();
    let outcome = handler.handle(&args.method, &args.url_path, &mut response);

    // Only a served entry produces a body worth saving.
    let saved = match (&args.output, &outcome) {
        (Some(output), Outcome::Served { .. }) => {
            std::fs::write(output, response.body_bytes())
                .with_context(|| format!("Failed to write body to '{}'", output.display()))?;
            Some(output)
        }
        _ => None,
    };

    let cause = match &outcome {
        Outcome::NotFound { cause } => Some(cause.category()),
        Outcome::MethodNotAllowed => Some("method-not-allowed"),
        Outcome::Served { .. } => None,
    };

    formatter.format_response(&ResponseReport {
        method: &args.method,
        url_path: &args.url_path,
        status: response.status(),
        headers: response.headers(),
        body: response.body_bytes(),
        cause,
        output: saved,
    })?;

    if args.fail && outcome.status() != STATUS_OK {
        bail!(
            "Request failed with status {} ({})",
            outcome.status(),
            cause.unwrap_or("unknown")
        );
    }

    Ok(())
}
