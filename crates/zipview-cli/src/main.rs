//! Zipview CLI - Command-line utility for reading single entries out of zip
//! archives under a trusted root.

mod cli;
mod commands;
mod error;
mod output;
mod progress;

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet, cli.command.name());

    let result = match &cli.command {
        cli::Commands::Get(args) => commands::get::execute(args, &*formatter, cli.json, cli.quiet),
        cli::Commands::Resolve(args) => commands::resolve::execute(args, &*formatter),
        cli::Commands::Request(args) => commands::request::execute(args, &*formatter),
        cli::Commands::Completion(args) => {
            commands::completion::execute(args.shell);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            formatter.format_error(&e);
            ExitCode::FAILURE
        }
    }
}

/// Initializes tracing on stderr.
///
/// `RUST_LOG` wins when set, e.g. `RUST_LOG=zipview_core=trace`.
fn init_logging(verbose: bool, quiet: bool) {
    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("zipview=debug,zipview_core=debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::new("zipview=warn,zipview_core=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_line_number(verbose)
        .with_writer(std::io::stderr)
        .init();

    debug!("Logging initialized (verbose={verbose})");
}
