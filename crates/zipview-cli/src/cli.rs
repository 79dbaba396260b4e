//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;
use zipview_core::ServeConfig;
use zipview_core::config::DEFAULT_ARCHIVE_EXTENSION;
use zipview_core::config::DEFAULT_ROUTE_PREFIX;

#[derive(Parser)]
#[command(name = "zipview")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read one entry out of an archive under ROOT
    Get(GetArgs),
    /// Show how a request path resolves, or why it is rejected
    Resolve(ResolveArgs),
    /// Run a request through the HTTP handler and show the response
    Request(RequestArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

impl Commands {
    /// Operation name used in JSON output.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Get(_) => "get",
            Self::Resolve(_) => "resolve",
            Self::Request(_) => "request",
            Self::Completion(_) => "completion",
        }
    }
}

/// Options that shape request resolution.
#[derive(clap::Args)]
pub struct ResolveOptions {
    /// File extension that marks an archive (without the dot)
    #[arg(long, value_name = "EXT", default_value = DEFAULT_ARCHIVE_EXTENSION)]
    pub extension: String,

    /// Maximum number of segments in a request path
    #[arg(long, default_value = "32", value_parser = clap::value_parser!(u32).range(2..))]
    pub max_depth: u32,
}

impl ResolveOptions {
    /// Builds a `ServeConfig` with the given route prefix.
    pub fn to_config(&self, route_prefix: &str) -> ServeConfig {
        ServeConfig {
            route_prefix: route_prefix.to_string(),
            archive_extension: self.extension.clone(),
            max_path_depth: self.max_depth as usize,
        }
    }
}

#[derive(clap::Args)]
pub struct GetArgs {
    /// Trusted root directory holding the archives
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Request path: ARCHIVE.zip/PATH/IN/ARCHIVE
    #[arg(value_name = "REQUEST_PATH")]
    pub request_path: String,

    /// Write the entry to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Overwrite the output file if it exists
    #[arg(short, long, requires = "output")]
    pub force: bool,

    #[command(flatten)]
    pub options: ResolveOptions,
}

#[derive(clap::Args)]
pub struct ResolveArgs {
    /// Trusted root directory holding the archives
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Request path: ARCHIVE.zip/PATH/IN/ARCHIVE
    #[arg(value_name = "REQUEST_PATH")]
    pub request_path: String,

    #[command(flatten)]
    pub options: ResolveOptions,
}

#[derive(clap::Args)]
pub struct RequestArgs {
    /// Trusted root directory holding the archives
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// URL path including the route prefix, e.g. /unzip/r.zip/data.json
    #[arg(value_name = "URL_PATH")]
    pub url_path: String,

    /// HTTP method of the request
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: String,

    /// Route prefix the handler is mounted under
    #[arg(long, value_name = "PREFIX", default_value = DEFAULT_ROUTE_PREFIX)]
    pub prefix: String,

    /// Write the response body to a file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Overwrite the output file if it exists
    #[arg(short, long, requires = "output")]
    pub force: bool,

    /// Exit with an error unless the response status is 200
    #[arg(long)]
    pub fail: bool,

    #[command(flatten)]
    pub options: ResolveOptions,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}
