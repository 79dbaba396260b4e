//! Output formatter trait for CLI results.

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

/// Result of a `get` command that wrote to a file.
#[derive(Debug)]
pub struct GetReport {
    pub archive: PathBuf,
    pub entry: String,
    pub media_type: Option<&'static str>,
    pub bytes_written: u64,
    pub output: PathBuf,
}

/// Result of a `resolve` command.
#[derive(Debug)]
pub struct ResolveReport {
    pub request_path: String,
    pub archive: PathBuf,
    pub entry: String,
    pub media_type: Option<&'static str>,
}

/// Result of a `request` command.
#[derive(Debug)]
pub struct ResponseReport<'a> {
    pub method: &'a str,
    pub url_path: &'a str,
    pub status: u16,
    pub headers: &'a [(String, String)],
    pub body: &'a [u8],
    /// Category of the failure behind a non-200 response.
    pub cause: Option<&'static str>,
    pub output: Option<&'a PathBuf>,
}

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the result of writing an entry to a file
    fn format_get_result(&self, report: &GetReport) -> Result<()>;

    /// Format a resolved request path
    fn format_resolution(&self, report: &ResolveReport) -> Result<()>;

    /// Format a handler response
    fn format_response(&self, report: &ResponseReport<'_>) -> Result<()>;

    /// Format error message
    fn format_error(&self, error: &anyhow::Error);

    /// Format warning message
    fn format_warning(&self, message: &str);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> JsonOutput<()> {
        JsonOutput {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
        }
    }
}
