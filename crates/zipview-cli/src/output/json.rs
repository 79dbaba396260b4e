//! JSON output formatter for machine-readable results.

use super::formatter::GetReport;
use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use super::formatter::ResolveReport;
use super::formatter::ResponseReport;
use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::io::{self};

pub struct JsonFormatter {
    operation: &'static str,
}

impl JsonFormatter {
    pub const fn new(operation: &'static str) -> Self {
        Self { operation }
    }

    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct EntryOutput<'a> {
    archive: String,
    entry: &'a str,
    media_type: Option<&'a str>,
}

impl OutputFormatter for JsonFormatter {
    fn format_get_result(&self, report: &GetReport) -> Result<()> {
        #[derive(Serialize)]
        struct GetOutput<'a> {
            #[serde(flatten)]
            entry: EntryOutput<'a>,
            output_path: String,
            bytes_written: u64,
        }

        let data = GetOutput {
            entry: EntryOutput {
                archive: report.archive.display().to_string(),
                entry: &report.entry,
                media_type: report.media_type,
            },
            output_path: report.output.display().to_string(),
            bytes_written: report.bytes_written,
        };

        Self::output(&JsonOutput::success(self.operation, data))
    }

    fn format_resolution(&self, report: &ResolveReport) -> Result<()> {
        #[derive(Serialize)]
        struct ResolveOutput<'a> {
            request_path: &'a str,
            #[serde(flatten)]
            entry: EntryOutput<'a>,
        }

        let data = ResolveOutput {
            request_path: &report.request_path,
            entry: EntryOutput {
                archive: report.archive.display().to_string(),
                entry: &report.entry,
                media_type: report.media_type,
            },
        };

        Self::output(&JsonOutput::success(self.operation, data))
    }

    fn format_response(&self, report: &ResponseReport<'_>) -> Result<()> {
        #[derive(Serialize)]
        struct ResponseOutput<'a> {
            method: &'a str,
            url_path: &'a str,
            status: u16,
            headers: BTreeMap<&'a str, &'a str>,
            body_bytes: usize,
            #[serde(skip_serializing_if = "Option::is_none")]
            cause: Option<&'a str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            output_path: Option<String>,
        }

        let data = ResponseOutput {
            method: report.method,
            url_path: report.url_path,
            status: report.status,
            headers: report
                .headers
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str()))
                .collect(),
            body_bytes: report.body.len(),
            cause: report.cause,
            output_path: report.output.map(|path| path.display().to_string()),
        };

        Self::output(&JsonOutput::success(self.operation, data))
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::<()>::error(self.operation, format!("{error:#}"));
        let _ = Self::output(&output);
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData<'a> {
            message: &'a str,
        }

        let output = JsonOutput::success("warning", WarningData { message });
        let _ = Self::output(&output);
    }
}
