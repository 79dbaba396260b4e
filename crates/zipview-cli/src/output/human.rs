//! Human-readable output formatter with colors and styling.

use super::formatter::GetReport;
use super::formatter::OutputFormatter;
use super::formatter::ResolveReport;
use super::formatter::ResponseReport;
use crate::progress::humanize_bytes;
use anyhow::Result;
use console::Term;
use console::style;
use std::io::Write;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
    err_term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
            err_term: Term::stderr(),
        }
    }

    fn status_line(&self, status: u16) -> String {
        let reason = match status {
            200 => "OK",
            404 => "Not Found",
            405 => "Method Not Allowed",
            _ => "",
        };
        let line = format!("{status} {reason}");
        if !self.use_colors {
            return line;
        }
        if status == 200 {
            style(line).green().bold().to_string()
        } else {
            style(line).red().bold().to_string()
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_get_result(&self, report: &GetReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if self.use_colors {
            self.term.write_line(&format!(
                "{} Wrote {}",
                style("✓").green().bold(),
                report.output.display()
            ))?;
        } else {
            self.term
                .write_line(&format!("Wrote {}", report.output.display()))?;
        }

        self.term.write_line(&format!(
            "  Size: {}",
            humanize_bytes(report.bytes_written)
        ))?;

        if self.verbose {
            self.term
                .write_line(&format!("  Archive: {}", report.archive.display()))?;
            self.term.write_line(&format!("  Entry: {}", report.entry))?;
            self.term.write_line(&format!(
                "  Media type: {}",
                report.media_type.unwrap_or("-")
            ))?;
        }

        Ok(())
    }

    fn format_resolution(&self, report: &ResolveReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if self.use_colors {
            self.term.write_line(&format!(
                "{} {}",
                style("✓").green().bold(),
                report.request_path
            ))?;
        } else {
            self.term.write_line(&report.request_path)?;
        }

        self.term
            .write_line(&format!("  Archive: {}", report.archive.display()))?;
        self.term.write_line(&format!("  Entry: {}", report.entry))?;
        self.term.write_line(&format!(
            "  Media type: {}",
            report.media_type.unwrap_or("-")
        ))?;

        Ok(())
    }

    fn format_response(&self, report: &ResponseReport<'_>) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if self.verbose {
            self.term
                .write_line(&format!("> {} {}", report.method, report.url_path))?;
        }
        self.term.write_line(&self.status_line(report.status))?;
        for (name, value) in report.headers {
            self.term.write_line(&format!("{name}: {value}"))?;
        }
        if self.verbose {
            if let Some(cause) = report.cause {
                self.err_term.write_line(&format!("  cause: {cause}"))?;
            }
        }

        if let Some(path) = report.output {
            self.term.write_line("")?;
            self.term.write_line(&format!(
                "Body ({}) written to {}",
                humanize_bytes(report.body.len() as u64),
                path.display()
            ))?;
        } else if !report.body.is_empty() {
            self.term.write_line("")?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(report.body)?;
            stdout.flush()?;
        }

        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("ERROR: {error:?}"));
        }
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("WARNING: {message}"));
        }
    }
}
