//! Output formatting module.

mod formatter;
mod human;
mod json;

pub use formatter::GetReport;
pub use formatter::OutputFormatter;
pub use formatter::ResolveReport;
pub use formatter::ResponseReport;

use human::HumanFormatter;
use json::JsonFormatter;

/// Creates an output formatter based on CLI flags
pub fn create_formatter(
    json: bool,
    verbose: bool,
    quiet: bool,
    operation: &'static str,
) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter::new(operation))
    } else {
        Box::new(HumanFormatter::new(verbose, quiet))
    }
}
