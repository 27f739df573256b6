pub mod html;
pub mod markdown;
pub mod server;

use crate::parsers::headings::HeadingLevel;
use crate::results::PageReport;

/// Shown in place of a missing metadata field
pub const PLACEHOLDER: &str = "(missing)";

/// Warning shown for input that is not a valid URL
pub const INVALID_URL_WARNING: &str = "Please enter a valid URL";

/// Report output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Markdown,
    Json,
    Html,
}

/// Renders a report in the requested format
pub fn render(report: &PageReport, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Markdown => Ok(markdown::render(report)),
        OutputFormat::Json => serde_json::to_string_pretty(report),
        OutputFormat::Html => Ok(html::render_report_page(report)),
    }
}

/// Section label for a heading level, e.g. `H2s`
pub fn heading_label(level: HeadingLevel) -> String {
    format!("{}s", level.tag().to_uppercase())
}
