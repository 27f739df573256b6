use crate::parsers::text::normalize_whitespace_in_segment;
use crate::report::{PLACEHOLDER, heading_label};
use crate::results::PageReport;
use std::fmt::Write as _;

/// Renders a report as Markdown
pub fn render(report: &PageReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Page Analyzer\n");
    let _ = writeln!(out, "#### [Visit Page]({})\n", report.url);

    let meta = &report.metadata;
    let _ = writeln!(out, "## Page Metadata\n");
    let _ = writeln!(out, "- Title Tag: `{}`", field(meta.title.as_deref()));
    let _ = writeln!(
        out,
        "- Meta Description: `{}`",
        field(meta.description.as_deref())
    );
    let _ = writeln!(out, "- H1: `{}`\n", field(meta.h1.as_deref()));

    let _ = writeln!(out, "## Page Headings\n");
    for (level, headings) in &report.headings {
        let _ = writeln!(out, "### {}\n", heading_label(*level));
        for heading in headings {
            let _ = writeln!(out, "- {}", normalize_whitespace_in_segment(heading));
        }
        out.push('\n');
    }

    let _ = writeln!(out, "## Schema Markup\n");
    for entry in &report.schema {
        let tag_id = entry.tag_id.as_deref().unwrap_or("None");
        match (&entry.object, &entry.error) {
            (Some(object), _) => {
                let _ = writeln!(
                    out,
                    "### {} (tag id: {})\n",
                    entry.schema_type.as_deref().unwrap_or("None"),
                    tag_id
                );
                let pretty = serde_json::to_string_pretty(object).unwrap_or_default();
                let _ = writeln!(out, "```json\n{}\n```\n", pretty);
            }
            (None, error) => {
                let _ = writeln!(out, "### Malformed JSON-LD (tag id: {})\n", tag_id);
                let _ = writeln!(out, "> {}\n", error.as_deref().unwrap_or("parse error"));
            }
        }
    }

    let _ = writeln!(out, "## Word Cloud\n");
    if report.word_cloud.is_empty() {
        let _ = writeln!(out, "_No words to show._\n");
    } else {
        let terms: Vec<String> = report
            .word_cloud
            .words
            .iter()
            .map(|w| format!("{} ({})", w.text, w.count))
            .collect();
        let _ = writeln!(out, "{}\n", terms.join(", "));
    }

    let _ = writeln!(out, "## Entities\n");
    let _ = writeln!(out, "### Entities by Frequency\n");
    if report.entities.is_empty() {
        let _ = writeln!(out, "_No entities found._");
    } else {
        let _ = writeln!(out, "| Entity | Frequency | Labels |");
        let _ = writeln!(out, "|---|---|---|");
        for row in report.entities.rows() {
            let _ = writeln!(
                out,
                "| {} | {} | {} |",
                row.text.replace('|', "\\|"),
                row.count,
                row.labels.join(", ")
            );
        }
    }

    out
}

fn field(value: Option<&str>) -> &str {
    value.unwrap_or(PLACEHOLDER)
}
