use crate::parsers::headings::HeadingLevel;
use crate::parsers::text::normalize_whitespace_in_segment;
use crate::report::{INVALID_URL_WARNING, PLACEHOLDER, heading_label};
use crate::results::{AnalysisOutcome, PageReport};
use htmlescape::{encode_attribute, encode_minimal};
use std::fmt::Write as _;

const STYLE: &str = "body{font-family:sans-serif;max-width:960px;margin:2em auto;padding:0 1em}\
code{background:#f3f3f3;padding:0 .3em}\
.warning{background:#fff4ce;border:1px solid #e0c060;padding:.6em}\
.error{background:#fde7e9;border:1px solid #d06070;padding:.6em}\
table{border-collapse:collapse}td,th{border:1px solid #ddd;padding:.3em .6em}\
pre{background:#f6f8fa;padding:.6em;overflow:auto}";

/// Input and result of one dashboard request
#[derive(Debug, Clone)]
pub struct DashboardView<'a> {
    /// URL text as typed or passed in the query
    pub input: &'a str,
    /// Levels ticked in the form
    pub levels: &'a [HeadingLevel],
    pub outcome: &'a AnalysisOutcome,
}

/// Full dashboard page: input form plus whatever the request produced
pub fn render_dashboard(view: &DashboardView<'_>) -> String {
    let mut body = String::new();
    write_form(&mut body, view.input, view.levels);

    match view.outcome {
        AnalysisOutcome::Empty => {}
        AnalysisOutcome::InvalidUrl { .. } => {
            let _ = write!(body, r#"<p class="warning">{}</p>"#, INVALID_URL_WARNING);
        }
        AnalysisOutcome::LoadFailed { url, message } => {
            let _ = write!(
                body,
                r#"<p class="error">Could not load page <code>{}</code>: {}</p>"#,
                encode_minimal(url),
                encode_minimal(message)
            );
        }
        AnalysisOutcome::Report { report } => write_report(&mut body, report),
    }

    document(&body)
}

/// Standalone page holding only the report
pub fn render_report_page(report: &PageReport) -> String {
    let mut body = String::new();
    write_report(&mut body, report);
    document(&body)
}

fn document(body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Page Analyzer</title>\
         <style>{}</style></head><body><h1>Page Analyzer</h1>{}</body></html>",
        STYLE, body
    )
}

fn write_form(out: &mut String, input: &str, levels: &[HeadingLevel]) {
    let _ = write!(
        out,
        r#"<form method="get" action="/"><label>Enter the URL of a page to analyze <input type="text" name="url" size="60" value="{}"></label><fieldset><legend>Select heading levels to include</legend>"#,
        encode_attribute(input)
    );
    for level in HeadingLevel::ALL {
        let checked = if levels.contains(&level) { " checked" } else { "" };
        let _ = write!(
            out,
            r#"<label><input type="checkbox" name="level" value="{tag}"{checked}> {tag}</label> "#,
            tag = level.tag(),
            checked = checked
        );
    }
    out.push_str(r#"</fieldset><button type="submit">Analyze</button></form>"#);
}

fn write_report(out: &mut String, report: &PageReport) {
    let _ = write!(
        out,
        r#"<h4><a href="{}">Visit Page</a></h4>"#,
        encode_attribute(&report.url)
    );

    let meta = &report.metadata;
    let field = |value: &Option<String>| encode_minimal(value.as_deref().unwrap_or(PLACEHOLDER));
    let _ = write!(
        out,
        "<h2>Page Metadata</h2><ul><li>Title Tag: <code>{}</code></li>\
         <li>Meta Description: <code>{}</code></li><li>H1: <code>{}</code></li></ul>",
        field(&meta.title),
        field(&meta.description),
        field(&meta.h1)
    );

    out.push_str("<h2>Page Headings</h2>");
    for (i, (level, headings)) in report.headings.iter().enumerate() {
        let open = if i == 0 { " open" } else { "" };
        let _ = write!(
            out,
            "<details{}><summary>{}</summary><ul>",
            open,
            heading_label(*level)
        );
        for heading in headings {
            let _ = write!(
                out,
                "<li>{}</li>",
                encode_minimal(&normalize_whitespace_in_segment(heading))
            );
        }
        out.push_str("</ul></details>");
    }

    out.push_str("<h2>Schema Markup</h2>");
    for entry in &report.schema {
        let tag_id = entry.tag_id.as_deref().unwrap_or("None");
        match &entry.object {
            Some(object) => {
                let pretty = serde_json::to_string_pretty(object).unwrap_or_default();
                let _ = write!(
                    out,
                    "<details><summary>{} (tag id: {})</summary><pre>{}</pre></details>",
                    encode_minimal(entry.schema_type.as_deref().unwrap_or("None")),
                    encode_minimal(tag_id),
                    encode_minimal(&pretty)
                );
            }
            None => {
                let _ = write!(
                    out,
                    r#"<p class="error">Malformed JSON-LD (tag id: {}): {}</p>"#,
                    encode_minimal(tag_id),
                    encode_minimal(entry.error.as_deref().unwrap_or("parse error"))
                );
            }
        }
    }

    out.push_str("<h2>Word Cloud</h2>");
    if report.word_cloud.is_empty() {
        out.push_str("<p><em>No words to show.</em></p>");
    } else {
        out.push_str(&report.word_cloud.to_svg());
    }

    out.push_str("<h2>Entities</h2><h3>Entities by Frequency</h3>");
    if report.entities.is_empty() {
        out.push_str("<p><em>No entities found.</em></p>");
        return;
    }
    out.push_str("<table><tr><th>Entity</th><th>Frequency</th><th>Labels</th></tr>");
    for row in report.entities.rows() {
        let _ = write!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            encode_minimal(&row.text),
            row.count,
            encode_minimal(&row.labels.join(", "))
        );
    }
    out.push_str("</table>");
}
