use crate::parsers::html::{element_text, selector};
use scraper::Html;

/// Trimmed text of every `<p>`, in document order, empty ones included
pub fn extract_paragraphs(doc: &Html) -> Vec<String> {
    let paragraphs: Vec<String> = doc
        .select(&selector("p"))
        .map(|p| element_text(p).trim().to_string())
        .collect();

    ::log::debug!("Found {} paragraphs", paragraphs.len());
    paragraphs
}

/// Joins the trimmed text of every `<p>` with single spaces, in document order
pub fn concatenate_paragraphs(doc: &Html) -> String {
    extract_paragraphs(doc).join(" ")
}
