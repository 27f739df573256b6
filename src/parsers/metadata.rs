use crate::error::ExtractError;
use crate::parsers::html::{element_text, select_first};
use scraper::Html;
use serde::{Deserialize, Serialize};

/// Title, meta description and primary heading of a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub h1: String,
}

/// Same fields as [`PageMetadata`], each of which may be absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub h1: Option<String>,
}

impl PartialMetadata {
    /// Converts into the strict form, naming the first missing field
    pub fn require(self) -> Result<PageMetadata, ExtractError> {
        Ok(PageMetadata {
            title: self.title.ok_or(ExtractError::MissingElement("title"))?,
            description: self
                .description
                .ok_or(ExtractError::MissingElement("meta description"))?,
            h1: self.h1.ok_or(ExtractError::MissingElement("h1"))?,
        })
    }
}

/// Extracts the first `<title>`, `<meta name="description">` content and
/// `<h1>`, failing when any of them is missing.
pub fn extract_metadata(doc: &Html) -> Result<PageMetadata, ExtractError> {
    extract_partial_metadata(doc).require()
}

/// Extracts the same fields as [`extract_metadata`], leaving absent ones as `None`
pub fn extract_partial_metadata(doc: &Html) -> PartialMetadata {
    let title = select_first(doc, "title").map(element_text);
    let description = select_first(doc, r#"meta[name="description"]"#)
        .and_then(|meta| meta.value().attr("content"))
        .map(str::to_string);
    let h1 = select_first(doc, "h1").map(element_text);

    ::log::debug!(
        "Metadata: title={} description={} h1={}",
        title.is_some(),
        description.is_some(),
        h1.is_some()
    );

    PartialMetadata {
        title,
        description,
        h1,
    }
}
