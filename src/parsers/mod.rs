pub mod headings;
pub mod html;
pub mod metadata;
pub mod paragraphs;
pub mod schema;
pub mod text;


use crate::error::ExtractError;
use headings::{HeadingLevel, HeadingSet};
use metadata::{PageMetadata, PartialMetadata};
use schema::SchemaTag;
use scraper::Html;
use std::sync::Arc;
use url::Url;

/// A fetched page together with its parsed document tree
///
/// All accessors are read-only views over the tree; nothing here mutates
/// the page after construction.
pub struct Page {
    url: Url,
    text: Arc<str>,
    document: Html,
}

impl Page {
    /// Parses the fetched text into a page
    pub fn new(url: Url, text: Arc<str>) -> Self {
        let document = html::parse(&text);
        Self {
            url,
            text,
            document,
        }
    }

    /// URL the page was fetched from
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Raw fetched text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Title, meta description and first `<h1>`; fails if any is missing
    pub fn metadata(&self) -> Result<PageMetadata, ExtractError> {
        metadata::extract_metadata(&self.document)
    }

    /// Title, meta description and first `<h1>`, each optional
    pub fn partial_metadata(&self) -> PartialMetadata {
        metadata::extract_partial_metadata(&self.document)
    }

    /// Headings for the requested levels
    pub fn headings(&self, levels: &[HeadingLevel]) -> HeadingSet {
        headings::extract_headings(&self.document, levels)
    }

    /// JSON-LD script tags in document order
    pub fn schema_tags(&self) -> Vec<SchemaTag> {
        schema::extract_schema_tags(&self.document)
    }

    /// Trimmed text of every paragraph
    pub fn paragraphs(&self) -> Vec<String> {
        paragraphs::extract_paragraphs(&self.document)
    }

    /// Text of every paragraph, trimmed and joined by single spaces
    pub fn concatenated_paragraphs(&self) -> String {
        paragraphs::concatenate_paragraphs(&self.document)
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("url", &self.url.as_str())
            .field("bytes", &self.text.len())
            .finish()
    }
}
