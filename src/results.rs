use crate::analysis::frequency::EntityFrequencyTable;
use crate::analysis::wordcloud::WordCloud;
use crate::parsers::headings::HeadingSet;
use crate::parsers::metadata::PartialMetadata;
use crate::parsers::schema::{SchemaTag, parse_schema_object, schema_type};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One JSON-LD tag as shown in a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaEntry {
    /// The tag's `id` attribute
    pub tag_id: Option<String>,
    /// `@type` of the parsed object
    pub schema_type: Option<String>,
    /// Parsed object, absent when the tag held malformed JSON
    pub object: Option<Value>,
    /// Parse error for malformed tags
    pub error: Option<String>,
}

impl SchemaEntry {
    /// Parses a tag, recording a parse failure instead of returning it
    pub fn from_tag(tag: &SchemaTag) -> Self {
        match parse_schema_object(tag) {
            Ok(object) => Self {
                tag_id: tag.id().map(str::to_string),
                schema_type: schema_type(&object),
                object: Some(object),
                error: None,
            },
            Err(e) => {
                ::log::warn!(
                    "Skipping malformed JSON-LD tag (id: {}): {}",
                    tag.id().unwrap_or("none"),
                    e
                );
                Self {
                    tag_id: tag.id().map(str::to_string),
                    schema_type: None,
                    object: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Everything derived from one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageReport {
    pub url: String,
    pub scheme: String,
    pub host: Option<String>,
    pub path: String,
    pub metadata: PartialMetadata,
    pub headings: HeadingSet,
    pub schema: Vec<SchemaEntry>,
    pub word_cloud: WordCloud,
    pub entities: EntityFrequencyTable,
}

/// Result of handling one analysis request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    /// No URL was supplied
    Empty,
    /// The supplied text is not a valid URL; nothing was fetched
    InvalidUrl { input: String },
    /// The page could not be fetched
    LoadFailed { url: String, message: String },
    /// The page was analyzed
    Report { report: Box<PageReport> },
}
