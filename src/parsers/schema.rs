use crate::parsers::html::{element_text, selector};
use scraper::Html;
use serde_json::Value;

const JSON_LD_SELECTOR: &str = r#"script[type="application/ld+json"]"#;

/// A `<script type="application/ld+json">` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaTag {
    id: Option<String>,
    text: String,
}

impl SchemaTag {
    pub fn new(id: Option<String>, text: String) -> Self {
        Self { id, text }
    }

    /// The tag's `id` attribute, if any
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Raw script body
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Collects all JSON-LD script tags in document order
pub fn extract_schema_tags(doc: &Html) -> Vec<SchemaTag> {
    let tags: Vec<SchemaTag> = doc
        .select(&selector(JSON_LD_SELECTOR))
        .map(|element| {
            SchemaTag::new(
                element.value().attr("id").map(str::to_string),
                element_text(element),
            )
        })
        .collect();

    ::log::debug!("Found {} JSON-LD tags", tags.len());
    tags
}

/// Parses the body of one JSON-LD tag.
///
/// Parses again on every call; nothing is cached on the tag.
pub fn parse_schema_object(tag: &SchemaTag) -> Result<Value, serde_json::Error> {
    serde_json::from_str(tag.text())
}

/// The `@type` of a schema object, joined with `, ` when it is an array
pub fn schema_type(object: &Value) -> Option<String> {
    match object.get("@type")? {
        Value::String(s) => Some(s.clone()),
        Value::Array(types) => {
            let names: Vec<&str> = types.iter().filter_map(Value::as_str).collect();
            if names.is_empty() {
                None
            } else {
                Some(names.join(", "))
            }
        }
        _ => None,
    }
}
