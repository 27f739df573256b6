//! Named-entity recognition.
//!
//! The model is loaded once from `model.json` inside a local directory and
//! then shared read-only. It combines a gazetteer (longest match wins) with
//! an orthographic tagger over runs of capitalized tokens.

use crate::analysis::stopwords::StopWords;
use crate::error::ModelError;
use crate::parsers::text::{Token, normalize_whitespace_in_segment, tokenize};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// File name of the model inside the model directory
pub const MODEL_FILE: &str = "model.json";

/// A recognized entity span
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: String,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
}

/// Anything that can turn text into entity spans
pub trait EntityRecognizer: Send + Sync {
    /// Entities in text order
    fn recognize(&self, text: &str) -> Vec<Entity>;

    /// Entities across independent segments such as paragraphs.
    ///
    /// No span crosses a segment boundary. Offsets index the segments
    /// joined by single spaces.
    fn recognize_segments(&self, segments: &[String]) -> Vec<Entity>;
}

fn shift(mut entity: Entity, offset: usize) -> Entity {
    entity.start += offset;
    entity.end += offset;
    entity
}

/// On-disk model format
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ModelFile {
    #[serde(default)]
    name: String,
    #[serde(default)]
    version: String,
    #[serde(default = "default_label")]
    default_label: String,
    #[serde(default = "default_max_span")]
    max_span: usize,
    #[serde(default)]
    gazetteer: HashMap<String, String>,
    #[serde(default)]
    suffix_labels: HashMap<String, String>,
    #[serde(default)]
    prefix_labels: HashMap<String, String>,
    #[serde(default = "default_connectors")]
    connectors: Vec<String>,
    #[serde(default)]
    non_entity_initials: Vec<String>,
}

fn default_label() -> String {
    "MISC".to_string()
}

fn default_max_span() -> usize {
    6
}

fn default_connectors() -> Vec<String> {
    ["of", "de", "del", "van", "von", "der", "la", "du"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Loaded entity model
#[derive(Debug, Clone)]
pub struct EntityModel {
    name: String,
    version: String,
    default_label: String,
    max_span: usize,
    gazetteer: HashMap<String, String>,
    gazetteer_span: usize,
    suffix_labels: HashMap<String, String>,
    prefix_labels: HashMap<String, String>,
    connectors: HashSet<String>,
    non_entity_initials: HashSet<String>,
    stopwords: StopWords,
}

impl Default for EntityModel {
    fn default() -> Self {
        Self::from_model_file(ModelFile {
            name: "blank".to_string(),
            version: String::new(),
            default_label: default_label(),
            max_span: default_max_span(),
            gazetteer: HashMap::new(),
            suffix_labels: HashMap::new(),
            prefix_labels: HashMap::new(),
            connectors: default_connectors(),
            non_entity_initials: Vec::new(),
        })
    }
}

impl EntityModel {
    /// Loads `model.json` from the given directory.
    ///
    /// A missing directory, an unreadable file or invalid JSON is an error;
    /// callers treat it as fatal at startup.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self, ModelError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(ModelError::NotFound(dir.display().to_string()));
        }

        let path = dir.join(MODEL_FILE);
        let contents = fs::read_to_string(&path).map_err(|source| ModelError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let model = Self::from_json(&contents).map_err(|source| ModelError::Invalid {
            path: path.display().to_string(),
            source,
        })?;

        ::log::info!(
            "Loaded entity model {} {} ({} gazetteer entries) from {}",
            model.name,
            model.version,
            model.gazetteer.len(),
            dir.display()
        );
        Ok(model)
    }

    /// Builds a model from its JSON representation
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let file: ModelFile = serde_json::from_str(json)?;
        Ok(Self::from_model_file(file))
    }

    fn from_model_file(file: ModelFile) -> Self {
        let gazetteer: HashMap<String, String> = file
            .gazetteer
            .into_iter()
            .map(|(surface, label)| (normalize_whitespace_in_segment(&surface), label))
            .filter(|(surface, _)| !surface.is_empty())
            .collect();
        let gazetteer_span = gazetteer
            .keys()
            .map(|surface| tokenize(surface).len())
            .max()
            .unwrap_or(0);

        Self {
            name: file.name,
            version: file.version,
            default_label: file.default_label,
            max_span: file.max_span.max(1),
            gazetteer,
            gazetteer_span,
            suffix_labels: file.suffix_labels,
            prefix_labels: file.prefix_labels,
            connectors: file.connectors.into_iter().collect(),
            non_entity_initials: file.non_entity_initials.into_iter().collect(),
            stopwords: StopWords::english(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Longest gazetteer entry starting at `tokens[0]` within one sentence
    fn match_gazetteer(&self, tokens: &[Token<'_>]) -> Option<(usize, &str)> {
        let longest = self.gazetteer_span.min(tokens.len());
        (1..=longest).rev().find_map(|len| {
            if tokens[1..len].iter().any(|t| t.sentence_start) {
                return None;
            }
            let key = tokens[..len]
                .iter()
                .map(|t| t.text)
                .collect::<Vec<_>>()
                .join(" ");
            self.gazetteer.get(&key).map(|label| (len, label.as_str()))
        })
    }

    /// End (exclusive) of the capitalized run starting at `start`
    fn capitalized_run(&self, tokens: &[Token<'_>], start: usize) -> usize {
        let mut end = start + 1;
        while end < tokens.len() && end - start < self.max_span {
            let token = &tokens[end];
            // Known entries are tagged on their own.
            if token.sentence_start || self.match_gazetteer(&tokens[end..]).is_some() {
                break;
            }
            if token.is_capitalized() && !token.is_numeric() {
                end += 1;
                continue;
            }
            let joins_name = self.connectors.contains(token.text)
                && end + 1 - start < self.max_span
                && tokens
                    .get(end + 1)
                    .is_some_and(|next| next.is_capitalized() && !next.sentence_start)
                && self.match_gazetteer(&tokens[end + 1..]).is_none();
            if joins_name {
                end += 2;
                continue;
            }
            break;
        }
        end
    }

    fn is_sentence_initial_word(&self, token: &Token<'_>) -> bool {
        token.sentence_start
            && (self.stopwords.contains(token.text) || self.non_entity_initials.contains(token.text))
    }

    fn label_for(&self, surface: &str, last: &Token<'_>) -> String {
        self.gazetteer
            .get(surface)
            .or_else(|| self.suffix_labels.get(last.text))
            .unwrap_or(&self.default_label)
            .clone()
    }
}

impl EntityModel {
    /// Capitalized words seen away from a sentence start
    fn mid_sentence_names<'a>(tokens: &[Token<'a>]) -> HashSet<&'a str> {
        tokens
            .iter()
            .filter(|t| !t.sentence_start && t.is_capitalized() && !t.is_numeric())
            .map(|t| t.text)
            .collect()
    }

    /// A lone sentence-initial word is only a name with some other cue
    fn has_name_cue(&self, token: &Token<'_>, names: &HashSet<&str>) -> bool {
        !token.sentence_start
            || self.suffix_labels.contains_key(token.text)
            || names.contains(token.text)
    }

    fn tag(&self, text: &str, tokens: &[Token<'_>], names: &HashSet<&str>) -> Vec<Entity> {
        let mut entities = Vec::new();
        let span = |first: &Token<'_>, last: &Token<'_>, label: String| Entity {
            text: text[first.start..last.end].to_string(),
            label,
            start: first.start,
            end: last.end,
        };

        let mut i = 0;
        while i < tokens.len() {
            if let Some((len, label)) = self.match_gazetteer(&tokens[i..]) {
                entities.push(span(&tokens[i], &tokens[i + len - 1], label.to_string()));
                i += len;
                continue;
            }

            let token = &tokens[i];
            if !token.is_capitalized() || token.is_numeric() || self.is_sentence_initial_word(token) {
                i += 1;
                continue;
            }

            // Titles such as "Dr" label the name that follows.
            let mut start = i;
            let mut hint = None;
            if let Some(label) = self.prefix_labels.get(token.text) {
                let next_is_name = tokens.get(i + 1).is_some_and(|next| {
                    let gap = &text[token.end..next.start];
                    next.is_capitalized()
                        && (!next.sentence_start || gap.trim_start_matches('.').trim().is_empty())
                });
                if next_is_name {
                    hint = Some(label.clone());
                    start = i + 1;
                }
            }

            let end = self.capitalized_run(tokens, start);
            let first = &tokens[start];
            if end - start == 1 && hint.is_none() && !self.has_name_cue(first, names) {
                i = end;
                continue;
            }

            let last = &tokens[end - 1];
            let surface = &text[first.start..last.end];
            let label = hint.unwrap_or_else(|| self.label_for(surface, last));
            entities.push(span(first, last, label));
            i = end;
        }

        entities
    }
}

impl EntityRecognizer for EntityModel {
    fn recognize(&self, text: &str) -> Vec<Entity> {
        let tokens = tokenize(text);
        let names = Self::mid_sentence_names(&tokens);
        let entities = self.tag(text, &tokens, &names);
        ::log::debug!("Recognized {} entities", entities.len());
        entities
    }

    fn recognize_segments(&self, segments: &[String]) -> Vec<Entity> {
        let tokenized: Vec<Vec<Token<'_>>> = segments.iter().map(|s| tokenize(s)).collect();
        // Name evidence is shared across the whole page.
        let names: HashSet<&str> = tokenized
            .iter()
            .flat_map(|tokens| Self::mid_sentence_names(tokens))
            .collect();

        let mut entities = Vec::new();
        let mut offset = 0;
        for (segment, tokens) in segments.iter().zip(&tokenized) {
            entities.extend(
                self.tag(segment, tokens, &names)
                    .into_iter()
                    .map(|e| shift(e, offset)),
            );
            offset += segment.len() + 1;
        }

        ::log::debug!(
            "Recognized {} entities in {} segments",
            entities.len(),
            segments.len()
        );
        entities
    }
}
