use crate::error::ConfigError;
use crate::parsers::headings::HeadingLevel;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the entity model directory
pub const MODEL_DIR_ENV: &str = "PAGE_ANALYZER_MODEL_DIR";

/// Configuration for the page analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Directory holding the entity model (`model.json`)
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,

    /// Heading levels shown when the caller does not choose any
    #[serde(default = "default_levels")]
    pub default_levels: Vec<HeadingLevel>,

    /// Maximum number of distinct terms in the word cloud
    #[serde(default = "default_max_words")]
    pub max_words: usize,

    /// Count two-word phrases that occur together often as single terms
    #[serde(default = "default_collocations")]
    pub collocations: bool,

    /// Words left out of the word cloud on top of the English list
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_stopwords: Vec<String>,

    /// Request timeout in seconds (HTTP client default when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Refetch cached pages older than this many seconds (never when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_ttl_secs: Option<u64>,

    /// Address the dashboard server binds to
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            model_dir: default_model_dir(),
            default_levels: default_levels(),
            max_words: default_max_words(),
            collocations: default_collocations(),
            extra_stopwords: Vec::new(),
            request_timeout_secs: None,
            cache_ttl_secs: None,
            bind: default_bind(),
        }
    }
}

impl AnalyzerConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let read_err = |source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        };

        let mut file = File::open(path).map_err(read_err)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(read_err)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Apply environment overrides
    pub fn with_env(mut self) -> Self {
        if let Ok(dir) = std::env::var(MODEL_DIR_ENV) {
            if !dir.is_empty() {
                self.model_dir = PathBuf::from(dir);
            }
        }
        self
    }
}

/// Default value for model_dir
fn default_model_dir() -> PathBuf {
    PathBuf::from("./models/entities")
}

/// Default value for default_levels
fn default_levels() -> Vec<HeadingLevel> {
    vec![HeadingLevel::H2]
}

/// Default value for max_words
fn default_max_words() -> usize {
    40
}

/// Default value for collocations
fn default_collocations() -> bool {
    true
}

/// Default value for bind
fn default_bind() -> String {
    "127.0.0.1:8501".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AnalyzerConfig::from_json("{}").unwrap();
        assert_eq!(config.model_dir, PathBuf::from("./models/entities"));
        assert_eq!(config.default_levels, vec![HeadingLevel::H2]);
        assert_eq!(config.max_words, 40);
        assert!(config.collocations);
        assert!(config.extra_stopwords.is_empty());
        assert_eq!(config.request_timeout_secs, None);
        assert_eq!(config.cache_ttl_secs, None);
        assert_eq!(config.bind, "127.0.0.1:8501");
    }

    #[test]
    fn test_config_fields() {
        let json = r#"{
            "model_dir": "/opt/models/en",
            "default_levels": ["h2", "H3"],
            "max_words": 25,
            "collocations": false,
            "extra_stopwords": ["rust"],
            "request_timeout_secs": 10,
            "cache_ttl_secs": 600
        }"#;
        let config = AnalyzerConfig::from_json(json).unwrap();
        assert_eq!(config.model_dir, PathBuf::from("/opt/models/en"));
        assert_eq!(
            config.default_levels,
            vec![HeadingLevel::H2, HeadingLevel::H3]
        );
        assert_eq!(config.max_words, 25);
        assert!(!config.collocations);
        assert_eq!(config.extra_stopwords, vec!["rust".to_string()]);
        assert_eq!(config.request_timeout_secs, Some(10));
        assert_eq!(config.cache_ttl_secs, Some(600));
    }

    #[test]
    fn test_unknown_level_is_rejected() {
        let result = AnalyzerConfig::from_json(r#"{"default_levels": ["h7"]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = AnalyzerConfig::from_file("/nonexistent/page-analyzer.json").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
