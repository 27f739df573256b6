use crate::error::ConfigError;
use crate::parsers::html::{element_text, selector};
use scraper::Html;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// HTML heading level, `h1` through `h6`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingLevel {
    /// All levels in ascending order
    pub const ALL: [HeadingLevel; 6] = [
        HeadingLevel::H1,
        HeadingLevel::H2,
        HeadingLevel::H3,
        HeadingLevel::H4,
        HeadingLevel::H5,
        HeadingLevel::H6,
    ];

    /// Lowercase tag name
    pub fn tag(&self) -> &'static str {
        match self {
            HeadingLevel::H1 => "h1",
            HeadingLevel::H2 => "h2",
            HeadingLevel::H3 => "h3",
            HeadingLevel::H4 => "h4",
            HeadingLevel::H5 => "h5",
            HeadingLevel::H6 => "h6",
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for HeadingLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        HeadingLevel::ALL
            .into_iter()
            .find(|level| level.tag() == lower)
            .ok_or_else(|| ConfigError::HeadingLevel(s.to_string()))
    }
}

impl TryFrom<String> for HeadingLevel {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HeadingLevel> for String {
    fn from(level: HeadingLevel) -> Self {
        level.tag().to_string()
    }
}

/// Heading texts per level; iterates in level order
pub type HeadingSet = BTreeMap<HeadingLevel, Vec<String>>;

/// Extracts the text of every heading for each requested level.
///
/// Levels with no matching elements map to an empty list.
pub fn extract_headings(doc: &Html, levels: &[HeadingLevel]) -> HeadingSet {
    let mut headings = HeadingSet::new();

    for &level in levels {
        if headings.contains_key(&level) {
            continue;
        }
        let texts: Vec<String> = doc
            .select(&selector(level.tag()))
            .map(element_text)
            .collect();
        ::log::debug!("Found {} {} headings", texts.len(), level);
        headings.insert(level, texts);
    }

    headings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_levels() {
        assert_eq!("h1".parse::<HeadingLevel>().unwrap(), HeadingLevel::H1);
        assert_eq!("H4".parse::<HeadingLevel>().unwrap(), HeadingLevel::H4);
        assert_eq!(" h6 ".parse::<HeadingLevel>().unwrap(), HeadingLevel::H6);
        assert!("h7".parse::<HeadingLevel>().is_err());
        assert!("header".parse::<HeadingLevel>().is_err());
    }

    #[test]
    fn test_levels_sort_like_labels() {
        let mut levels = vec![HeadingLevel::H3, HeadingLevel::H1, HeadingLevel::H2];
        levels.sort();
        let labels: Vec<_> = levels.iter().map(|l| l.tag()).collect();
        assert_eq!(labels, vec!["h1", "h2", "h3"]);
    }

    #[test]
    fn test_serde_as_tag_name() {
        let json = serde_json::to_string(&HeadingLevel::H5).unwrap();
        assert_eq!(json, "\"h5\"");
        let level: HeadingLevel = serde_json::from_str("\"H2\"").unwrap();
        assert_eq!(level, HeadingLevel::H2);
    }
}
