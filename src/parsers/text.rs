use regex::Regex;
use std::sync::LazyLock;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+(?:['’\-&.]\w+)*").expect("token regex should be valid"));

/// A word-like token with its byte span in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
    /// First token of a sentence (or of the whole text)
    pub sentence_start: bool,
}

impl Token<'_> {
    /// Starts with an uppercase letter
    pub fn is_capitalized(&self) -> bool {
        self.text.chars().next().is_some_and(char::is_uppercase)
    }

    /// Consists only of digits and separators
    pub fn is_numeric(&self) -> bool {
        self.text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '\''))
    }
}

/// Splits text into tokens, marking the first token after `.`, `!` or `?`
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut last_end = 0;

    for m in TOKEN_RE.find_iter(text) {
        let gap = &text[last_end..m.start()];
        let sentence_start = tokens.is_empty() || gap.contains(['.', '!', '?']);
        tokens.push(Token {
            text: m.as_str(),
            start: m.start(),
            end: m.end(),
            sentence_start,
        });
        last_end = m.end();
    }

    tokens
}

/// Collapses runs of whitespace to single spaces and trims the ends
pub fn normalize_whitespace_in_segment(segment: &str) -> String {
    segment.split_whitespace().collect::<Vec<_>>().join(" ")
}
