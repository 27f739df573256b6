//! Frequency-weighted word cloud layout.
//!
//! Term selection is deterministic: the same text and stopword set always
//! give the same terms in the same order. Placement walks an Archimedean
//! spiral out from the canvas centre and is deterministic as well.

use crate::analysis::stopwords::StopWords;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::LazyLock;

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w[\w']+").expect("word regex should be valid"));

/// Approximate glyph width as a fraction of the font size
const GLYPH_WIDTH: f64 = 0.6;

/// Radians advanced per spiral step
const SPIRAL_STEP: f64 = 0.1;

const PALETTE: &[&str] = &[
    "#440154", "#3b528b", "#21908d", "#5dc963", "#e3a21a", "#b5367a", "#2c7fb8",
];

/// Word cloud generation options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordCloudOptions {
    /// Maximum number of distinct terms
    pub max_words: usize,
    pub width: u32,
    pub height: u32,
    pub max_font_size: f64,
    pub min_font_size: f64,
    /// How much font size follows relative frequency (0 = rank only, 1 = frequency only)
    pub relative_scaling: f64,
    /// Shrink applied when a word does not fit
    pub font_step: f64,
    /// Count two-word phrases as single terms when they score as
    /// collocations (Dunning log-likelihood above `collocation_threshold`)
    pub collocations: bool,
    pub collocation_threshold: f64,
}

impl Default for WordCloudOptions {
    fn default() -> Self {
        Self {
            max_words: 40,
            width: 400,
            height: 200,
            max_font_size: 80.0,
            min_font_size: 4.0,
            relative_scaling: 0.5,
            font_step: 1.0,
            collocations: true,
            collocation_threshold: 30.0,
        }
    }
}

/// A selected term and its frequency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub text: String,
    pub count: usize,
}

/// A term placed on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedWord {
    pub text: String,
    pub count: usize,
    /// Frequency relative to the most frequent term, in (0, 1]
    pub weight: f64,
    pub font_size: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PlacedWord {
    fn overlaps(&self, x: f64, y: f64, width: f64, height: f64) -> bool {
        x < self.x + self.width
            && self.x < x + width
            && y < self.y + self.height
            && self.y < y + height
    }
}

/// Layout of the most frequent terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordCloud {
    pub width: u32,
    pub height: u32,
    pub words: Vec<PlacedWord>,
}

impl WordCloud {
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Renders the layout as a standalone SVG document
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
            w = self.width,
            h = self.height
        );
        for (i, word) in self.words.iter().enumerate() {
            let _ = write!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" font-size="{:.0}" fill="{}">{}</text>"#,
                word.x,
                word.y + word.height * 0.8,
                word.font_size,
                PALETTE[i % PALETTE.len()],
                htmlescape::encode_minimal(&word.text)
            );
        }
        svg.push_str("</svg>");
        svg
    }
}

/// Builds a word cloud with the English stopwords and default options
pub fn generate_wordcloud(text: &str) -> WordCloud {
    generate_wordcloud_with(text, &StopWords::english(), &WordCloudOptions::default())
}

/// Builds a word cloud with explicit stopwords and options
pub fn generate_wordcloud_with(
    text: &str,
    stopwords: &StopWords,
    options: &WordCloudOptions,
) -> WordCloud {
    let terms = select_terms(text, stopwords, options);
    let words = layout(&terms, options);
    ::log::debug!(
        "Word cloud placed {} of {} terms",
        words.len(),
        terms.len()
    );

    WordCloud {
        width: options.width,
        height: options.height,
        words,
    }
}

/// lowercase key -> surface form -> (count, first position)
type Forms = HashMap<String, HashMap<String, (usize, usize)>>;

/// Counts words, drops stopwords and numbers, merges case and plural
/// variants, optionally folds collocations into phrases, and returns the
/// top `max_words` terms by count.
pub fn select_terms(text: &str, stopwords: &StopWords, options: &WordCloudOptions) -> Vec<Term> {
    let words: Vec<&str> = WORD_RE
        .find_iter(text)
        .map(|m| {
            let word = m.as_str();
            word.strip_suffix("'s")
                .or_else(|| word.strip_suffix("'S"))
                .unwrap_or(word)
        })
        .filter(|word| !word.is_empty() && !word.chars().all(|c| c.is_numeric()))
        .collect();

    let mut forms = Forms::new();
    for (position, word) in words.iter().enumerate() {
        if !stopwords.contains(word) {
            count_form(&mut forms, word, position);
        }
    }
    merge_plurals(&mut forms);

    let mut counted = collapse(forms);
    if options.collocations {
        add_collocations(&mut counted, &words, stopwords, options.collocation_threshold);
    }

    let mut terms: Vec<Term> = counted.into_values().filter(|t| t.count > 0).collect();
    terms.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.text.cmp(&b.text)));
    terms.truncate(options.max_words);
    terms
}

fn count_form(forms: &mut Forms, surface: &str, position: usize) {
    let entry = forms
        .entry(surface.to_lowercase())
        .or_default()
        .entry(surface.to_string())
        .or_insert((0, position));
    entry.0 += 1;
}

/// Total count and most common surface form per key
fn collapse(forms: Forms) -> HashMap<String, Term> {
    forms
        .into_iter()
        .filter_map(|(key, surfaces)| {
            let count = surfaces.values().map(|(c, _)| c).sum();
            let text = surfaces
                .into_iter()
                .max_by(|(_, (ca, pa)), (_, (cb, pb))| ca.cmp(cb).then(pb.cmp(pa)))
                .map(|(surface, _)| surface)?;
            Some((key, Term { text, count }))
        })
        .collect()
}

/// Folds `dogs` into `dog` when both occur
fn merge_plurals(forms: &mut Forms) {
    let plurals: Vec<String> = forms
        .keys()
        .filter(|key| key.ends_with('s') && !key.ends_with("ss") && key.len() > 2)
        .filter(|key| forms.contains_key(&key[..key.len() - 1]))
        .cloned()
        .collect();

    for plural in plurals {
        let Some(surfaces) = forms.remove(&plural) else {
            continue;
        };
        let singular = forms.entry(plural[..plural.len() - 1].to_string()).or_default();
        let total: usize = surfaces.values().map(|(c, _)| c).sum();
        // Plural occurrences count towards the singular's most common form.
        if let Some((_, (count, _))) = singular
            .iter_mut()
            .max_by(|(_, (ca, pa)), (_, (cb, pb))| ca.cmp(cb).then(pb.cmp(pa)))
        {
            *count += total;
        }
    }
}

/// Adds adjacent word pairs that score as collocations and takes their
/// occurrences away from the single words.
///
/// Pairs are built before stopwords are removed, so `thank you very much`
/// never yields `thank much`.
fn add_collocations(
    terms: &mut HashMap<String, Term>,
    words: &[&str],
    stopwords: &StopWords,
    threshold: f64,
) {
    let n_words = words.iter().filter(|w| !stopwords.contains(w)).count();

    let mut forms = Forms::new();
    for (position, pair) in words.windows(2).enumerate() {
        if pair.iter().any(|w| stopwords.contains(w)) {
            continue;
        }
        count_form(&mut forms, &format!("{} {}", pair[0], pair[1]), position);
    }
    merge_plurals(&mut forms);

    let original: HashMap<String, usize> =
        terms.iter().map(|(key, t)| (key.clone(), t.count)).collect();

    for (key, bigram) in collapse(forms) {
        let Some((first, second)) = key.split_once(' ') else {
            continue;
        };
        let (Some(first), Some(second)) = (unigram_key(&original, first), unigram_key(&original, second))
        else {
            continue;
        };

        let score = collocation_score(bigram.count, original[&first], original[&second], n_words);
        if score > threshold {
            for word in [&first, &second] {
                if let Some(term) = terms.get_mut(word) {
                    term.count = term.count.saturating_sub(bigram.count);
                }
            }
            terms.insert(key, bigram);
        }
    }
}

/// Key a lowercase word was counted under, following plural merging
fn unigram_key(counts: &HashMap<String, usize>, word: &str) -> Option<String> {
    if counts.contains_key(word) {
        return Some(word.to_string());
    }
    let singular = word.strip_suffix('s')?;
    counts.contains_key(singular).then(|| singular.to_string())
}

fn log_likelihood(k: f64, n: f64, x: f64) -> f64 {
    x.max(1e-10).ln() * k + (1.0 - x).max(1e-10).ln() * (n - k)
}

/// Dunning's likelihood ratio for `word1 word2` occurring together
fn collocation_score(count_pair: usize, count1: usize, count2: usize, n_words: usize) -> f64 {
    if n_words <= count1 || n_words <= count2 {
        return 0.0;
    }

    let (n, c12, c1, c2) = (
        n_words as f64,
        count_pair as f64,
        count1 as f64,
        count2 as f64,
    );
    let p = c2 / n;
    let p1 = c12 / c1;
    let p2 = (c2 - c12) / (n - c1);

    let score = log_likelihood(c12, c1, p) + log_likelihood(c2 - c12, n - c1, p)
        - log_likelihood(c12, c1, p1)
        - log_likelihood(c2 - c12, n - c1, p2);
    -2.0 * score
}

fn layout(terms: &[Term], options: &WordCloudOptions) -> Vec<PlacedWord> {
    let Some(max_count) = terms.first().map(|t| t.count as f64) else {
        return Vec::new();
    };

    let canvas_w = options.width as f64;
    let canvas_h = options.height as f64;
    let rs = options.relative_scaling.clamp(0.0, 1.0);

    let mut placed: Vec<PlacedWord> = Vec::with_capacity(terms.len());
    let mut font_size = options.max_font_size;
    let mut last_weight = 1.0;

    for term in terms {
        let weight = term.count as f64 / max_count;
        if !placed.is_empty() {
            font_size = ((rs * (weight / last_weight) + (1.0 - rs)) * font_size).round();
        }
        last_weight = weight;

        let chars = term.text.chars().count().max(1) as f64;
        // Never start wider or taller than the canvas.
        font_size = font_size
            .min(canvas_w / (chars * GLYPH_WIDTH))
            .min(canvas_h)
            .floor();

        let mut position = None;
        while font_size >= options.min_font_size {
            let width = chars * font_size * GLYPH_WIDTH;
            let height = font_size;
            position = find_position(&placed, width, height, canvas_w, canvas_h);
            if position.is_some() {
                break;
            }
            font_size -= options.font_step.max(0.5);
        }

        let Some((x, y)) = position else {
            // Canvas is full.
            break;
        };

        placed.push(PlacedWord {
            text: term.text.clone(),
            count: term.count,
            weight,
            font_size,
            x,
            y,
            width: chars * font_size * GLYPH_WIDTH,
            height: font_size,
        });
    }

    placed
}

/// Walks a spiral from the centre and returns the first free top-left corner
fn find_position(
    placed: &[PlacedWord],
    width: f64,
    height: f64,
    canvas_w: f64,
    canvas_h: f64,
) -> Option<(f64, f64)> {
    if width > canvas_w || height > canvas_h {
        return None;
    }

    let cx = canvas_w / 2.0;
    let cy = canvas_h / 2.0;
    let aspect = canvas_h / canvas_w;
    let max_radius = (canvas_w * canvas_w + canvas_h * canvas_h).sqrt() / 2.0;

    let mut t: f64 = 0.0;
    loop {
        let radius = t;
        if radius > max_radius {
            return None;
        }

        let x = cx + radius * t.cos() - width / 2.0;
        let y = cy + radius * aspect * t.sin() - height / 2.0;
        let inside = x >= 0.0 && y >= 0.0 && x + width <= canvas_w && y + height <= canvas_h;
        if inside && !placed.iter().any(|p| p.overlaps(x, y, width, height)) {
            return Some((x, y));
        }

        t += SPIRAL_STEP;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms_with(text: &str, options: &WordCloudOptions) -> Vec<(String, usize)> {
        select_terms(text, &StopWords::english(), options)
            .into_iter()
            .map(|t| (t.text, t.count))
            .collect()
    }

    fn terms(text: &str) -> Vec<(String, usize)> {
        terms_with(text, &WordCloudOptions::default())
    }

    #[test]
    fn test_empty_text_gives_empty_cloud() {
        let cloud = generate_wordcloud("");
        assert!(cloud.is_empty());
        assert_eq!(cloud.width, 400);
        assert_eq!(cloud.height, 200);
        assert_eq!(
            cloud.to_svg(),
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="400" height="200" viewBox="0 0 400 200" font-family="sans-serif"></svg>"#
        );
    }

    #[test]
    fn test_only_stopwords_gives_empty_cloud() {
        assert!(generate_wordcloud("the and of it is was").is_empty());
    }

    #[test]
    fn test_terms_sorted_by_count() {
        assert_eq!(
            terms("rust cargo rust tokio cargo rust"),
            vec![
                ("rust".to_string(), 3),
                ("cargo".to_string(), 2),
                ("tokio".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_ties_are_alphabetical() {
        assert_eq!(
            terms("zebra apple mango"),
            vec![
                ("apple".to_string(), 1),
                ("mango".to_string(), 1),
                ("zebra".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_case_variants_merge_to_most_common_form() {
        assert_eq!(terms("Rust rust rust"), vec![("rust".to_string(), 3)]);
        assert_eq!(terms("Tokio tokio"), vec![("Tokio".to_string(), 2)]);
    }

    #[test]
    fn test_plurals_possessives_and_numbers() {
        assert_eq!(terms("dog dogs dog"), vec![("dog".to_string(), 3)]);
        assert_eq!(terms("class class"), vec![("class".to_string(), 2)]);
        assert_eq!(
            terms("Ferris's crab"),
            vec![("Ferris".to_string(), 1), ("crab".to_string(), 1)]
        );
        assert_eq!(terms("2024 1999 release"), vec![("release".to_string(), 1)]);
    }

    #[test]
    fn test_term_cap() {
        let text: Vec<String> = (0..60).map(|i| format!("word{}x", i)).collect();
        let selected = select_terms(&text.join(" "), &StopWords::english(), &WordCloudOptions::default());
        assert_eq!(selected.len(), 40);
    }

    #[test]
    fn test_collocations_become_phrases() {
        let text: Vec<String> = (0..20)
            .map(|i| format!("machine learning topic{}", i))
            .collect();
        let text = text.join(" ");

        let selected = terms(&text);
        assert_eq!(selected[0], ("machine learning".to_string(), 20));
        assert!(selected.iter().all(|(t, _)| t != "machine" && t != "learning"));

        let options = WordCloudOptions {
            collocations: false,
            ..WordCloudOptions::default()
        };
        let selected = terms_with(&text, &options);
        assert_eq!(selected[0], ("learning".to_string(), 20));
        assert_eq!(selected[1], ("machine".to_string(), 20));
    }

    #[test]
    fn test_rare_pairs_stay_single_words() {
        // "apple pay" occurs once in a short text and scores far below the threshold
        assert_eq!(
            terms("Apple announced Apple Pay"),
            vec![
                ("Apple".to_string(), 2),
                ("Pay".to_string(), 1),
                ("announced".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_pairs_never_span_stopwords() {
        let text = "to thank you for the help and ".repeat(30);
        assert_eq!(
            terms(&text),
            vec![("help".to_string(), 30), ("thank".to_string(), 30)]
        );
    }

    #[test]
    fn test_collocation_score() {
        assert_eq!(collocation_score(1, 6, 1, 6), 0.0);
        assert!(collocation_score(20, 20, 20, 60) > 30.0);
        assert!(collocation_score(1, 20, 1, 60) < 30.0);
    }

    #[test]
    fn test_layout_fits_canvas_without_overlap() {
        let text = "ownership borrowing lifetimes traits generics macros async await \
                    ownership borrowing lifetimes traits ownership borrowing ownership";
        let cloud = generate_wordcloud(text);
        assert!(!cloud.is_empty());
        assert_eq!(cloud.words[0].text, "ownership");
        assert_eq!(cloud.words[0].weight, 1.0);

        for (i, a) in cloud.words.iter().enumerate() {
            assert!(a.x >= 0.0 && a.y >= 0.0);
            assert!(a.x + a.width <= 400.0 && a.y + a.height <= 200.0);
            for b in cloud.words.iter().skip(i + 1) {
                assert!(!a.overlaps(b.x, b.y, b.width, b.height), "{} overlaps {}", a.text, b.text);
            }
        }

        let sizes: Vec<f64> = cloud.words.iter().map(|w| w.font_size).collect();
        assert!(sizes.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn test_layout_survives_json() {
        let cloud = generate_wordcloud("spiral spiral layout coordinates layout spiral words");
        let json = serde_json::to_string(&cloud).unwrap();
        let parsed: WordCloud = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cloud);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let text = "alpha beta gamma alpha beta alpha delta epsilon";
        assert_eq!(generate_wordcloud(text), generate_wordcloud(text));
    }

    #[test]
    fn test_svg_escapes_text() {
        let cloud = WordCloud {
            width: 10,
            height: 10,
            words: vec![PlacedWord {
                text: "a<b".to_string(),
                count: 1,
                weight: 1.0,
                font_size: 4.0,
                x: 0.0,
                y: 0.0,
                width: 4.0,
                height: 4.0,
            }],
        };
        assert!(cloud.to_svg().contains("a&lt;b"));
    }
}
