// Re-export modules
pub mod analysis;
pub mod config;
pub mod error;
pub mod fetchers;
pub mod parsers;
pub mod report;
pub mod results;
pub mod utils;

// Re-export commonly used types for convenience
pub use error::{Error, Result};
pub use parsers::Page;
pub use results::{AnalysisOutcome, PageReport};

use analysis::{
    EntityFrequencyTable, EntityModel, EntityRecognizer, StopWords, WordCloudOptions,
    generate_wordcloud_with,
};
use config::AnalyzerConfig;
use fetchers::{FetchCache, HttpTransport, Transport};
use parsers::headings::HeadingLevel;
use results::SchemaEntry;
use std::sync::Arc;
use std::time::Duration;

/// Runs the fetch → parse → extract pipeline for single pages
pub struct Analyzer<T> {
    cache: FetchCache<T>,
    recognizer: Arc<dyn EntityRecognizer>,
    stopwords: StopWords,
    wordcloud: WordCloudOptions,
    default_levels: Vec<HeadingLevel>,
}

impl Analyzer<HttpTransport> {
    /// Builds an HTTP-backed analyzer from configuration.
    ///
    /// Loads the entity model; a failure here is fatal for the caller.
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self> {
        let model = EntityModel::load(&config.model_dir)?;

        let transport = match config.request_timeout_secs {
            Some(secs) => HttpTransport::with_timeout(Duration::from_secs(secs))?,
            None => HttpTransport::new(),
        };

        let wordcloud = WordCloudOptions {
            max_words: config.max_words,
            collocations: config.collocations,
            ..WordCloudOptions::default()
        };
        let stopwords = StopWords::english().with_extra(config.extra_stopwords.iter().cloned());

        let mut analyzer = Self::new(transport, Arc::new(model))
            .with_wordcloud_options(wordcloud)
            .with_stopwords(stopwords)
            .with_default_levels(config.default_levels.clone());
        if let Some(secs) = config.cache_ttl_secs {
            analyzer = analyzer.with_cache_ttl(Duration::from_secs(secs));
        }
        Ok(analyzer)
    }
}

impl<T: Transport> Analyzer<T> {
    /// Create a new analyzer over the given transport and recognizer
    pub fn new(transport: T, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self {
            cache: FetchCache::new(transport),
            recognizer,
            stopwords: StopWords::english(),
            wordcloud: WordCloudOptions::default(),
            default_levels: vec![HeadingLevel::H2],
        }
    }

    /// Set the full word cloud options
    pub fn with_wordcloud_options(mut self, options: WordCloudOptions) -> Self {
        self.wordcloud = options;
        self
    }

    /// Set the stopwords used by the word cloud
    pub fn with_stopwords(mut self, stopwords: StopWords) -> Self {
        self.stopwords = stopwords;
        self
    }

    /// Set the heading levels used when a request names none
    pub fn with_default_levels(mut self, levels: Vec<HeadingLevel>) -> Self {
        self.default_levels = levels;
        self
    }

    /// Refetch cached pages older than `ttl`
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = self.cache.with_ttl(ttl);
        self
    }

    pub fn cache(&self) -> &FetchCache<T> {
        &self.cache
    }

    pub fn default_levels(&self) -> &[HeadingLevel] {
        &self.default_levels
    }

    /// Validates the input, fetches the page and builds its report
    pub async fn analyze(&self, input: &str, levels: &[HeadingLevel]) -> Result<PageReport> {
        let url =
            utils::parse_page_url(input).ok_or_else(|| Error::InvalidUrl(input.to_string()))?;

        let text = self.cache.fetch(&url).await?;
        let page = Page::new(url, text);
        Ok(self.analyze_page(&page, levels))
    }

    /// Handles one request, turning every per-request failure into an outcome
    pub async fn handle(&self, input: Option<&str>, levels: &[HeadingLevel]) -> AnalysisOutcome {
        let input = match input.map(str::trim) {
            Some(input) if !input.is_empty() => input,
            _ => return AnalysisOutcome::Empty,
        };

        match self.analyze(input, levels).await {
            Ok(report) => AnalysisOutcome::Report {
                report: Box::new(report),
            },
            Err(Error::InvalidUrl(input)) => {
                ::log::warn!("Rejected invalid URL: {}", input);
                AnalysisOutcome::InvalidUrl { input }
            }
            Err(e) => {
                ::log::error!("Failed to analyze {}: {}", input, e);
                AnalysisOutcome::LoadFailed {
                    url: input.to_string(),
                    message: e.to_string(),
                }
            }
        }
    }

    /// Builds the report for an already parsed page
    pub fn analyze_page(&self, page: &Page, levels: &[HeadingLevel]) -> PageReport {
        let url = page.url();
        ::log::info!("Analyzing {}", url);

        let schema = page
            .schema_tags()
            .iter()
            .map(SchemaEntry::from_tag)
            .collect();

        let paragraphs = page.paragraphs();
        let text = paragraphs.join(" ");
        let word_cloud = generate_wordcloud_with(&text, &self.stopwords, &self.wordcloud);
        // Names never run across paragraph boundaries.
        let entities = self.recognizer.recognize_segments(&paragraphs);
        let entities = EntityFrequencyTable::from_entities(&entities);

        PageReport {
            url: url.to_string(),
            scheme: url.scheme().to_string(),
            host: url.host_str().map(str::to_string),
            path: url.path().to_string(),
            metadata: page.partial_metadata(),
            headings: page.headings(levels),
            schema,
            word_cloud,
            entities,
        }
    }
}
