use thiserror::Error;

/// Top-level error for page analysis
#[derive(Error, Debug)]
pub enum Error {
    /// The input is not an absolute http(s) URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The page could not be loaded
    #[error("Could not load page: {0}")]
    Fetch(#[from] FetchError),

    /// A required page element is missing
    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// The entity model could not be loaded
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// The configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error should stop the process rather than a single request
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Model(_) | Error::Config(_) | Error::Io(_))
    }
}

/// Errors from retrieving a page over HTTP
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection, TLS, body decoding or timeout failure
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Transport-specific failure that is not an HTTP error
    #[error("{0}")]
    Other(String),
}

/// Errors from the strict extractors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The named element (or its required attribute) is absent
    #[error("missing required element: {0}")]
    MissingElement(&'static str),
}

/// Errors from loading the entity model
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("model directory not found: {0}")]
    NotFound(String),

    #[error("failed to read model file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid model file {path}: {source}")]
    Invalid {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors from loading the configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown heading level: {0}")]
    HeadingLevel(String),
}

/// Result type alias for page analysis
pub type Result<T> = std::result::Result<T, Error>;
