pub mod cache;
pub mod http;

pub use cache::FetchCache;
pub use http::HttpTransport;

use crate::error::FetchError;
use std::future::Future;
use url::Url;

/// Retrieves the raw text of a page
pub trait Transport: Send + Sync {
    /// Performs one GET request for the URL
    fn get(&self, url: &Url) -> impl Future<Output = Result<String, FetchError>> + Send;
}
