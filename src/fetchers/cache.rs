use crate::error::FetchError;
use crate::fetchers::Transport;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, OnceCell};
use url::Url;

#[derive(Debug, Clone)]
struct CachedPage {
    text: Arc<str>,
    fetched_at: Instant,
}

type Slot = Arc<OnceCell<CachedPage>>;

/// Read-through page cache keyed by URL
///
/// Concurrent requests for the same URL share one in-flight fetch. Failed
/// fetches are not stored, so the next call tries again. Entries live as
/// long as the cache unless a TTL is set.
pub struct FetchCache<T> {
    transport: T,
    ttl: Option<Duration>,
    entries: Mutex<HashMap<String, Slot>>,
}

impl<T: Transport> FetchCache<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            ttl: None,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Refetch entries older than `ttl`
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the page text, fetching it on first use
    pub async fn fetch(&self, url: &Url) -> Result<Arc<str>, FetchError> {
        let slot = self.slot(url).await;

        if let Some(page) = slot.get() {
            ::log::debug!("Cache hit for {}", url);
            return Ok(Arc::clone(&page.text));
        }

        let page = slot
            .get_or_try_init(|| async {
                let text = self.transport.get(url).await?;
                Ok::<_, FetchError>(CachedPage {
                    text: Arc::from(text),
                    fetched_at: Instant::now(),
                })
            })
            .await?;

        Ok(Arc::clone(&page.text))
    }

    /// Slot for the URL, replacing it when the cached copy has expired
    async fn slot(&self, url: &Url) -> Slot {
        let mut entries = self.entries.lock().await;
        let slot = entries.entry(url.as_str().to_string()).or_default();

        if let (Some(ttl), Some(page)) = (self.ttl, slot.get()) {
            if page.fetched_at.elapsed() >= ttl {
                ::log::debug!("Cached copy of {} expired", url);
                *slot = Slot::default();
            }
        }

        Arc::clone(slot)
    }

    /// Whether a fetched copy of the URL is held
    pub async fn contains(&self, url: &Url) -> bool {
        let entries = self.entries.lock().await;
        entries
            .get(url.as_str())
            .is_some_and(|slot| slot.initialized())
    }

    /// Number of URLs with a fetched copy
    pub async fn len(&self) -> usize {
        let entries = self.entries.lock().await;
        entries.values().filter(|slot| slot.initialized()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
