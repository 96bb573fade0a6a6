use extract::{RecordExtractor, Resolver};
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

use crate::cache::PageCache;
use crate::error::FetchError;
use crate::retry::RetryPolicy;
use crate::source::PageSource;

/// Per-worker fetch state: one session, its retry and politeness settings,
/// and the extractors run on what it fetches.
///
/// Each worker builds its own; nothing in here is shared between workers.
pub struct FetchContext<S> {
    source: S,
    resolver: Resolver,
    extractor: RecordExtractor,
    retry: RetryPolicy,
    cache: Option<PageCache>,
    request_delay: Duration,
}

impl<S: PageSource> FetchContext<S> {
    pub fn new(source: S, resolver: Resolver) -> Self {
        Self {
            source,
            resolver,
            extractor: RecordExtractor::default(),
            retry: RetryPolicy::default(),
            cache: None,
            request_delay: Duration::ZERO,
        }
    }

    pub fn with_extractor(mut self, extractor: RecordExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_cache(mut self, cache: PageCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Pause after every network fetch.
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn extractor(&self) -> &RecordExtractor {
        &self.extractor
    }

    pub fn cache(&self) -> Option<&PageCache> {
        self.cache.as_ref()
    }

    pub async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        if let Some(body) = self.cache.as_ref().and_then(|c| c.get(url)) {
            debug!(url, "page cache hit");
            return Ok(body);
        }

        let body = self.retry.retry(url, || self.source.get(url)).await?;

        if !self.request_delay.is_zero() {
            sleep(self.request_delay).await;
        }
        if let Some(cache) = &self.cache {
            cache.insert(url, body.clone());
        }
        Ok(body)
    }
}
