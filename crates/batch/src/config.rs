use anyhow::{Context, Result};
use extract::{GraphRepair, PairingRepair, RecordExtractor, Resolver};
use fetch::{FetchContext, HttpPageSource, PageCache, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub fetch: FetchConfig,
    pub concurrency: ConcurrencyConfig,
    pub retry: RetryConfig,
    pub cache: CacheConfig,
    pub repair: RepairConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Registry root, with trailing slash. Search URLs are `base_url + name`.
    pub base_url: String,
    /// Pause after every request, per worker.
    pub request_delay_ms: u64,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcurrencyConfig {
    pub workers: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub max_entries: usize,
}

/// Which structural repairs the extractors apply to scraped fragments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairConfig {
    pub pairing: PairingRepair,
    pub graph: GraphRepair,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.northdata.de/".to_string(),
            request_delay_ms: 2000,
            timeout_secs: 30,
            user_agent: concat!("registry-harvest/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self { workers: 3 }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 1000,
            max_backoff_ms: 10000,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 1000,
        }
    }
}

impl AppConfig {
    /// Read a JSON config file; missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// A fresh per-worker context: its own HTTP session, retry policy, cache
    /// and extractors.
    pub fn fetch_context(&self) -> Result<FetchContext<HttpPageSource>> {
        let source = HttpPageSource::new(
            Duration::from_secs(self.fetch.timeout_secs),
            &self.fetch.user_agent,
        )?;

        let retry = RetryPolicy::new(
            self.retry.max_retries,
            self.retry.initial_backoff_ms,
            self.retry.max_backoff_ms,
        );
        let extractor = RecordExtractor::new(self.repair.pairing.clone(), self.repair.graph);

        let mut ctx = FetchContext::new(source, Resolver::new(self.fetch.base_url.clone()))
            .with_extractor(extractor)
            .with_retry(retry)
            .with_request_delay(Duration::from_millis(self.fetch.request_delay_ms));
        if self.cache.enabled {
            ctx = ctx.with_cache(PageCache::new(self.cache.max_entries));
        }
        Ok(ctx)
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency.workers == 0 {
            anyhow::bail!("concurrency.workers must be at least 1");
        }
        if !self.fetch.base_url.ends_with('/') {
            anyhow::bail!("fetch.base_url must end with '/': {}", self.fetch.base_url);
        }
        Ok(())
    }
}
