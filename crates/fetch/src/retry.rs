use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::FetchError;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: usize,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, 1000, 10000)
    }
}

impl RetryPolicy {
    pub fn new(max_retries: usize, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            max_retries,
            initial_backoff: Duration::from_millis(initial_backoff_ms),
            max_backoff: Duration::from_millis(max_backoff_ms),
        }
    }

    /// Run `fetch` until it succeeds, fails permanently, or the retry budget
    /// for transient failures is spent. Waits double after each attempt.
    pub async fn retry<F, Fut, T>(&self, url: &str, mut fetch: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let mut backoff = self.initial_backoff;
        let mut attempt = 0;

        loop {
            let err = match fetch().await {
                Ok(page) => {
                    if attempt > 0 {
                        info!(url, attempts = attempt + 1, "page fetched after retries");
                    }
                    return Ok(page);
                }
                Err(e) if e.is_transient() => e,
                Err(e) => return Err(e),
            };

            attempt += 1;
            if attempt > self.max_retries {
                warn!(url, attempts = attempt, error = %err, "giving up on page");
                return Err(err);
            }

            warn!(
                url,
                attempt,
                backoff_ms = backoff.as_millis() as u64,
                error = %err,
                "transient fetch failure, backing off"
            );
            sleep(backoff).await;
            backoff = (backoff * 2).min(self.max_backoff);
        }
    }
}
