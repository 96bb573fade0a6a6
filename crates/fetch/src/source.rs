use std::future::Future;
use std::time::Duration;
use tracing::debug;

use crate::error::FetchError;

/// Anything that can hand back the markup behind a URL.
///
/// The HTTP implementation below sees server-rendered markup only; a
/// browser-backed source can implement this to get the rendered network graph.
pub trait PageSource: Send + Sync {
    fn get(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Plain HTTP session with its own cookie jar.
#[derive(Clone)]
pub struct HttpPageSource {
    client: reqwest::Client,
}

impl HttpPageSource {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| FetchError::Request {
                url: String::new(),
                reason: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }
}

impl PageSource for HttpPageSource {
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        debug!(url, "fetching page");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::from_status(status.as_u16(), url));
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(e, url))
    }
}
