use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Timeouts, dropped connections, throttling and server errors.
    #[error("transient fetch failure for {url}: {reason}")]
    Transient { url: String, reason: String },

    #[error("registry answered {status} for {url}")]
    Status { status: u16, url: String },

    #[error("request for {url} failed: {reason}")]
    Request { url: String, reason: String },
}

impl FetchError {
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Transient { .. })
    }

    /// Classify a response status. 429 and 5xx are worth retrying.
    pub fn from_status(status: u16, url: &str) -> Self {
        if status == 429 || (500..600).contains(&status) {
            FetchError::Transient {
                url: url.to_string(),
                reason: format!("status {}", status),
            }
        } else {
            FetchError::Status {
                status,
                url: url.to_string(),
            }
        }
    }

    pub fn from_reqwest(err: reqwest::Error, url: &str) -> Self {
        if err.is_timeout() || err.is_connect() {
            FetchError::Transient {
                url: url.to_string(),
                reason: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            Self::from_status(status.as_u16(), url)
        } else {
            FetchError::Request {
                url: url.to_string(),
                reason: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(FetchError::from_status(503, "u").is_transient());
        assert!(FetchError::from_status(429, "u").is_transient());
        assert!(!FetchError::from_status(404, "u").is_transient());
        assert_eq!(
            FetchError::from_status(404, "u"),
            FetchError::Status { status: 404, url: "u".to_string() }
        );
    }
}
