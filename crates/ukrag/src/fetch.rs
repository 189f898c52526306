//! Blocking HTTP retrieval behind a trait seam so pipelines can run against
//! canned bytes in tests.

use std::time::Duration;

use tracing::debug;

/// Network-level failure: timeout, connection error, or a non-2xx response.
/// Treated identically to a parse failure by the pipeline and routed to the
/// fallback path; never fatal to a batch.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed: {reason}")]
    Transient { url: String, reason: String },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Source of raw publication bytes for one URL.
pub trait Fetcher {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError>;
}

/// Synchronous HTTP GET with a per-request timeout and a static user agent.
/// No request body, no auth headers, no retries: retry/backoff is a concern
/// for the layer above, not the core.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent.to_string())
            .build()?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .map_err(|err| FetchError::Transient {
                url: url.to_string(),
                reason: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().map_err(|err| FetchError::Transient {
            url: url.to_string(),
            reason: err.to_string(),
        })?;
        debug!(url, bytes = bytes.len(), "downloaded");
        Ok(bytes.to_vec())
    }
}
