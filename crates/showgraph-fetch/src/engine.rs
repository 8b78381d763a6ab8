use crate::error::{FetchError, Result};
use crate::fetcher::PageFetcher;
use crate::headers::HeaderProfile;
use async_trait::async_trait;
use std::time::Duration;

/// Maximum redirects followed per fetch.
const MAX_REDIRECTS: usize = 5;

/// reqwest-backed page fetcher.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher sending the default browser-like headers.
    pub fn new() -> Result<Self> {
        Self::with_headers(&HeaderProfile::default())
    }

    /// Create a fetcher sending a specific header profile.
    pub fn with_headers(profile: &HeaderProfile) -> Result<Self> {
        let client = reqwest::Client::builder()
            .default_headers(profile.to_header_map()?)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String> {
        tracing::debug!(url, ?timeout, "Fetching page");

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(url, timeout, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                    timeout,
                }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })
    }
}

fn classify(url: &str, timeout: Duration, error: &reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
            timeout,
        }
    } else {
        FetchError::Request {
            url: url.to_string(),
            reason: error.to_string(),
        }
    }
}
