//! In-memory transport for tests and offline replays.

use crate::error::{FetchError, Result};
use crate::fetcher::PageFetcher;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Canned {
    Page(String),
    Status(u16),
    Timeout,
}

/// Serves canned documents keyed by exact URL and records every request.
///
/// URLs with nothing registered answer with HTTP 404.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    responses: HashMap<String, Canned>,
    requests: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    #[must_use]
    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.responses.insert(url.into(), Canned::Page(body.into()));
        self
    }

    /// Answer `url` with a non-success status.
    #[must_use]
    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.responses.insert(url.into(), Canned::Status(status));
        self
    }

    /// Make `url` behave as if its deadline expired.
    #[must_use]
    pub fn with_timeout(mut self, url: impl Into<String>) -> Self {
        self.responses.insert(url.into(), Canned::Timeout);
        self
    }

    /// Every URL requested so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// How many times `url` was requested.
    pub fn request_count(&self, url: &str) -> usize {
        self.requests().iter().filter(|u| u.as_str() == url).count()
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }

        match self.responses.get(url) {
            Some(Canned::Page(body)) => Ok(body.clone()),
            Some(Canned::Status(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status: *status,
            }),
            Some(Canned::Timeout) => Err(FetchError::Timeout {
                url: url.to_string(),
                timeout,
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_fetcher_serves_and_records() {
        let fetcher = StaticFetcher::new()
            .with_page("https://example.com/a", "<html>a</html>")
            .with_status("https://example.com/b", 500)
            .with_timeout("https://example.com/c");
        let timeout = Duration::from_secs(1);

        assert_eq!(
            fetcher
                .fetch("https://example.com/a", timeout)
                .await
                .expect("page a"),
            "<html>a</html>"
        );
        assert!(matches!(
            fetcher.fetch("https://example.com/b", timeout).await,
            Err(FetchError::Status { status: 500, .. })
        ));
        assert!(matches!(
            fetcher.fetch("https://example.com/c", timeout).await,
            Err(FetchError::Timeout { .. })
        ));
        assert!(matches!(
            fetcher.fetch("https://example.com/missing", timeout).await,
            Err(FetchError::Status { status: 404, .. })
        ));

        assert_eq!(fetcher.requests().len(), 4);
        assert_eq!(fetcher.request_count("https://example.com/a"), 1);
    }

    #[test]
    fn test_fetch_through_trait_object() {
        let fetcher: Box<dyn PageFetcher> =
            Box::new(StaticFetcher::new().with_page("https://example.com/", "ok"));
        let body = tokio_test::block_on(fetcher.fetch("https://example.com/", Duration::from_secs(1)))
            .expect("fetch via trait object");
        assert_eq!(body, "ok");
    }
}
