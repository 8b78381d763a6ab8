//! Transport seam between the crawler and the network.

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Fetches raw documents by URL.
///
/// Implementations perform no retries; a failed fetch is reported once and
/// the caller decides what to do with it.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the document at `url`, failing if it takes longer than `timeout`.
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String>;
}
