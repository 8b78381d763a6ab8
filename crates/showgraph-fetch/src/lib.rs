//! Page transport for the catalog crawler.
//!
//! Provides the `PageFetcher` seam, a reqwest-backed implementation with
//! browser-like headers and per-fetch deadlines, and an in-memory
//! implementation for tests.

pub mod engine;
pub mod error;
pub mod fetcher;
pub mod headers;
pub mod memory;

pub use engine::HttpFetcher;
pub use error::{FetchError, Result};
pub use fetcher::PageFetcher;
pub use headers::HeaderProfile;
pub use memory::StaticFetcher;
