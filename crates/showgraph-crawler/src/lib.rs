//! Showgraph Crawler - extraction and traversal core.
//!
//! This crate turns catalog pages into typed show and writer observations
//! and walks the show → writer → show graph with a bounded frontier,
//! persisting what it finds through `showgraph-db`.
//!
//! # Features
//!
//! - Pure extraction functions with a structured (embedded payload) and a
//!   heuristic (markup) strategy, degrading to empty results on bad input
//! - Identity-keyed merging where episode counts keep their maximum
//! - Sequential, depth-bounded crawl with a run-scoped visited set
//! - Per-entry outcomes; no single show can abort the run
//!
//! # Example
//!
//! ```rust,ignore
//! use showgraph_crawler::{CatalogUrls, CrawlController};
//! use std::sync::Arc;
//!
//! let controller = CrawlController::new(
//!     config.crawl_config(),
//!     CatalogUrls::new(&config.transport.base_url)?,
//!     Arc::new(HttpFetcher::new()?),
//!     Arc::new(database),
//! );
//!
//! let report = controller.run().await;
//! println!("resolved {} shows", report.resolved());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod controller;
pub mod credits;
#[allow(missing_docs)]
pub mod error;
pub mod filmography;
pub mod merge;
pub mod parser;
mod payload;
pub mod report;
pub mod url_builder;

// Re-export commonly used types
pub use controller::CrawlController;
pub use credits::{extract_writers, parse_credit_text};
pub use error::{CrawlError, Result};
pub use filmography::extract_other_shows;
pub use merge::{merge, Observation};
pub use parser::{
    clean_title, extract_search_result, extract_show_candidates, extract_show_details,
    parse_year_range,
};
pub use report::{CrawlReport, CrawlState, EntryOutcome, EntryReport};
pub use url_builder::CatalogUrls;
