//! Showgraph Core - Foundation crate for the Showgraph crawler.
//!
//! This crate provides shared types, error handling and configuration
//! management that all other Showgraph crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Entity identities and observations (`ShowId`, `WriterId`, `ShowObservation`, ...)
//!
//! # Example
//!
//! ```rust
//! use showgraph_core::{AppConfig, ShowId};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert_eq!(config.crawl.max_depth, 1);
//!
//! let id = ShowId::new("tt0285403")?;
//! assert_eq!(id.as_str(), "tt0285403");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, CrawlConfig, CrawlSettings, DatabaseConfig, TransportConfig};
pub use error::{ConfigError, ConfigResult, CoreError, Result};
pub use types::{
    CreditObservation, ShowId, ShowObservation, Timestamp, WriterCredit, WriterId,
    WriterObservation,
};
