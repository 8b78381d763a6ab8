//! Configuration management for Showgraph.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Seed titles crawled when none are configured.
pub const DEFAULT_SEED_TITLES: &[&str] = &[
    "Gilmore Girls",
    "Scrubs",
    "Better Off Ted",
    "The Rehearsal",
    "Arrested Development",
    "Jury Duty",
    "Brooklyn Nine-Nine",
    "Bob's Burgers",
    "King of the Hill",
    "Santa Clarita Diet",
];

/// Main application configuration.
///
/// This is loaded from `~/.config/showgraph/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Traversal settings
    pub crawl: CrawlSettings,
    /// HTTP transport settings
    pub transport: TransportConfig,
    /// Storage settings
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Load configuration from the default path, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `SHOWGRAPH_MAX_DEPTH`: Override traversal depth ceiling
    /// - `SHOWGRAPH_DB_PATH`: Override database file path
    /// - `SHOWGRAPH_BASE_URL`: Override catalog base URL
    /// - `SHOWGRAPH_POLITENESS_MS`: Override per-show politeness delay
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("SHOWGRAPH_MAX_DEPTH") {
            if let Ok(depth) = val.parse() {
                self.crawl.max_depth = depth;
                tracing::debug!("Override crawl.max_depth from env: {}", depth);
            }
        }

        if let Ok(val) = std::env::var("SHOWGRAPH_DB_PATH") {
            tracing::debug!("Override database.path from env: {}", val);
            self.database.path = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("SHOWGRAPH_BASE_URL") {
            tracing::debug!("Override transport.base_url from env: {}", val);
            self.transport.base_url = val;
        }

        if let Ok(val) = std::env::var("SHOWGRAPH_POLITENESS_MS") {
            if let Ok(ms) = val.parse() {
                self.crawl.politeness_delay_ms = ms;
                tracing::debug!("Override crawl.politeness_delay_ms from env: {}", ms);
            }
        }

        self
    }

    /// Check values that deserialize fine but cannot drive a crawl.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.transport.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "transport.timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.crawl.max_entries == 0 {
            return Err(ConfigError::InvalidValue {
                field: "crawl.max_entries".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        if !self.transport.base_url.starts_with("http://")
            && !self.transport.base_url.starts_with("https://")
        {
            return Err(ConfigError::InvalidValue {
                field: "transport.base_url".to_string(),
                reason: format!("expected an http(s) URL, got '{}'", self.transport.base_url),
            });
        }

        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/showgraph/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "showgraph", "showgraph").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Get the data directory path.
    ///
    /// Uses XDG base directories: `~/.local/share/showgraph`
    pub fn data_dir() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "showgraph", "showgraph").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.data_dir().to_path_buf())
    }

    /// Resolve the database file path, defaulting into the data directory.
    pub fn database_path(&self) -> ConfigResult<PathBuf> {
        match &self.database.path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join("showgraph.db")),
        }
    }

    /// Build the crawl controller configuration from the loaded settings.
    #[must_use]
    pub fn crawl_config(&self) -> CrawlConfig {
        CrawlConfig {
            seed_titles: self.crawl.seed_titles.clone(),
            max_depth: self.crawl.max_depth,
            politeness_delay: Duration::from_millis(self.crawl.politeness_delay_ms),
            seed_delay: Duration::from_millis(self.crawl.seed_delay_ms),
            transport_timeout: Duration::from_secs(self.transport.timeout_secs),
            follow_leads: self.crawl.follow_leads,
            max_entries: self.crawl.max_entries,
        }
    }
}

/// Traversal settings as written in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlSettings {
    /// Titles the run starts from, in order
    pub seed_titles: Vec<String>,
    /// Run-wide depth ceiling (0 = seed shows only)
    pub max_depth: u32,
    /// Delay after the writer phase of each show, in milliseconds (0 = disabled)
    pub politeness_delay_ms: u64,
    /// Delay between top-level seeds, in milliseconds (0 = disabled)
    pub seed_delay_ms: u64,
    /// Crawl discovered other-shows instead of only recording them as leads
    pub follow_leads: bool,
    /// Hard ceiling on frontier entries processed in one run
    pub max_entries: usize,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            seed_titles: DEFAULT_SEED_TITLES.iter().map(ToString::to_string).collect(),
            max_depth: 1,
            politeness_delay_ms: 1000,
            seed_delay_ms: 2000,
            follow_leads: false,
            max_entries: 500,
        }
    }
}

/// HTTP transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Catalog origin, without trailing slash
    pub base_url: String,
    /// Per-fetch deadline in seconds
    pub timeout_secs: u64,
    /// User agent string
    pub user_agent: String,
    /// Accept-Language header value
    pub accept_language: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.imdb.com".to_string(),
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
        }
    }
}

/// Storage settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database file; `None` means `<data dir>/showgraph.db`
    pub path: Option<PathBuf>,
}

/// Configuration value handed to the crawl controller at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    /// Titles the run starts from, in order
    pub seed_titles: Vec<String>,
    /// Run-wide depth ceiling
    pub max_depth: u32,
    /// Pause after the writer phase of each show
    pub politeness_delay: Duration,
    /// Pause between top-level seeds
    pub seed_delay: Duration,
    /// Deadline passed to every fetch
    pub transport_timeout: Duration,
    /// Whether leads are enqueued for full processing
    pub follow_leads: bool,
    /// Hard ceiling on frontier entries processed in one run
    pub max_entries: usize,
}

impl CrawlConfig {
    /// Configuration with all delays disabled, for mock transports.
    #[must_use]
    pub fn without_delays(mut self) -> Self {
        self.politeness_delay = Duration::ZERO;
        self.seed_delay = Duration::ZERO;
        self
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        AppConfig::default().crawl_config()
    }
}
