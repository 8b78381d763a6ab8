//! Shared types used across Showgraph.
//!
//! Identities are source-assigned and immutable; every other field on an
//! observation is a snapshot that may disagree with other snapshots of the
//! same entity.

use crate::error::CoreError;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Stable external identifier of a show (`tt` followed by digits).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShowId(String);

impl ShowId {
    /// Create a new `ShowId` from a string.
    ///
    /// # Errors
    /// Returns error if the ID is not of the form `tt<digits>`.
    pub fn new(id: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        static SHOW_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = SHOW_REGEX.get_or_init(|| Regex::new(r"^tt\d+$").expect("valid regex"));

        if regex.is_match(&id) {
            Ok(Self(id))
        } else {
            Err(CoreError::Validation(format!(
                "invalid show ID: expected tt<digits>, got '{id}'"
            )))
        }
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable external identifier of a writer (`nm` followed by digits).
///
/// Lives in a namespace distinct from [`ShowId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WriterId(String);

impl WriterId {
    /// Create a new `WriterId` from a string.
    ///
    /// # Errors
    /// Returns error if the ID is not of the form `nm<digits>`.
    pub fn new(id: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        static WRITER_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = WRITER_REGEX.get_or_init(|| Regex::new(r"^nm\d+$").expect("valid regex"));

        if regex.is_match(&id) {
            Ok(Self(id))
        } else {
            Err(CoreError::Validation(format!(
                "invalid writer ID: expected nm<digits>, got '{id}'"
            )))
        }
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WriterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One extractor-produced snapshot of a show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowObservation {
    /// Identity, the only field that determines equality of the entity
    pub id: ShowId,
    /// Human-readable title as observed
    pub title: String,
    /// First year on air
    pub year_start: Option<i32>,
    /// Last year on air; absent means still running or a single year
    pub year_end: Option<i32>,
}

impl ShowObservation {
    /// Create an observation carrying only identity and title.
    #[must_use]
    pub fn new(id: ShowId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            year_start: None,
            year_end: None,
        }
    }

    /// Attach a year range to the observation.
    #[must_use]
    pub fn with_years(mut self, year_start: Option<i32>, year_end: Option<i32>) -> Self {
        self.year_start = year_start;
        self.year_end = year_end;
        self
    }
}

/// One extractor-produced snapshot of a writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriterObservation {
    /// Identity
    pub id: WriterId,
    /// Display name
    pub name: String,
}

/// Attributes of a show-writer credit edge as observed on a credits page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditObservation {
    /// Free-text role such as "written by" or "story editor"
    pub role: Option<String>,
    /// Number of episodes of the show attributed to the writer
    pub episode_count: Option<u32>,
}

/// A writer observation paired with the credit it was observed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriterCredit {
    /// The credited writer
    pub writer: WriterObservation,
    /// The credit attributes
    pub credit: CreditObservation,
}

/// Wrapper around `chrono::DateTime<Utc>` for consistent timestamp handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp representing the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Parse a timestamp from an RFC3339 string.
    pub fn from_rfc3339(s: &str) -> Result<Self, CoreError> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|e| CoreError::Validation(format!("invalid timestamp: {e}")))
    }

    /// Format as RFC3339 string.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }

    /// Get seconds since Unix epoch.
    #[must_use]
    pub fn timestamp(&self) -> i64 {
        self.0.timestamp()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}
