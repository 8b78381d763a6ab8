//! Per-entry and per-run crawl results.

use serde::Serialize;
use showgraph_core::ShowId;

/// Lifecycle of a single frontier entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CrawlState {
    /// Dequeued, nothing fetched yet
    Pending,
    /// Turning a title into a show identity and canonical fields
    Resolving,
    /// Fetching, merging and persisting the show's writers
    ExpandingWriters,
    /// Visiting writer profiles for their other shows
    ExpandingOtherShows,
    /// Finished, whatever the outcome
    Done,
}

/// How a frontier entry ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EntryOutcome {
    /// The show was resolved and persisted.
    Resolved {
        /// Source identifier of the show
        show_id: ShowId,
        /// Canonical title after detail extraction
        title: String,
    },
    /// The search matched no show.
    NotFound,
    /// The show was already processed earlier in this run.
    AlreadyVisited {
        /// Source identifier of the show
        show_id: ShowId,
    },
    /// A transport or persistence failure ended the entry early.
    Error {
        /// Human-readable failure description
        message: String,
    },
}

/// What happened to one frontier entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryReport {
    /// Seed title or lead title the entry started from
    pub title: String,
    /// Traversal depth of the entry
    pub depth: u32,
    /// Final outcome
    pub outcome: EntryOutcome,
    /// States visited, in order, ending in `Done`
    pub transitions: Vec<CrawlState>,
    /// Writer credits persisted for this entry
    pub writers_linked: usize,
    /// Leads recorded at the next depth by this entry
    pub leads_enqueued: usize,
}

impl EntryReport {
    /// Whether the entry reached the other-shows phase.
    #[must_use]
    pub fn expanded_other_shows(&self) -> bool {
        self.transitions.contains(&CrawlState::ExpandingOtherShows)
    }
}

/// Result of a whole crawl run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlReport {
    /// Processed entries in processing order
    pub entries: Vec<EntryReport>,
    /// Entries left in the frontier when the entry ceiling was reached
    pub dropped: usize,
}

impl CrawlReport {
    /// Number of entries that resolved to a show.
    #[must_use]
    pub fn resolved(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Resolved { .. }))
    }

    /// Number of entries whose search matched nothing.
    #[must_use]
    pub fn not_found(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::NotFound))
    }

    /// Number of entries that ended in an error.
    #[must_use]
    pub fn errors(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Error { .. }))
    }

    /// Total writer credits persisted across the run.
    #[must_use]
    pub fn writers_linked(&self) -> usize {
        self.entries.iter().map(|e| e.writers_linked).sum()
    }

    fn count(&self, predicate: impl Fn(&EntryOutcome) -> bool) -> usize {
        self.entries.iter().filter(|e| predicate(&e.outcome)).count()
    }
}
