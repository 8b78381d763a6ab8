//! Crawl controller driving the show → writers → other shows traversal.
//!
//! The controller owns the frontier and processes one entry at a time. Each
//! entry moves through [`CrawlState`]s and always ends in `Done`; a failure
//! ends the entry, never the run. Writes that completed before a failure
//! stay persisted.

use crate::credits::extract_writers;
use crate::error::Result;
use crate::filmography::extract_other_shows;
use crate::parser::{extract_search_result, extract_show_details};
use crate::report::{CrawlReport, CrawlState, EntryOutcome, EntryReport};
use crate::url_builder::CatalogUrls;
use showgraph_core::{CrawlConfig, ShowId, ShowObservation, WriterId};
use showgraph_db::{credits, leads, shows, writers, Database, ShowRef, WriterRef};
use showgraph_fetch::PageFetcher;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

/// What a frontier entry starts from.
#[derive(Debug, Clone)]
enum Target {
    /// A seed title that still needs a search
    Title(String),
    /// A show whose identity is already known
    Lead(ShowObservation),
}

#[derive(Debug, Clone)]
struct FrontierEntry {
    target: Target,
    depth: u32,
}

impl FrontierEntry {
    fn label(&self) -> &str {
        match &self.target {
            Target::Title(title) => title,
            Target::Lead(show) => &show.title,
        }
    }
}

/// Run-scoped traversal state.
#[derive(Debug, Default)]
struct Traversal {
    frontier: VecDeque<FrontierEntry>,
    /// Show identities already taken through resolution
    visited: HashSet<ShowId>,
    /// Show identities waiting in the frontier as leads
    queued: HashSet<ShowId>,
    seeds_started: usize,
}

/// Progress of the entry being processed.
#[derive(Debug)]
struct EntryProgress {
    transitions: Vec<CrawlState>,
    writers_linked: usize,
    leads_enqueued: usize,
}

impl EntryProgress {
    fn new() -> Self {
        Self {
            transitions: vec![CrawlState::Pending],
            writers_linked: 0,
            leads_enqueued: 0,
        }
    }

    fn transition(&mut self, next: CrawlState) {
        let from = self.transitions.last().copied().unwrap_or(CrawlState::Pending);
        tracing::debug!(?from, to = ?next, "Entry transition");
        self.transitions.push(next);
    }
}

/// A persisted writer of the show being processed.
struct LinkedWriter {
    reference: WriterRef,
    id: WriterId,
    name: String,
}

/// Drives a depth-bounded crawl over the catalog.
pub struct CrawlController {
    config: CrawlConfig,
    urls: CatalogUrls,
    fetcher: Arc<dyn PageFetcher>,
    db: Arc<Database>,
}

impl CrawlController {
    /// Create a controller for one configuration.
    #[must_use]
    pub fn new(
        config: CrawlConfig,
        urls: CatalogUrls,
        fetcher: Arc<dyn PageFetcher>,
        db: Arc<Database>,
    ) -> Self {
        Self {
            config,
            urls,
            fetcher,
            db,
        }
    }

    /// Crawl every configured seed title and whatever the frontier grows to.
    ///
    /// Entry failures are reported per entry; the run itself cannot fail.
    pub async fn run(&self) -> CrawlReport {
        let mut traversal = Traversal::default();
        traversal.frontier.extend(
            self.config
                .seed_titles
                .iter()
                .map(|title| FrontierEntry {
                    target: Target::Title(title.clone()),
                    depth: 0,
                }),
        );

        let mut report = CrawlReport::default();

        while let Some(entry) = traversal.frontier.pop_front() {
            if report.entries.len() >= self.config.max_entries {
                report.dropped = traversal.frontier.len() + 1;
                tracing::warn!(
                    max_entries = self.config.max_entries,
                    dropped = report.dropped,
                    "Entry ceiling reached, stopping crawl"
                );
                break;
            }

            if matches!(entry.target, Target::Title(_)) {
                if traversal.seeds_started > 0 {
                    pause(self.config.seed_delay).await;
                }
                traversal.seeds_started += 1;
            }

            report.entries.push(self.process(entry, &mut traversal).await);
        }

        tracing::info!(
            entries = report.entries.len(),
            resolved = report.resolved(),
            not_found = report.not_found(),
            errors = report.errors(),
            "Crawl finished"
        );

        report
    }

    async fn process(&self, entry: FrontierEntry, traversal: &mut Traversal) -> EntryReport {
        let mut progress = EntryProgress::new();
        let title = entry.label().to_string();
        let depth = entry.depth;

        let outcome = match self.process_entry(entry, traversal, &mut progress).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(title = %title, depth, "Entry failed: {}", e);
                EntryOutcome::Error {
                    message: e.to_string(),
                }
            }
        };
        progress.transition(CrawlState::Done);

        EntryReport {
            title,
            depth,
            outcome,
            transitions: progress.transitions,
            writers_linked: progress.writers_linked,
            leads_enqueued: progress.leads_enqueued,
        }
    }

    async fn process_entry(
        &self,
        entry: FrontierEntry,
        traversal: &mut Traversal,
        progress: &mut EntryProgress,
    ) -> Result<EntryOutcome> {
        progress.transition(CrawlState::Resolving);

        let candidate = match entry.target {
            Target::Title(title) => match self.search(&title).await? {
                Some(show) => show,
                None => {
                    tracing::info!(title = %title, depth = entry.depth, "Show not found");
                    return Ok(EntryOutcome::NotFound);
                }
            },
            Target::Lead(show) => {
                traversal.queued.remove(&show.id);
                show
            }
        };

        if !traversal.visited.insert(candidate.id.clone()) {
            tracing::debug!(show_id = %candidate.id, "Show already processed in this run");
            return Ok(EntryOutcome::AlreadyVisited {
                show_id: candidate.id,
            });
        }

        let show = self.resolve_details(candidate).await?;
        let show_ref = shows::upsert_show(self.db.pool(), &show).await?;
        tracing::info!(
            show_id = %show.id,
            title = %show.title,
            depth = entry.depth,
            "Resolved show"
        );

        progress.transition(CrawlState::ExpandingWriters);
        let linked = self.expand_writers(&show, show_ref, progress).await?;
        pause(self.config.politeness_delay).await;

        if entry.depth >= self.config.max_depth {
            return Ok(EntryOutcome::Resolved {
                show_id: show.id,
                title: show.title,
            });
        }

        progress.transition(CrawlState::ExpandingOtherShows);
        for writer in &linked {
            self.expand_other_shows(&show.id, writer, entry.depth + 1, traversal, progress)
                .await?;
        }

        Ok(EntryOutcome::Resolved {
            show_id: show.id,
            title: show.title,
        })
    }

    async fn search(&self, title: &str) -> Result<Option<ShowObservation>> {
        let url = self.urls.search_url(title)?;
        let html = self.fetcher.fetch(&url, self.config.transport_timeout).await?;
        Ok(extract_search_result(&html, title))
    }

    /// Detail page fields override the candidate wholesale when present.
    async fn resolve_details(&self, candidate: ShowObservation) -> Result<ShowObservation> {
        let url = self.urls.title_url(&candidate.id);
        let html = self.fetcher.fetch(&url, self.config.transport_timeout).await?;

        Ok(match extract_show_details(&html, &candidate.id) {
            Some(details) => details,
            None => {
                tracing::debug!(show_id = %candidate.id, "No detail fields, keeping search result");
                candidate
            }
        })
    }

    async fn expand_writers(
        &self,
        show: &ShowObservation,
        show_ref: ShowRef,
        progress: &mut EntryProgress,
    ) -> Result<Vec<LinkedWriter>> {
        let url = self.urls.credits_url(&show.id);
        let html = self.fetcher.fetch(&url, self.config.transport_timeout).await?;
        let extracted = extract_writers(&html);

        tracing::debug!(show_id = %show.id, writers = extracted.len(), "Extracted writers");

        let mut linked = Vec::with_capacity(extracted.len());
        for entry in extracted {
            let writer_ref = writers::upsert_writer(self.db.pool(), &entry.writer).await?;
            credits::link(self.db.pool(), show_ref, writer_ref, &entry.credit).await?;
            progress.writers_linked += 1;

            tracing::debug!(
                writer = %entry.writer.name,
                episodes = ?entry.credit.episode_count,
                "Linked writer"
            );

            linked.push(LinkedWriter {
                reference: writer_ref,
                id: entry.writer.id,
                name: entry.writer.name,
            });
        }

        Ok(linked)
    }

    async fn expand_other_shows(
        &self,
        current: &ShowId,
        writer: &LinkedWriter,
        lead_depth: u32,
        traversal: &mut Traversal,
        progress: &mut EntryProgress,
    ) -> Result<()> {
        let url = self.urls.name_url(&writer.id);
        let html = self.fetcher.fetch(&url, self.config.transport_timeout).await?;

        let others: Vec<ShowObservation> = extract_other_shows(&html)
            .into_iter()
            .filter(|other| &other.id != current)
            .collect();

        tracing::debug!(writer = %writer.name, shows = others.len(), "Found other shows");

        for other in others {
            leads::record_lead(self.db.pool(), writer.reference, &other, lead_depth).await?;
            progress.leads_enqueued += 1;

            if self.config.follow_leads
                && !traversal.visited.contains(&other.id)
                && traversal.queued.insert(other.id.clone())
            {
                traversal.frontier.push_back(FrontierEntry {
                    target: Target::Lead(other),
                    depth: lead_depth,
                });
            }
        }

        Ok(())
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
