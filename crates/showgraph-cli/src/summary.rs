//! End-of-run summary.

use showgraph_crawler::CrawlReport;
use showgraph_db::{credits, shows, writers, Database, WriterOverlap};
use std::fmt;

/// Overlapping writers listed in the printed summary.
const TOP_OVERLAPS: usize = 10;

/// Totals read back from the store after a crawl.
#[derive(Debug)]
pub struct Summary {
    pub shows: usize,
    pub writers: usize,
    pub overlaps: Vec<WriterOverlap>,
    pub resolved: usize,
    pub not_found: usize,
    pub errors: usize,
}

impl Summary {
    pub async fn collect(db: &Database, report: &CrawlReport) -> showgraph_db::Result<Self> {
        Ok(Self {
            shows: shows::list_shows(db.pool()).await?.len(),
            writers: writers::list_writers(db.pool()).await?.len(),
            overlaps: credits::writer_overlap(db.pool()).await?,
            resolved: report.resolved(),
            not_found: report.not_found(),
            errors: report.errors(),
        })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "=".repeat(50))?;
        writeln!(
            f,
            "Crawl complete: {} resolved, {} not found, {} failed",
            self.resolved, self.not_found, self.errors
        )?;
        writeln!(f)?;
        writeln!(f, "Total shows: {}", self.shows)?;
        writeln!(f, "Total writers: {}", self.writers)?;
        writeln!(f, "Writers with overlap: {}", self.overlaps.len())?;

        if !self.overlaps.is_empty() {
            writeln!(f)?;
            writeln!(f, "Writers appearing in multiple shows:")?;
            for overlap in self.overlaps.iter().take(TOP_OVERLAPS) {
                writeln!(f, "  {}: {}", overlap.writer_name, overlap.shows.join(", "))?;
            }
        }

        Ok(())
    }
}
