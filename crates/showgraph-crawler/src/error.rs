use thiserror::Error;

/// Failures that abort the current frontier entry.
///
/// A search that matches nothing is not an error; see
/// [`EntryOutcome::NotFound`](crate::report::EntryOutcome::NotFound).
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Transport error: {0}")]
    Transport(#[from] showgraph_fetch::FetchError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] showgraph_db::DatabaseError),

    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, CrawlError>;
