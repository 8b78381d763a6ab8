//! Other-show leads discovered on writer profile pages.
//!
//! A lead records that a writer was credited on a show the crawl has not
//! necessarily visited. Leads are informational unless the crawl is
//! configured to follow them.

use crate::error::{DatabaseError, Result};
use crate::writers::WriterRef;
use serde::{Deserialize, Serialize};
use showgraph_core::{ShowId, ShowObservation, Timestamp};
use sqlx::{Pool, Row, Sqlite};

/// A stored lead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    /// Writer whose profile mentioned the show
    pub writer: WriterRef,
    /// Source identifier of the show
    pub imdb_id: ShowId,
    /// Title as shown on the profile
    pub title: String,
    /// Frontier depth the lead would be crawled at
    pub depth: u32,
    /// First time the lead was seen
    pub discovered_at: Timestamp,
}

/// Record a lead; recording the same (writer, show) pair again is a no-op.
pub async fn record_lead(
    pool: &Pool<Sqlite>,
    writer: WriterRef,
    show: &ShowObservation,
    depth: u32,
) -> Result<()> {
    sqlx::query(
        r"
        INSERT INTO show_leads (writer_id, imdb_id, title, depth, discovered_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(writer_id, imdb_id) DO NOTHING
        ",
    )
    .bind(writer.0)
    .bind(show.id.as_str())
    .bind(&show.title)
    .bind(depth)
    .bind(Timestamp::now().to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// List every lead in discovery order.
pub async fn list_leads(pool: &Pool<Sqlite>) -> Result<Vec<Lead>> {
    let rows = sqlx::query(
        "SELECT writer_id, imdb_id, title, depth, discovered_at
         FROM show_leads
         ORDER BY discovered_at, rowid",
    )
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            let imdb_id: String = row.try_get("imdb_id")?;
            let discovered_at: String = row.try_get("discovered_at")?;
            Ok(Lead {
                writer: WriterRef(row.try_get("writer_id")?),
                imdb_id: ShowId::new(imdb_id).map_err(|e| DatabaseError::Decode(e.to_string()))?,
                title: row.try_get("title")?,
                depth: row.try_get("depth")?,
                discovered_at: Timestamp::from_rfc3339(&discovered_at)
                    .map_err(|e| DatabaseError::Decode(e.to_string()))?,
            })
        })
        .collect()
}
