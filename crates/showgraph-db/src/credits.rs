//! Show-writer credit edges and the reporting queries built on them.
//!
//! There is at most one edge per (show, writer) pair. Re-linking an existing
//! pair merges into the stored row: the episode count only ever grows, and
//! a stored role is never replaced.

use crate::error::Result;
use crate::shows::ShowRef;
use crate::writers::WriterRef;
use serde::{Deserialize, Serialize};
use showgraph_core::CreditObservation;
use sqlx::{Pool, Row, Sqlite};

/// A credit edge as stored, joined with the writer's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredit {
    /// Credited writer
    pub writer: WriterRef,
    /// Writer display name
    pub writer_name: String,
    /// First non-null role observed
    pub role: Option<String>,
    /// Highest episode count observed
    pub episode_count: Option<u32>,
}

/// A writer linked to two or more shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriterOverlap {
    /// Writer display name
    pub writer_name: String,
    /// Titles of the linked shows, alphabetical
    pub shows: Vec<String>,
}

/// Link a writer to a show, merging with any stored edge for the pair.
pub async fn link(
    pool: &Pool<Sqlite>,
    show: ShowRef,
    writer: WriterRef,
    credit: &CreditObservation,
) -> Result<()> {
    sqlx::query(
        r"
        INSERT INTO show_writers (show_id, writer_id, role, episode_count)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(show_id, writer_id) DO UPDATE SET
            role = COALESCE(show_writers.role, excluded.role),
            episode_count = CASE
                WHEN excluded.episode_count IS NOT NULL
                     AND (show_writers.episode_count IS NULL
                          OR excluded.episode_count > show_writers.episode_count)
                THEN excluded.episode_count
                ELSE show_writers.episode_count
            END
        ",
    )
    .bind(show.0)
    .bind(writer.0)
    .bind(credit.role.as_deref())
    .bind(credit.episode_count)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get the credit edges stored for one show, ordered by writer name.
pub async fn writers_for_show(pool: &Pool<Sqlite>, show: ShowRef) -> Result<Vec<StoredCredit>> {
    let rows = sqlx::query(
        "SELECT sw.writer_id, w.name, sw.role, sw.episode_count
         FROM show_writers sw
         JOIN writers w ON w.id = sw.writer_id
         WHERE sw.show_id = ?
         ORDER BY w.name, w.imdb_id",
    )
    .bind(show.0)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(StoredCredit {
                writer: WriterRef(row.try_get("writer_id")?),
                writer_name: row.try_get("name")?,
                role: row.try_get("role")?,
                episode_count: row.try_get("episode_count")?,
            })
        })
        .collect()
}

/// Writers linked to at least two shows, most-linked first.
///
/// Used by reporting only.
pub async fn writer_overlap(pool: &Pool<Sqlite>) -> Result<Vec<WriterOverlap>> {
    let rows = sqlx::query(
        r"
        SELECT w.id AS writer_id, w.name AS writer_name, s.title AS title, counts.show_count
        FROM (
            SELECT writer_id, COUNT(*) AS show_count
            FROM show_writers
            GROUP BY writer_id
            HAVING COUNT(*) >= 2
        ) counts
        JOIN writers w ON w.id = counts.writer_id
        JOIN show_writers sw ON sw.writer_id = w.id
        JOIN shows s ON s.id = sw.show_id
        ORDER BY counts.show_count DESC, w.name, w.id, s.title
        ",
    )
    .fetch_all(pool)
    .await?;

    let mut overlaps: Vec<WriterOverlap> = Vec::new();
    let mut current: Option<i64> = None;

    for row in rows {
        let writer_id: i64 = row.try_get("writer_id")?;
        let title: String = row.try_get("title")?;

        if current == Some(writer_id) {
            if let Some(last) = overlaps.last_mut() {
                last.shows.push(title);
            }
        } else {
            current = Some(writer_id);
            overlaps.push(WriterOverlap {
                writer_name: row.try_get("writer_name")?,
                shows: vec![title],
            });
        }
    }

    Ok(overlaps)
}
