//! Show persistence.
//!
//! Shows are keyed by their source identifier; re-upserting the same
//! identifier updates the mutable fields and keeps the local row id.

use crate::error::{DatabaseError, Result};
use serde::{Deserialize, Serialize};
use showgraph_core::{ShowId, ShowObservation, Timestamp};
use sqlx::{Pool, Row, Sqlite};

/// Durable local reference to a stored show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShowRef(pub i64);

/// A show as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowRecord {
    /// Local row id
    pub id: ShowRef,
    /// Source identifier
    pub imdb_id: ShowId,
    /// Latest observed title
    pub title: String,
    /// First year on air
    pub year_start: Option<i32>,
    /// Last year on air
    pub year_end: Option<i32>,
    /// When this row was last written
    pub updated_at: Timestamp,
}

/// Insert or update a show, returning its local reference.
///
/// The title is always overwritten with the latest observation. Year fields
/// are only overwritten by non-null values.
pub async fn upsert_show(pool: &Pool<Sqlite>, show: &ShowObservation) -> Result<ShowRef> {
    let now = Timestamp::now().to_rfc3339();

    let id: i64 = sqlx::query_scalar(
        r"
        INSERT INTO shows (imdb_id, title, year_start, year_end, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(imdb_id) DO UPDATE SET
            title = excluded.title,
            year_start = COALESCE(excluded.year_start, shows.year_start),
            year_end = COALESCE(excluded.year_end, shows.year_end),
            updated_at = excluded.updated_at
        RETURNING id
        ",
    )
    .bind(show.id.as_str())
    .bind(&show.title)
    .bind(show.year_start)
    .bind(show.year_end)
    .bind(&now)
    .bind(&now)
    .fetch_one(pool)
    .await?;

    tracing::debug!(show_id = %show.id, local_id = id, "Upserted show");
    Ok(ShowRef(id))
}

/// Look up a show by its source identifier.
pub async fn get_by_imdb_id(pool: &Pool<Sqlite>, imdb_id: &ShowId) -> Result<Option<ShowRecord>> {
    let row = sqlx::query(
        "SELECT id, imdb_id, title, year_start, year_end, updated_at
         FROM shows
         WHERE imdb_id = ?",
    )
    .bind(imdb_id.as_str())
    .fetch_optional(pool)
    .await?;

    row.map(|row| parse_show_row(&row)).transpose()
}

/// List every stored show ordered by title.
pub async fn list_shows(pool: &Pool<Sqlite>) -> Result<Vec<ShowRecord>> {
    let rows = sqlx::query(
        "SELECT id, imdb_id, title, year_start, year_end, updated_at
         FROM shows
         ORDER BY title, imdb_id",
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(parse_show_row).collect()
}

fn parse_show_row(row: &sqlx::sqlite::SqliteRow) -> Result<ShowRecord> {
    let imdb_id: String = row.try_get("imdb_id")?;
    let imdb_id = ShowId::new(imdb_id).map_err(|e| DatabaseError::Decode(e.to_string()))?;

    let updated_at: String = row.try_get("updated_at")?;
    let updated_at =
        Timestamp::from_rfc3339(&updated_at).map_err(|e| DatabaseError::Decode(e.to_string()))?;

    Ok(ShowRecord {
        id: ShowRef(row.try_get("id")?),
        imdb_id,
        title: row.try_get("title")?,
        year_start: row.try_get("year_start")?,
        year_end: row.try_get("year_end")?,
        updated_at,
    })
}
