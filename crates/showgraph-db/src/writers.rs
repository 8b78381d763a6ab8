//! Writer persistence.

use crate::error::{DatabaseError, Result};
use serde::{Deserialize, Serialize};
use showgraph_core::{Timestamp, WriterId, WriterObservation};
use sqlx::{Pool, Row, Sqlite};

/// Durable local reference to a stored writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WriterRef(pub i64);

/// A writer as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriterRecord {
    /// Local row id
    pub id: WriterRef,
    /// Source identifier
    pub imdb_id: WriterId,
    /// Latest observed name
    pub name: String,
}

/// Insert or update a writer, returning its local reference.
pub async fn upsert_writer(pool: &Pool<Sqlite>, writer: &WriterObservation) -> Result<WriterRef> {
    let now = Timestamp::now().to_rfc3339();

    let id: i64 = sqlx::query_scalar(
        r"
        INSERT INTO writers (imdb_id, name, created_at, updated_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(imdb_id) DO UPDATE SET
            name = excluded.name,
            updated_at = excluded.updated_at
        RETURNING id
        ",
    )
    .bind(writer.id.as_str())
    .bind(&writer.name)
    .bind(&now)
    .bind(&now)
    .fetch_one(pool)
    .await?;

    Ok(WriterRef(id))
}

/// List every stored writer ordered by name.
pub async fn list_writers(pool: &Pool<Sqlite>) -> Result<Vec<WriterRecord>> {
    let rows = sqlx::query("SELECT id, imdb_id, name FROM writers ORDER BY name, imdb_id")
        .fetch_all(pool)
        .await?;

    rows.iter()
        .map(|row| {
            let imdb_id: String = row.try_get("imdb_id")?;
            Ok(WriterRecord {
                id: WriterRef(row.try_get("id")?),
                imdb_id: WriterId::new(imdb_id)
                    .map_err(|e| DatabaseError::Decode(e.to_string()))?,
                name: row.try_get("name")?,
            })
        })
        .collect()
}
