//! Schema for the credit graph.
//!
//! `shows` and `writers` hold one row per catalog identifier. `show_writers`
//! holds the credit edges, one per (show, writer) pair, and `show_leads`
//! records other shows seen on a writer's profile together with the depth
//! they were found at. The SQL lives in `migrations/` and is compiled in.

use crate::error::{DatabaseError, Result};
use sqlx::{Pool, Sqlite};

/// Bring the graph tables up to the latest version.
///
/// Called by `Database::open_and_migrate` before any show or writer is
/// written. Versions already recorded in `_sqlx_migrations` are skipped.
///
/// # Errors
/// Returns `DatabaseError::Migration` if any migration fails to execute.
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<()> {
    tracing::info!("Running database migrations");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DatabaseError::Migration(format!("migration execution failed: {e}")))?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}

/// Highest applied migration; 3 once `show_leads` exists, 0 on a fresh file.
pub async fn get_schema_version(pool: &Pool<Sqlite>) -> Result<i64> {
    let table_exists = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?
        > 0;

    if !table_exists {
        return Ok(0);
    }

    let version =
        sqlx::query_scalar::<_, i64>("SELECT COALESCE(MAX(version), 0) FROM _sqlx_migrations")
            .fetch_optional(pool)
            .await?
            .unwrap_or(0);

    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::DbPool;

    #[tokio::test]
    async fn test_run_migrations() {
        let pool = DbPool::new(":memory:").await.expect("create pool");

        run_migrations(pool.pool()).await.expect("run migrations");

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '_sqlx_migrations' ORDER BY name"
        )
        .fetch_all(pool.pool())
        .await
        .expect("query tables");

        assert_eq!(tables, vec!["show_leads", "show_writers", "shows", "writers"]);
    }

    #[tokio::test]
    async fn test_get_schema_version() {
        let pool = DbPool::new(":memory:").await.expect("create pool");

        let version = get_schema_version(pool.pool()).await.expect("get version");
        assert_eq!(version, 0);

        run_migrations(pool.pool()).await.expect("run migrations");

        let version = get_schema_version(pool.pool()).await.expect("get version");
        assert_eq!(version, 3);
    }

    #[tokio::test]
    async fn test_migrations_idempotent() {
        let pool = DbPool::new(":memory:").await.expect("create pool");

        run_migrations(pool.pool())
            .await
            .expect("first migration run");
        run_migrations(pool.pool())
            .await
            .expect("second migration run should be idempotent");

        let version = get_schema_version(pool.pool()).await.expect("get version");
        assert_eq!(version, 3);
    }

    #[tokio::test]
    async fn test_credit_edges_are_unique_per_pair() {
        let pool = DbPool::new(":memory:").await.expect("create pool");
        run_migrations(pool.pool()).await.expect("run migrations");

        sqlx::query(
            "INSERT INTO shows (imdb_id, title, created_at, updated_at) \
             VALUES ('tt0285403', 'Scrubs', '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
        )
        .execute(pool.pool())
        .await
        .expect("insert show");
        sqlx::query(
            "INSERT INTO writers (imdb_id, name, created_at, updated_at) \
             VALUES ('nm0488939', 'Bill Lawrence', '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
        )
        .execute(pool.pool())
        .await
        .expect("insert writer");

        let edge = "INSERT INTO show_writers (show_id, writer_id, role, episode_count) \
                    VALUES (1, 1, 'created by', ?)";
        sqlx::query(edge)
            .bind(182)
            .execute(pool.pool())
            .await
            .expect("insert credit edge");

        assert!(sqlx::query(edge).bind(3).execute(pool.pool()).await.is_err());

        let negative = sqlx::query(
            "UPDATE show_writers SET episode_count = -1 WHERE show_id = 1 AND writer_id = 1",
        )
        .execute(pool.pool())
        .await;
        assert!(negative.is_err());

        let duplicate_show = sqlx::query(
            "INSERT INTO shows (imdb_id, title, created_at, updated_at) \
             VALUES ('tt0285403', 'Scrubs', '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
        )
        .execute(pool.pool())
        .await;
        assert!(duplicate_show.is_err());
    }
}
