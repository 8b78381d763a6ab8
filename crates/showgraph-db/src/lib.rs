//! Showgraph Database Layer
//!
//! Provides `SQLite` storage for the show/writer credit graph.
//! Uses `SQLx` with embedded migrations.
//!
//! # Architecture
//!
//! - **Idempotent upserts**: shows and writers are keyed by source identifier
//! - **Credit merge in SQL**: re-linking a pair never regresses its episode count
//! - **Migrations**: SQL migrations are embedded and versioned using `SQLx`
//!
//! # Example
//!
//! ```ignore
//! use showgraph_db::{shows, Database};
//!
//! let db = Database::new("showgraph.db").await?;
//! db.run_migrations().await?;
//! let show_ref = shows::upsert_show(db.pool(), &observation).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod connection;
pub mod credits;
pub mod error;
pub mod leads;
pub mod migrations;
pub mod shows;
pub mod writers;

// Re-export commonly used types
pub use connection::DbPool;
pub use credits::{StoredCredit, WriterOverlap};
pub use error::{DatabaseError, Result};
pub use leads::Lead;
pub use shows::{ShowRecord, ShowRef};
pub use writers::{WriterRecord, WriterRef};

use std::path::Path;

/// High-level database interface with migrations.
#[derive(Debug, Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Open a database at the specified path (or `:memory:` for in-memory).
    ///
    /// # Errors
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new(path: impl AsRef<Path>) -> Result<Self> {
        let pool = DbPool::new(path).await?;
        Ok(Self { pool })
    }

    /// Open a database and bring its schema up to date.
    pub async fn open_and_migrate(path: impl AsRef<Path>) -> Result<Self> {
        let db = Self::new(path).await?;
        db.run_migrations().await?;
        Ok(db)
    }

    /// Run all pending database migrations.
    ///
    /// # Errors
    /// Returns `DatabaseError::Migration` if any migration fails.
    pub async fn run_migrations(&self) -> Result<()> {
        migrations::run_migrations(self.pool.pool()).await
    }

    /// Get the current schema version.
    pub async fn get_schema_version(&self) -> Result<i64> {
        migrations::get_schema_version(self.pool.pool()).await
    }

    /// Get a reference to the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Sqlite> {
        self.pool.pool()
    }

    /// Close the database connection gracefully.
    pub async fn close(self) {
        self.pool.close().await;
    }
}
