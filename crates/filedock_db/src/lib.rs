//! Catalog store for filedock
//!
//! Owns the two catalog tables: `file_records` (one row per tracked file) and
//! `record_images` (images attached to a record). Every other crate reaches
//! the database through [`FiledockDb`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use filedock_db::{FiledockDb, RecordFilter};
//!
//! let db = FiledockDb::open("~/.filedock/filedock.sqlite3").await?;
//!
//! let paths = db.catalog_list_origin_paths().await?;
//! let rows = db.catalog_list_records(&RecordFilter::default()).await?;
//! let images = db.image_list(rows[0].record.id).await?;
//! ```

mod error;
mod schema;
mod types;

mod images;
mod records;

pub use error::{DbError, Result};
pub use types::*;

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::info;

/// Handle to the catalog database.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct FiledockDb {
    pool: SqlitePool,
}

impl FiledockDb {
    /// Open or create a database at the given path.
    ///
    /// Creates all tables if they don't exist.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let url = format!("sqlite:{}?mode=rwc", path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        let db = Self { pool };
        db.ensure_schema().await?;

        info!(path = %path.display(), "Catalog database opened");

        Ok(db)
    }

    /// Open a private in-memory database. Used by tests.
    pub async fn open_in_memory() -> Result<Self> {
        // One connection: every pooled connection to :memory: is its own database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let db = Self { pool };
        db.ensure_schema().await?;
        Ok(db)
    }

    /// Close the database connection.
    pub async fn close(self) {
        self.pool.close().await;
    }
}

// Timestamp utilities
impl FiledockDb {
    /// Current time as milliseconds since Unix epoch.
    pub fn now_millis() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    /// Convert milliseconds to DateTime.
    pub fn millis_to_datetime(millis: i64) -> chrono::DateTime<chrono::Utc> {
        chrono::DateTime::from_timestamp_millis(millis).unwrap_or_else(chrono::Utc::now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_creates_database() {
        let tmp = TempDir::new().unwrap();
        let db_path = tmp.path().join("nested").join("catalog.sqlite3");

        let db = FiledockDb::open(&db_path).await.unwrap();
        assert!(db_path.exists());

        db.close().await;
    }

    #[tokio::test]
    async fn test_reopen_keeps_rows() {
        let tmp = TempDir::new().unwrap();
        let db_path = tmp.path().join("catalog.sqlite3");

        let db = FiledockDb::open(&db_path).await.unwrap();
        db.catalog_insert_records(&[NewFileRecord::new("/src/a.txt", "a.txt")])
            .await
            .unwrap();
        db.close().await;

        let db = FiledockDb::open(&db_path).await.unwrap();
        assert_eq!(db.catalog_count(RecordCount::All).await.unwrap(), 1);
    }

    #[test]
    fn test_millis_round_trip() {
        let dt = FiledockDb::millis_to_datetime(1_737_187_200_000);
        assert_eq!(dt.timestamp_millis(), 1_737_187_200_000);
    }
}
