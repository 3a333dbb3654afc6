//! Catalog schema creation.
//!
//! All CREATE TABLE statements live here.

use crate::error::Result;
use crate::FiledockDb;
use tracing::debug;

impl FiledockDb {
    /// Ensure all tables exist.
    pub(crate) async fn ensure_schema(&self) -> Result<()> {
        sqlx::query("PRAGMA journal_mode=WAL")
            .execute(&self.pool)
            .await?;
        sqlx::query("PRAGMA synchronous=NORMAL")
            .execute(&self.pool)
            .await?;
        sqlx::query("PRAGMA foreign_keys=ON")
            .execute(&self.pool)
            .await?;

        self.create_catalog_tables().await?;
        self.create_image_tables().await?;

        debug!("Catalog schema verified");
        Ok(())
    }

    /// Tracked files and their path state
    async fn create_catalog_tables(&self) -> Result<()> {
        // path_check: NULL until the first sync after insert, then 1 = present, 0 = missing.
        // image_seq: highest image sort_order ever handed out for the record.
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS file_records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                origin_path TEXT NOT NULL UNIQUE,
                file_name TEXT NOT NULL,
                name TEXT,
                class TEXT,
                prompt TEXT,
                target_path TEXT,
                path_check INTEGER,
                image_seq INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )"#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_file_records_path_check ON file_records(path_check)",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_file_records_file_name ON file_records(file_name)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Images attached to records
    async fn create_image_tables(&self) -> Result<()> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS record_images (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                record_id INTEGER NOT NULL REFERENCES file_records(id) ON DELETE CASCADE,
                image_path TEXT NOT NULL,
                sort_order INTEGER NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                UNIQUE(record_id, sort_order)
            )"#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_record_images_record ON record_images(record_id, sort_order)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
