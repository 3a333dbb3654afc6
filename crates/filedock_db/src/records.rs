//! File record operations (sync, convert/clear, editing, listing)

use crate::error::{DbError, Result};
use crate::types::*;
use crate::FiledockDb;
use sqlx::sqlite::{Sqlite, SqliteRow};
use sqlx::{QueryBuilder, Row};

const RECORD_COLUMNS: &str = "r.id, r.origin_path, r.file_name, r.name, r.class, r.prompt, \
     r.target_path, r.path_check, r.created_at, r.updated_at";

impl FiledockDb {
    // ========================================================================
    // Sync
    // ========================================================================

    /// Insert newly discovered files. All rows go in one transaction.
    ///
    /// Returns the number of rows inserted.
    pub async fn catalog_insert_records(&self, records: &[NewFileRecord]) -> Result<u64> {
        if records.is_empty() {
            return Ok(0);
        }

        let now = Self::now_millis();
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0u64;

        for record in records {
            let result = sqlx::query(
                r#"
                INSERT INTO file_records (origin_path, file_name, created_at, updated_at)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(&record.origin_path)
            .bind(&record.file_name)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| DbError::from_insert(e, &record.origin_path))?;

            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// Every origin path currently in the catalog.
    pub async fn catalog_list_origin_paths(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT origin_path FROM file_records ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(|row| row.get("origin_path")).collect())
    }

    /// Record the result of an existence check for an origin path.
    ///
    /// Returns the number of rows touched (0 if the path is not cataloged).
    pub async fn catalog_set_path_check(&self, origin_path: &str, present: bool) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE file_records SET path_check = ?, updated_at = ? WHERE origin_path = ?",
        )
        .bind(i64::from(present))
        .bind(Self::now_millis())
        .bind(origin_path)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    // ========================================================================
    // Single Record
    // ========================================================================

    /// Get a record by ID
    pub async fn catalog_get_record(&self, id: i64) -> Result<Option<FileRecord>> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM file_records r WHERE r.id = ?");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row_to_record(&row))),
            None => Ok(None),
        }
    }

    /// Set or clear the destination copy of a record.
    pub async fn catalog_set_target_path(&self, id: i64, target_path: Option<&str>) -> Result<()> {
        let result =
            sqlx::query("UPDATE file_records SET target_path = ?, updated_at = ? WHERE id = ?")
                .bind(target_path)
                .bind(Self::now_millis())
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(format!("file record {id}")));
        }
        Ok(())
    }

    /// Apply descriptive field changes to a record.
    pub async fn catalog_update_fields(&self, id: i64, update: &FieldsUpdate) -> Result<()> {
        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE file_records SET updated_at = ");
        builder.push_bind(Self::now_millis());

        if let Some(name) = &update.name {
            builder.push(", name = ");
            builder.push_bind(name.as_deref());
        }
        if let Some(class) = &update.class {
            builder.push(", class = ");
            builder.push_bind(class.as_deref());
        }
        if let Some(prompt) = &update.prompt {
            builder.push(", prompt = ");
            builder.push_bind(prompt.as_deref());
        }

        builder.push(" WHERE id = ");
        builder.push_bind(id);

        let result = builder.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DbError::not_found(format!("file record {id}")));
        }
        Ok(())
    }

    /// Refresh `updated_at` without changing anything else.
    pub async fn catalog_touch_record(&self, id: i64) -> Result<()> {
        sqlx::query("UPDATE file_records SET updated_at = ? WHERE id = ?")
            .bind(Self::now_millis())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ========================================================================
    // Listing & Counts
    // ========================================================================

    /// Count records matching a predicate.
    pub async fn catalog_count(&self, which: RecordCount) -> Result<i64> {
        let sql = match which {
            RecordCount::All => "SELECT COUNT(*) FROM file_records",
            RecordCount::Missing => "SELECT COUNT(*) FROM file_records WHERE path_check = 0",
            RecordCount::Unchecked => {
                "SELECT COUNT(*) FROM file_records WHERE path_check IS NULL"
            }
            RecordCount::Converted => {
                "SELECT COUNT(*) FROM file_records WHERE target_path IS NOT NULL"
            }
        };

        let count: i64 = sqlx::query_scalar(sql).fetch_one(&self.pool).await?;
        Ok(count)
    }

    /// List records matching a filter, ordered by ID.
    pub async fn catalog_list_records(&self, filter: &RecordFilter) -> Result<Vec<RecordSummary>> {
        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {RECORD_COLUMNS}, \
             (SELECT COUNT(*) FROM record_images i WHERE i.record_id = r.id) AS image_count \
             FROM file_records r WHERE 1=1"
        ));

        let text_filters = [
            ("r.name", &filter.name),
            ("r.class", &filter.class),
            ("r.prompt", &filter.prompt),
            ("r.file_name", &filter.file_name),
        ];
        for (column, value) in text_filters {
            if let Some(pattern) = value.as_deref().and_then(like_pattern) {
                builder.push(format!(" AND {column} LIKE "));
                builder.push_bind(pattern);
                builder.push(" ESCAPE '\\'");
            }
        }

        if filter.missing_only {
            builder.push(" AND r.path_check = 0");
        }
        match filter.converted {
            Some(true) => {
                builder.push(" AND r.target_path IS NOT NULL");
            }
            Some(false) => {
                builder.push(" AND r.target_path IS NULL");
            }
            None => {}
        }

        builder.push(" ORDER BY r.id");
        if let Some(limit) = filter.limit {
            builder.push(" LIMIT ");
            builder.push_bind(limit.max(0));
        }

        let rows = builder.build().fetch_all(&self.pool).await?;
        Ok(rows
            .iter()
            .map(|row| RecordSummary {
                record: row_to_record(row),
                image_count: row.get("image_count"),
            })
            .collect())
    }
}

fn row_to_record(row: &SqliteRow) -> FileRecord {
    FileRecord {
        id: row.get("id"),
        origin_path: row.get("origin_path"),
        file_name: row.get("file_name"),
        name: row.get("name"),
        class: row.get("class"),
        prompt: row.get("prompt"),
        target_path: row.get("target_path"),
        path_check: row.get::<Option<i64>, _>("path_check").map(|v| v != 0),
        created_at: FiledockDb::millis_to_datetime(row.get("created_at")),
        updated_at: FiledockDb::millis_to_datetime(row.get("updated_at")),
    }
}

/// Build a `LIKE` substring pattern, or `None` for a blank filter.
fn like_pattern(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut pattern = String::with_capacity(trimmed.len() + 2);
    pattern.push('%');
    for ch in trimmed.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    Some(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_blank_is_ignored() {
        assert_eq!(like_pattern(""), None);
        assert_eq!(like_pattern("   "), None);
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern(" cat ").as_deref(), Some("%cat%"));
        assert_eq!(like_pattern("50%_off").as_deref(), Some("%50\\%\\_off%"));
    }

    #[tokio::test]
    async fn test_update_fields_sets_and_clears() {
        let db = FiledockDb::open_in_memory().await.unwrap();
        db.catalog_insert_records(&[NewFileRecord::new("/src/a.txt", "a.txt")])
            .await
            .unwrap();

        let update = FieldsUpdate {
            name: Some(Some("Alpha".to_string())),
            class: Some(Some("docs".to_string())),
            prompt: None,
        };
        db.catalog_update_fields(1, &update).await.unwrap();

        let record = db.catalog_get_record(1).await.unwrap().unwrap();
        assert_eq!(record.name.as_deref(), Some("Alpha"));
        assert_eq!(record.class.as_deref(), Some("docs"));
        assert_eq!(record.prompt, None);

        let clear = FieldsUpdate {
            class: Some(None),
            ..Default::default()
        };
        db.catalog_update_fields(1, &clear).await.unwrap();

        let record = db.catalog_get_record(1).await.unwrap().unwrap();
        assert_eq!(record.name.as_deref(), Some("Alpha"));
        assert_eq!(record.class, None);
    }

    #[tokio::test]
    async fn test_update_fields_unknown_record() {
        let db = FiledockDb::open_in_memory().await.unwrap();
        let update = FieldsUpdate {
            name: Some(Some("x".to_string())),
            ..Default::default()
        };

        let result = db.catalog_update_fields(42, &update).await;
        assert!(matches!(result, Err(DbError::NotFound(_))));
    }
}
