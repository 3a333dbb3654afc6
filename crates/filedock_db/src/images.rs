//! Image operations (attach, list, resolve, detach)

use crate::error::{DbError, Result};
use crate::types::ImageRecord;
use crate::FiledockDb;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

impl FiledockDb {
    /// Hand out the next image sort order for a record.
    ///
    /// The counter lives on the record row, so an order is never handed out
    /// twice even after the image holding it is removed.
    pub async fn image_reserve_sort_order(&self, record_id: i64) -> Result<i64> {
        let next: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE file_records
            SET image_seq = MAX(
                    image_seq,
                    COALESCE((SELECT MAX(sort_order) FROM record_images WHERE record_id = ?), 0)
                ) + 1,
                updated_at = ?
            WHERE id = ?
            RETURNING image_seq
            "#,
        )
        .bind(record_id)
        .bind(Self::now_millis())
        .bind(record_id)
        .fetch_optional(&self.pool)
        .await?;

        next.ok_or_else(|| DbError::not_found(format!("file record {record_id}")))
    }

    /// Insert an image row with a previously reserved sort order.
    pub async fn image_insert(
        &self,
        record_id: i64,
        image_path: &str,
        sort_order: i64,
    ) -> Result<ImageRecord> {
        let now = Self::now_millis();

        let result = sqlx::query(
            r#"
            INSERT INTO record_images (record_id, image_path, sort_order, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(record_id)
        .bind(image_path)
        .bind(sort_order)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from_insert(e, image_path))?;

        Ok(ImageRecord {
            id: result.last_insert_rowid(),
            record_id,
            image_path: image_path.to_string(),
            sort_order,
            created_at: Self::millis_to_datetime(now),
            updated_at: Self::millis_to_datetime(now),
        })
    }

    /// Images of a record, by sort order.
    pub async fn image_list(&self, record_id: i64) -> Result<Vec<ImageRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, record_id, image_path, sort_order, created_at, updated_at
            FROM record_images
            WHERE record_id = ?
            ORDER BY sort_order ASC
            "#,
        )
        .bind(record_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_image).collect())
    }

    /// Get an image by ID
    pub async fn image_get(&self, image_id: i64) -> Result<Option<ImageRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, record_id, image_path, sort_order, created_at, updated_at
            FROM record_images
            WHERE id = ?
            "#,
        )
        .bind(image_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_image))
    }

    /// Delete an image row, returning it if it existed.
    pub async fn image_delete(&self, image_id: i64) -> Result<Option<ImageRecord>> {
        let Some(image) = self.image_get(image_id).await? else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM record_images WHERE id = ?")
            .bind(image_id)
            .execute(&self.pool)
            .await?;

        Ok(Some(image))
    }

    /// Total number of attached images.
    pub async fn image_count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM record_images")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn row_to_image(row: &SqliteRow) -> ImageRecord {
    ImageRecord {
        id: row.get("id"),
        record_id: row.get("record_id"),
        image_path: row.get("image_path"),
        sort_order: row.get("sort_order"),
        created_at: FiledockDb::millis_to_datetime(row.get("created_at")),
        updated_at: FiledockDb::millis_to_datetime(row.get("updated_at")),
    }
}
