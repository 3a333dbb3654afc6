//! [`CatalogStore`] backed by the SQLite catalog.

use super::traits::CatalogStore;
use async_trait::async_trait;
use filedock_db::{
    FieldsUpdate, FileRecord, FiledockDb, ImageRecord, NewFileRecord, RecordCount, RecordFilter,
    RecordSummary, Result,
};
use tracing::debug;

#[async_trait]
impl CatalogStore for FiledockDb {
    async fn insert_records(&self, records: &[NewFileRecord]) -> Result<u64> {
        self.catalog_insert_records(records).await
    }

    async fn list_origin_paths(&self) -> Result<Vec<String>> {
        self.catalog_list_origin_paths().await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<FileRecord>> {
        self.catalog_get_record(id).await
    }

    async fn set_path_check(&self, origin_path: &str, present: bool) -> Result<()> {
        let touched = self.catalog_set_path_check(origin_path, present).await?;
        if touched == 0 {
            debug!(origin_path, "Path check for a path that is no longer cataloged");
        }
        Ok(())
    }

    async fn set_target_path(&self, id: i64, target_path: Option<&str>) -> Result<()> {
        self.catalog_set_target_path(id, target_path).await
    }

    async fn update_fields(&self, id: i64, update: &FieldsUpdate) -> Result<()> {
        self.catalog_update_fields(id, update).await
    }

    async fn touch_record(&self, id: i64) -> Result<()> {
        self.catalog_touch_record(id).await
    }

    async fn count_records(&self, which: RecordCount) -> Result<i64> {
        self.catalog_count(which).await
    }

    async fn list_records(&self, filter: &RecordFilter) -> Result<Vec<RecordSummary>> {
        self.catalog_list_records(filter).await
    }

    async fn reserve_image_slot(&self, record_id: i64) -> Result<i64> {
        self.image_reserve_sort_order(record_id).await
    }

    async fn insert_image(
        &self,
        record_id: i64,
        image_path: &str,
        sort_order: i64,
    ) -> Result<ImageRecord> {
        self.image_insert(record_id, image_path, sort_order).await
    }

    async fn list_images(&self, record_id: i64) -> Result<Vec<ImageRecord>> {
        self.image_list(record_id).await
    }

    async fn find_image(&self, image_id: i64) -> Result<Option<ImageRecord>> {
        self.image_get(image_id).await
    }

    async fn delete_image(&self, image_id: i64) -> Result<Option<ImageRecord>> {
        self.image_delete(image_id).await
    }

    async fn count_images(&self) -> Result<i64> {
        self.image_count().await
    }
}
