//! Store wrapper for engine tests: delegates to an in-memory catalog and
//! fails the chosen operation on demand.

use crate::storage::CatalogStore;
use async_trait::async_trait;
use filedock_db::{
    DbError, FieldsUpdate, FiledockDb, FileRecord, ImageRecord, NewFileRecord, RecordCount,
    RecordFilter, RecordSummary, Result,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailOn {
    Nothing,
    Insert,
    PathCheck,
    TargetPath,
    UpdateFields,
    InsertImage,
}

pub(crate) struct FlakyStore {
    inner: FiledockDb,
    fail_on: Mutex<FailOn>,
    calls: AtomicUsize,
}

impl FlakyStore {
    pub(crate) async fn new(fail_on: FailOn) -> Self {
        Self {
            inner: FiledockDb::open_in_memory().await.unwrap(),
            fail_on: Mutex::new(fail_on),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn inner(&self) -> &FiledockDb {
        &self.inner
    }

    pub(crate) fn fail_on(&self, op: FailOn) {
        *self.fail_on.lock().unwrap() = op;
    }

    /// Number of store calls made so far.
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self, op: FailOn) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if op != FailOn::Nothing && *self.fail_on.lock().unwrap() == op {
            return Err(DbError::constraint(format!("injected failure on {op:?}")));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for FlakyStore {
    async fn insert_records(&self, records: &[NewFileRecord]) -> Result<u64> {
        self.enter(FailOn::Insert)?;
        self.inner.insert_records(records).await
    }

    async fn list_origin_paths(&self) -> Result<Vec<String>> {
        self.enter(FailOn::Nothing)?;
        self.inner.list_origin_paths().await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<FileRecord>> {
        self.enter(FailOn::Nothing)?;
        self.inner.find_by_id(id).await
    }

    async fn set_path_check(&self, origin_path: &str, present: bool) -> Result<()> {
        self.enter(FailOn::PathCheck)?;
        self.inner.set_path_check(origin_path, present).await
    }

    async fn set_target_path(&self, id: i64, target_path: Option<&str>) -> Result<()> {
        self.enter(FailOn::TargetPath)?;
        self.inner.set_target_path(id, target_path).await
    }

    async fn update_fields(&self, id: i64, update: &FieldsUpdate) -> Result<()> {
        self.enter(FailOn::UpdateFields)?;
        self.inner.update_fields(id, update).await
    }

    async fn touch_record(&self, id: i64) -> Result<()> {
        self.enter(FailOn::Nothing)?;
        self.inner.touch_record(id).await
    }

    async fn count_records(&self, which: RecordCount) -> Result<i64> {
        self.enter(FailOn::Nothing)?;
        self.inner.count_records(which).await
    }

    async fn list_records(&self, filter: &RecordFilter) -> Result<Vec<RecordSummary>> {
        self.enter(FailOn::Nothing)?;
        self.inner.list_records(filter).await
    }

    async fn reserve_image_slot(&self, record_id: i64) -> Result<i64> {
        self.enter(FailOn::Nothing)?;
        self.inner.reserve_image_slot(record_id).await
    }

    async fn insert_image(
        &self,
        record_id: i64,
        image_path: &str,
        sort_order: i64,
    ) -> Result<ImageRecord> {
        self.enter(FailOn::InsertImage)?;
        self.inner.insert_image(record_id, image_path, sort_order).await
    }

    async fn list_images(&self, record_id: i64) -> Result<Vec<ImageRecord>> {
        self.enter(FailOn::Nothing)?;
        self.inner.list_images(record_id).await
    }

    async fn find_image(&self, image_id: i64) -> Result<Option<ImageRecord>> {
        self.enter(FailOn::Nothing)?;
        self.inner.find_image(image_id).await
    }

    async fn delete_image(&self, image_id: i64) -> Result<Option<ImageRecord>> {
        self.enter(FailOn::Nothing)?;
        self.inner.delete_image(image_id).await
    }

    async fn count_images(&self) -> Result<i64> {
        self.enter(FailOn::Nothing)?;
        self.inner.count_images().await
    }
}

/// Catalog `origin` and return the new record's id.
pub(crate) async fn seed_record(db: &FiledockDb, origin: &std::path::Path) -> i64 {
    let origin = origin.to_string_lossy().into_owned();
    let file_name = crate::catalog::paths::file_name_of(&origin);
    db.catalog_insert_records(&[NewFileRecord::new(origin.clone(), file_name)])
        .await
        .unwrap();

    db.catalog_list_records(&RecordFilter::default())
        .await
        .unwrap()
        .into_iter()
        .find(|summary| summary.record.origin_path == origin)
        .map(|summary| summary.record.id)
        .unwrap()
}
