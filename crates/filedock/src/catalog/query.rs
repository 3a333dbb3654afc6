//! Read-only views over the catalog.

use super::error::{CatalogError, Result};
use crate::storage::CatalogStore;
use filedock_db::{FileRecord, ImageRecord, RecordCount, RecordFilter, RecordSummary};
use serde::Serialize;

/// One record with its images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDetail {
    #[serde(flatten)]
    pub record: FileRecord,
    pub images: Vec<ImageRecord>,
}

/// Catalog-wide counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total: i64,
    pub missing: i64,
    /// Records no sync has checked yet
    pub unchecked: i64,
    pub converted: i64,
    pub images: i64,
}

pub struct QueryService<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: CatalogStore + ?Sized> QueryService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Records matching every filter, ordered by id.
    pub async fn list(&self, filter: &RecordFilter) -> Result<Vec<RecordSummary>> {
        Ok(self.store.list_records(filter).await?)
    }

    pub async fn get(&self, record_id: i64) -> Result<RecordDetail> {
        let record = self
            .store
            .find_by_id(record_id)
            .await?
            .ok_or(CatalogError::RecordNotFound(record_id))?;
        let images = self.store.list_images(record_id).await?;
        Ok(RecordDetail { record, images })
    }

    pub async fn stats(&self) -> Result<CatalogStats> {
        Ok(CatalogStats {
            total: self.store.count_records(RecordCount::All).await?,
            missing: self.store.count_records(RecordCount::Missing).await?,
            unchecked: self.store.count_records(RecordCount::Unchecked).await?,
            converted: self.store.count_records(RecordCount::Converted).await?,
            images: self.store.count_images().await?,
        })
    }
}
