//! Record editor: change the descriptive fields of a record.

use super::error::{CatalogError, Result};
use crate::storage::CatalogStore;
use filedock_db::{FieldsUpdate, FileRecord};
use serde::Deserialize;
use tracing::info;

/// Requested field changes. `None` leaves a field as it is; a blank value
/// clears it; anything else is stored trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RecordEdit {
    pub name: Option<String>,
    pub class: Option<String>,
    pub prompt: Option<String>,
}

impl RecordEdit {
    fn to_update(&self) -> FieldsUpdate {
        FieldsUpdate {
            name: self.name.as_deref().map(normalize),
            class: self.class.as_deref().map(normalize),
            prompt: self.prompt.as_deref().map(normalize),
        }
    }
}

fn normalize(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

pub struct RecordEditor<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: CatalogStore + ?Sized> RecordEditor<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Apply `edit` and return the updated record.
    pub async fn edit(&self, record_id: i64, edit: &RecordEdit) -> Result<FileRecord> {
        let update = edit.to_update();
        if update.is_empty() {
            return Err(CatalogError::EmptyEdit);
        }

        if self.store.find_by_id(record_id).await?.is_none() {
            return Err(CatalogError::RecordNotFound(record_id));
        }

        self.store.update_fields(record_id, &update).await?;
        info!(record_id, "Record fields updated");

        self.store
            .find_by_id(record_id)
            .await?
            .ok_or(CatalogError::RecordNotFound(record_id))
    }
}
