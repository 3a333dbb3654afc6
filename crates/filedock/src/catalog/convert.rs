//! Copy engine: copy a cataloged file into the destination tree.

use super::error::{CatalogError, Result};
use super::paths::{path_to_string, CatalogRoots};
use crate::storage::{CatalogStore, FileSystem};
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tracing::{debug, info};

/// Result of a successful `convert`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertOutcome {
    /// The destination file was already there; nothing was copied or stored.
    pub already_exists: bool,
    pub origin_path: String,
    pub dest_path: String,
    pub file_name: String,
}

pub struct CopyEngine<'a, S: ?Sized, F: ?Sized> {
    store: &'a S,
    fs: &'a F,
    roots: &'a CatalogRoots,
}

impl<'a, S, F> CopyEngine<'a, S, F>
where
    S: CatalogStore + ?Sized,
    F: FileSystem + ?Sized,
{
    pub fn new(store: &'a S, fs: &'a F, roots: &'a CatalogRoots) -> Self {
        Self { store, fs, roots }
    }

    /// Copy the record's origin file to the mirrored path under the
    /// destination root and record where it went.
    ///
    /// An existing destination file is never overwritten; the call reports
    /// `already_exists` and leaves the record alone.
    pub async fn convert(&self, record_id: i64) -> Result<ConvertOutcome> {
        let record = self
            .store
            .find_by_id(record_id)
            .await?
            .ok_or(CatalogError::RecordNotFound(record_id))?;

        let origin = PathBuf::from(&record.origin_path);
        let dest = self.roots.map_to_destination(&origin)?;
        let outcome = |already_exists| ConvertOutcome {
            already_exists,
            origin_path: record.origin_path.clone(),
            dest_path: path_to_string(&dest),
            file_name: record.file_name.clone(),
        };

        if self.fs.exists(&dest) {
            info!(record_id, dest = %dest.display(), "Destination already exists, skipping copy");
            return Ok(outcome(true));
        }

        if !self.fs.exists(&origin) {
            return Err(CatalogError::SourceMissing(record.origin_path.clone()));
        }

        if let Some(parent) = dest.parent() {
            self.fs
                .make_dirs(parent)
                .map_err(|err| CatalogError::from_write(err, parent))?;
        }

        let bytes = self
            .fs
            .copy_file(&origin, &dest)
            .map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => CatalogError::from_io(err, &origin),
                _ => CatalogError::from_write(err, &dest),
            })?;
        debug!(record_id, bytes, "File copied");

        self.store
            .set_target_path(record_id, Some(&path_to_string(&dest)))
            .await?;

        info!(
            record_id,
            origin = %origin.display(),
            dest = %dest.display(),
            "File converted"
        );
        Ok(outcome(false))
    }
}
