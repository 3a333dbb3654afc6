//! Reconciler: bring the catalog in line with what is on disk.
//!
//! One pass does three things:
//! - walk the root and insert a record for every file the catalog has not seen
//! - re-check every previously cataloged origin path and store present/missing
//! - count what the catalog now holds
//!
//! Paths are compared as exact strings. `/data/A.txt` and `/data/a.txt` are
//! different files here even on case-insensitive filesystems.

use super::error::{CatalogError, Result};
use super::paths::{file_name_of, path_to_string};
use super::scanner::scan_directory;
use crate::storage::{CatalogStore, FileSystem};
use filedock_db::{NewFileRecord, RecordCount};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Default number of existence checks in flight during a sync.
pub const DEFAULT_SYNC_CONCURRENCY: usize = 8;

/// Summary of one sync pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStats {
    /// Files found under the root
    pub scanned: usize,
    /// Records created this pass
    pub inserted: u64,
    /// Records in the catalog afterwards
    pub total_records: i64,
    /// Records whose origin was missing at their last check
    pub missing: i64,
}

pub struct Reconciler<'a, S: ?Sized, F: ?Sized> {
    store: &'a S,
    fs: &'a F,
    concurrency: usize,
}

impl<'a, S, F> Reconciler<'a, S, F>
where
    S: CatalogStore + ?Sized,
    F: FileSystem + ?Sized,
{
    pub fn new(store: &'a S, fs: &'a F) -> Self {
        Self {
            store,
            fs,
            concurrency: DEFAULT_SYNC_CONCURRENCY,
        }
    }

    /// Bound the number of concurrent existence checks (minimum 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Reconcile the catalog against the files under `root`.
    ///
    /// A missing root fails with `DirectoryNotFound` before the store is
    /// touched. Any store failure after that aborts with `SyncFailed`; writes
    /// already applied are kept.
    pub async fn sync(&self, root: &Path) -> Result<SyncStats> {
        let start = Instant::now();
        info!(root = %root.display(), "Starting sync");

        let scanned = scan_directory(self.fs, root)?;
        let stats = self
            .apply(&scanned)
            .await
            .map_err(CatalogError::sync_failed)?;

        info!(
            scanned = stats.scanned,
            inserted = stats.inserted,
            total = stats.total_records,
            missing = stats.missing,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Sync complete"
        );
        Ok(stats)
    }

    async fn apply(&self, scanned: &[PathBuf]) -> Result<SyncStats> {
        let existing = self.store.list_origin_paths().await?;
        let known: HashSet<&str> = existing.iter().map(String::as_str).collect();

        let new_records: Vec<NewFileRecord> = scanned
            .iter()
            .map(|path| path_to_string(path))
            .filter(|path| !known.contains(path.as_str()))
            .map(|path| {
                let file_name = file_name_of(&path);
                NewFileRecord::new(path, file_name)
            })
            .collect();

        let inserted = self.store.insert_records(&new_records).await?;
        debug!(inserted, "New files cataloged");

        let missing_now = self.check_existing(&existing).await?;
        debug!(checked = existing.len(), missing = missing_now, "Existence checks done");

        let total_records = self.store.count_records(RecordCount::All).await?;
        let missing = self.store.count_records(RecordCount::Missing).await?;

        Ok(SyncStats {
            scanned: scanned.len(),
            inserted,
            total_records,
            missing,
        })
    }

    /// Check every origin path and store the result. All checks finish
    /// before this returns; the first failure aborts the rest.
    async fn check_existing(&self, origin_paths: &[String]) -> Result<usize> {
        let store = self.store;
        let fs = self.fs;

        let outcomes: Vec<bool> = stream::iter(origin_paths)
            .map(|origin| async move {
                let present = fs.exists(Path::new(origin));
                store.set_path_check(origin, present).await?;
                Ok::<bool, CatalogError>(present)
            })
            .buffer_unordered(self.concurrency)
            .try_collect()
            .await?;

        Ok(outcomes.iter().filter(|present| !**present).count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::{FailOn, FlakyStore};
    use crate::storage::LocalFs;
    use filedock_db::FiledockDb;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_empty_root_inserts_nothing() {
        let tmp = TempDir::new().unwrap();
        let db = FiledockDb::open_in_memory().await.unwrap();

        let stats = Reconciler::new(&db, &LocalFs).sync(tmp.path()).await.unwrap();

        assert_eq!(
            stats,
            SyncStats {
                scanned: 0,
                inserted: 0,
                total_records: 0,
                missing: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_single_file_then_resync() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("a.txt"), "alpha").unwrap();
        let db = FiledockDb::open_in_memory().await.unwrap();
        let reconciler = Reconciler::new(&db, &LocalFs);

        let first = reconciler.sync(&src).await.unwrap();
        assert_eq!(first.scanned, 1);
        assert_eq!(first.inserted, 1);
        assert_eq!(first.total_records, 1);

        let record = db.catalog_get_record(1).await.unwrap().unwrap();
        assert_eq!(record.origin_path, path_to_string(&src.join("a.txt")));
        assert_eq!(record.file_name, "a.txt");
        // Freshly inserted records are not checked in the pass that found them.
        assert_eq!(record.path_check, None);

        let second = reconciler.sync(&src).await.unwrap();
        assert_eq!(second.inserted, 0);
        assert_eq!(second.missing, 0);
        assert_eq!(second.total_records, 1);

        let record = db.catalog_get_record(1).await.unwrap().unwrap();
        assert_eq!(record.path_check, Some(true));
    }

    #[tokio::test]
    async fn test_deleted_file_is_marked_missing() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("nested")).unwrap();
        fs::write(tmp.path().join("keep.txt"), "k").unwrap();
        fs::write(tmp.path().join("nested/gone.txt"), "g").unwrap();
        let db = FiledockDb::open_in_memory().await.unwrap();
        let reconciler = Reconciler::new(&db, &LocalFs).with_concurrency(1);

        reconciler.sync(tmp.path()).await.unwrap();
        fs::remove_file(tmp.path().join("nested/gone.txt")).unwrap();
        fs::write(tmp.path().join("late.txt"), "l").unwrap();

        let stats = reconciler.sync(tmp.path()).await.unwrap();
        assert_eq!(stats.scanned, 2);
        assert_eq!(stats.inserted, 1);
        assert_eq!(stats.total_records, 3);
        assert_eq!(stats.missing, 1);

        let missing = db.catalog_count(RecordCount::Missing).await.unwrap();
        assert_eq!(missing, 1);
        let gone = path_to_string(&tmp.path().join("nested/gone.txt"));
        let records = db
            .catalog_list_records(&filedock_db::RecordFilter {
                missing_only: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(records[0].record.origin_path, gone);

        // Bringing the file back clears the flag on the next pass.
        fs::write(tmp.path().join("nested/gone.txt"), "g").unwrap();
        let stats = reconciler.sync(tmp.path()).await.unwrap();
        assert_eq!(stats.missing, 0);
        assert_eq!(stats.inserted, 0);
    }

    #[tokio::test]
    async fn test_missing_root_touches_nothing() {
        let tmp = TempDir::new().unwrap();
        let store = FlakyStore::new(FailOn::Nothing).await;

        let err = Reconciler::new(&store, &LocalFs)
            .sync(&tmp.path().join("absent"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "directory_not_found");
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_insert_failure_is_sync_failed() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.txt"), "a").unwrap();
        let store = FlakyStore::new(FailOn::Insert).await;

        let err = Reconciler::new(&store, &LocalFs)
            .sync(tmp.path())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "sync_failed");
        assert!(err.to_string().contains("injected"));
    }

    #[tokio::test]
    async fn test_path_check_failure_keeps_inserts() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.txt"), "a").unwrap();
        let store = FlakyStore::new(FailOn::Nothing).await;
        Reconciler::new(&store, &LocalFs).sync(tmp.path()).await.unwrap();

        fs::write(tmp.path().join("b.txt"), "b").unwrap();
        store.fail_on(FailOn::PathCheck);
        let err = Reconciler::new(&store, &LocalFs)
            .sync(tmp.path())
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::SyncFailed(_)));
        // No rollback: b.txt was inserted before the checks failed.
        assert_eq!(store.inner().catalog_count(RecordCount::All).await.unwrap(), 2);
    }
}
