//! Clear engine: drop a record's destination copy.
//!
//! Two phases: the file at `target_path` is deleted best-effort, then the
//! record is cleared unconditionally. If the delete fails the file is left
//! orphaned in the destination tree and only a warning is logged.

use super::error::{CatalogError, Result};
use crate::storage::{CatalogStore, FileSystem};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// Result of a `clear`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearOutcome {
    /// The record had no destination copy recorded.
    pub already_cleared: bool,
    /// The path that was cleared.
    pub target_path: Option<String>,
    /// Whether a file was actually deleted.
    pub file_removed: bool,
}

pub struct ClearEngine<'a, S: ?Sized, F: ?Sized> {
    store: &'a S,
    fs: &'a F,
}

impl<'a, S, F> ClearEngine<'a, S, F>
where
    S: CatalogStore + ?Sized,
    F: FileSystem + ?Sized,
{
    pub fn new(store: &'a S, fs: &'a F) -> Self {
        Self { store, fs }
    }

    pub async fn clear(&self, record_id: i64) -> Result<ClearOutcome> {
        let record = self
            .store
            .find_by_id(record_id)
            .await?
            .ok_or(CatalogError::RecordNotFound(record_id))?;

        let Some(target_path) = record.target_path else {
            return Ok(ClearOutcome {
                already_cleared: true,
                target_path: None,
                file_removed: false,
            });
        };

        let file_removed = self.remove_copy(record_id, Path::new(&target_path));
        self.store.set_target_path(record_id, None).await?;

        info!(record_id, target = %target_path, file_removed, "Destination copy cleared");
        Ok(ClearOutcome {
            already_cleared: false,
            target_path: Some(target_path),
            file_removed,
        })
    }

    fn remove_copy(&self, record_id: i64, target: &Path) -> bool {
        if !self.fs.exists(target) {
            return false;
        }
        match self.fs.delete_file(target) {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    record_id,
                    target = %target.display(),
                    error = %err,
                    "Failed to delete destination copy; clearing the record anyway"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::convert::CopyEngine;
    use crate::catalog::paths::CatalogRoots;
    use crate::catalog::testing::seed_record;
    use crate::storage::LocalFs;
    use filedock_db::FiledockDb;
    use std::fs;
    use std::io;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Deletes always fail.
    struct StuckFiles;

    impl FileSystem for StuckFiles {
        fn exists(&self, path: &Path) -> bool {
            LocalFs.exists(path)
        }

        fn is_dir(&self, path: &Path) -> bool {
            LocalFs.is_dir(path)
        }

        fn list_dir_recursive(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
            LocalFs.list_dir_recursive(root)
        }

        fn copy_file(&self, src: &Path, dst: &Path) -> io::Result<u64> {
            LocalFs.copy_file(src, dst)
        }

        fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
            LocalFs.read_file(path)
        }

        fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
            LocalFs.write_file(path, contents)
        }

        fn delete_file(&self, _path: &Path) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::PermissionDenied))
        }

        fn make_dirs(&self, path: &Path) -> io::Result<()> {
            LocalFs.make_dirs(path)
        }
    }

    async fn converted_record(tmp: &TempDir, db: &FiledockDb) -> (i64, PathBuf) {
        let roots = CatalogRoots::new(tmp.path().join("src"), tmp.path().join("dst"));
        fs::create_dir_all(&roots.source_root).unwrap();
        fs::write(roots.source_root.join("a.txt"), "alpha").unwrap();
        let id = seed_record(db, &roots.source_root.join("a.txt")).await;

        let outcome = CopyEngine::new(db, &LocalFs, &roots).convert(id).await.unwrap();
        (id, PathBuf::from(outcome.dest_path))
    }

    #[tokio::test]
    async fn test_clear_without_target_is_noop() {
        let tmp = TempDir::new().unwrap();
        let db = FiledockDb::open_in_memory().await.unwrap();
        let id = seed_record(&db, &tmp.path().join("a.txt")).await;
        let before = db.catalog_get_record(id).await.unwrap().unwrap();

        let outcome = ClearEngine::new(&db, &LocalFs).clear(id).await.unwrap();

        assert!(outcome.already_cleared);
        assert_eq!(outcome.target_path, None);
        let after = db.catalog_get_record(id).await.unwrap().unwrap();
        assert_eq!(before.updated_at, after.updated_at);
    }

    #[tokio::test]
    async fn test_convert_then_clear_removes_copy() {
        let tmp = TempDir::new().unwrap();
        let db = FiledockDb::open_in_memory().await.unwrap();
        let (id, dest) = converted_record(&tmp, &db).await;
        assert!(dest.exists());

        let outcome = ClearEngine::new(&db, &LocalFs).clear(id).await.unwrap();

        assert!(!outcome.already_cleared);
        assert!(outcome.file_removed);
        assert!(!dest.exists());
        let record = db.catalog_get_record(id).await.unwrap().unwrap();
        assert_eq!(record.target_path, None);
    }

    #[tokio::test]
    async fn test_clear_with_copy_already_gone() {
        let tmp = TempDir::new().unwrap();
        let db = FiledockDb::open_in_memory().await.unwrap();
        let (id, dest) = converted_record(&tmp, &db).await;
        fs::remove_file(&dest).unwrap();

        let outcome = ClearEngine::new(&db, &LocalFs).clear(id).await.unwrap();

        assert!(!outcome.already_cleared);
        assert!(!outcome.file_removed);
        let record = db.catalog_get_record(id).await.unwrap().unwrap();
        assert_eq!(record.target_path, None);
    }

    #[tokio::test]
    async fn test_delete_failure_still_clears_record() {
        let tmp = TempDir::new().unwrap();
        let db = FiledockDb::open_in_memory().await.unwrap();
        let (id, dest) = converted_record(&tmp, &db).await;

        let outcome = ClearEngine::new(&db, &StuckFiles).clear(id).await.unwrap();

        assert!(!outcome.file_removed);
        assert!(dest.exists());
        let record = db.catalog_get_record(id).await.unwrap().unwrap();
        assert_eq!(record.target_path, None);
    }

    #[tokio::test]
    async fn test_unknown_record() {
        let db = FiledockDb::open_in_memory().await.unwrap();
        let err = ClearEngine::new(&db, &LocalFs).clear(9).await.unwrap_err();
        assert_eq!(err.kind(), "record_not_found");
    }
}
