//! Storage seams for the catalog engines.
//!
//! The engines in [`crate::catalog`] only talk to the database through
//! [`CatalogStore`] and to the disk through [`FileSystem`], so tests can swap
//! either for a fake.

use async_trait::async_trait;
use filedock_db::{
    FieldsUpdate, FileRecord, ImageRecord, NewFileRecord, RecordCount, RecordFilter,
    RecordSummary, Result,
};
use std::io;
use std::path::{Path, PathBuf};

/// Catalog persistence used by the engines.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Insert newly discovered files, returning how many rows were written.
    async fn insert_records(&self, records: &[NewFileRecord]) -> Result<u64>;

    /// Every origin path currently cataloged.
    async fn list_origin_paths(&self) -> Result<Vec<String>>;

    /// Look up a record. `None` if no row has this ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<FileRecord>>;

    /// Store the outcome of an existence check and refresh `updated_at`.
    async fn set_path_check(&self, origin_path: &str, present: bool) -> Result<()>;

    /// Set or clear the destination copy and refresh `updated_at`.
    async fn set_target_path(&self, id: i64, target_path: Option<&str>) -> Result<()>;

    /// Apply descriptive field changes and refresh `updated_at`.
    async fn update_fields(&self, id: i64, update: &FieldsUpdate) -> Result<()>;

    /// Refresh `updated_at` only.
    async fn touch_record(&self, id: i64) -> Result<()>;

    async fn count_records(&self, which: RecordCount) -> Result<i64>;

    async fn list_records(&self, filter: &RecordFilter) -> Result<Vec<RecordSummary>>;

    /// Hand out the next image sort order for a record. Never repeats.
    async fn reserve_image_slot(&self, record_id: i64) -> Result<i64>;

    async fn insert_image(
        &self,
        record_id: i64,
        image_path: &str,
        sort_order: i64,
    ) -> Result<ImageRecord>;

    /// Images of a record, ordered by sort order.
    async fn list_images(&self, record_id: i64) -> Result<Vec<ImageRecord>>;

    async fn find_image(&self, image_id: i64) -> Result<Option<ImageRecord>>;

    /// Remove an image row, returning it if it existed.
    async fn delete_image(&self, image_id: i64) -> Result<Option<ImageRecord>>;

    async fn count_images(&self) -> Result<i64>;
}

/// Filesystem operations used by the engines.
pub trait FileSystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Every regular file below `root`, recursively. Directories are not listed.
    fn list_dir_recursive(&self, root: &Path) -> io::Result<Vec<PathBuf>>;

    /// Copy `src` to `dst` byte for byte, returning the number of bytes copied.
    fn copy_file(&self, src: &Path, dst: &Path) -> io::Result<u64>;

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Create or truncate `path` and write `contents` to it.
    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    fn delete_file(&self, path: &Path) -> io::Result<()>;

    /// Create `path` and any missing parents.
    fn make_dirs(&self, path: &Path) -> io::Result<()>;
}
