//! Error types for the catalog engines

use filedock_db::DbError;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Catalog error type
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("File record not found: {0}")]
    RecordNotFound(i64),

    #[error("Image not found: {0}")]
    ImageNotFound(i64),

    #[error("Image file is missing from disk: {0}")]
    ImageFileMissing(String),

    #[error("Image to attach does not exist: {0}")]
    ImageSourceMissing(String),

    #[error("Not a readable image: {path}: {reason}")]
    InvalidImage { path: String, reason: String },

    #[error("Path '{path}' is outside the source root '{root}'")]
    OutsideSourceRoot { path: String, root: String },

    #[error("Source file does not exist: {0}")]
    SourceMissing(String),

    #[error("Permission denied: {path}")]
    PermissionDenied {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Not enough disk space to write {path}")]
    DiskFull {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Nothing to edit: give at least one of name, class or prompt")]
    EmptyEdit,

    #[error("Sync failed: {0}")]
    SyncFailed(#[source] Box<CatalogError>),

    #[error("Store error: {0}")]
    Store(#[from] DbError),

    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl CatalogError {
    /// Stable machine-readable code for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DirectoryNotFound(_) => "directory_not_found",
            Self::RecordNotFound(_) => "record_not_found",
            Self::ImageNotFound(_) => "image_not_found",
            Self::ImageFileMissing(_) => "image_file_missing",
            Self::ImageSourceMissing(_) => "image_source_missing",
            Self::InvalidImage { .. } => "invalid_image",
            Self::OutsideSourceRoot { .. } => "outside_source_root",
            Self::SourceMissing(_) => "source_missing",
            Self::PermissionDenied { .. } => "permission_denied",
            Self::DiskFull { .. } => "disk_full",
            Self::EmptyEdit => "empty_edit",
            Self::SyncFailed(_) => "sync_failed",
            Self::Store(_) => "store_failure",
            Self::Io { .. } => "io_failure",
        }
    }

    /// Wrap a failure that happened after the scan, while applying changes.
    pub(crate) fn sync_failed(err: CatalogError) -> Self {
        match err {
            already @ Self::SyncFailed(_) => already,
            other => Self::SyncFailed(Box::new(other)),
        }
    }

    /// Classify an I/O failure on `path`.
    ///
    /// `NotFound` means the file being read is gone; callers pass the source path.
    pub(crate) fn from_io(err: io::Error, path: &Path) -> Self {
        let path = path.display().to_string();
        match err.kind() {
            io::ErrorKind::NotFound => Self::SourceMissing(path),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path, source: err },
            io::ErrorKind::StorageFull => Self::DiskFull { path, source: err },
            _ => Self::Io { path, source: err },
        }
    }

    /// Classify a failed write to `path`. A missing path here is never a
    /// missing source.
    pub(crate) fn from_write(err: io::Error, path: &Path) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::Io {
                path: path.display().to_string(),
                source: err,
            },
            _ => Self::from_io(err, path),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CatalogError>;
