//! Catalog engines.
//!
//! Each engine borrows a [`CatalogStore`](crate::storage::CatalogStore) and,
//! where it touches disk, a [`FileSystem`](crate::storage::FileSystem). They
//! are cheap to build per command:
//!
//! ```rust,ignore
//! let stats = Reconciler::new(&db, &LocalFs).sync(&root).await?;
//! let copied = CopyEngine::new(&db, &LocalFs, &roots).convert(record_id).await?;
//! ```

mod clear;
mod convert;
mod editor;
mod error;
mod images;
mod paths;
mod query;
mod reconcile;
mod scanner;

#[cfg(test)]
mod testing;

pub use clear::{ClearEngine, ClearOutcome};
pub use convert::{ConvertOutcome, CopyEngine};
pub use editor::{RecordEdit, RecordEditor};
pub use error::{CatalogError, Result};
pub use images::{ImageAttacher, ResolvedImage};
pub use paths::{file_name_of, path_to_string, CatalogRoots};
pub use query::{CatalogStats, QueryService, RecordDetail};
pub use reconcile::{Reconciler, SyncStats, DEFAULT_SYNC_CONCURRENCY};
pub use scanner::scan_directory;
