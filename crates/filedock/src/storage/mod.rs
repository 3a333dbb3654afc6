//! Storage abstractions for filedock.
//!
//! The catalog engines are written against these traits; the SQLite catalog
//! and the local disk are the production implementations.

mod local_fs;
mod sqlite;
mod traits;

pub use local_fs::LocalFs;
pub use traits::{CatalogStore, FileSystem};
