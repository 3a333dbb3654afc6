//! Path helpers shared by the engines.

use super::error::{CatalogError, Result};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

/// The two trees files are copied between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRoots {
    pub source_root: PathBuf,
    pub dest_root: PathBuf,
}

impl CatalogRoots {
    pub fn new(source_root: impl Into<PathBuf>, dest_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            dest_root: dest_root.into(),
        }
    }

    /// Build roots from configured paths, resolving relative ones against the
    /// current directory the same way [`scan_directory`](super::scan_directory)
    /// resolves its root. Cataloged origin paths are absolute, so relative
    /// roots would never match them.
    pub fn resolve(source_root: &Path, dest_root: &Path) -> Result<Self> {
        Ok(Self::new(
            absolute_path(source_root)?,
            absolute_path(dest_root)?,
        ))
    }

    /// Map a file under the source root to the same relative location under
    /// the destination root.
    ///
    /// Matching is by whole path components, so `/src2/a` is not under `/src`.
    pub fn map_to_destination(&self, origin: &Path) -> Result<PathBuf> {
        let outside = || CatalogError::OutsideSourceRoot {
            path: path_to_string(origin),
            root: path_to_string(&self.source_root),
        };

        let relative = origin.strip_prefix(&self.source_root).map_err(|_| outside())?;
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if relative.as_os_str().is_empty() || escapes {
            return Err(outside());
        }

        Ok(self.dest_root.join(relative))
    }
}

/// `path` made absolute against the current directory, without touching disk.
pub(crate) fn absolute_path(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|source| CatalogError::Io {
        path: path_to_string(path),
        source,
    })
}

/// Catalog paths are stored as strings; non-UTF-8 bytes are replaced.
pub fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Base name of a cataloged path, falling back to the whole path.
pub fn file_name_of(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}
