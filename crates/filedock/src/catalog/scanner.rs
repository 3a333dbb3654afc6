//! Directory scanner: the flat list of files under a root.

use super::error::{CatalogError, Result};
use super::paths::{absolute_path, path_to_string};
use crate::storage::FileSystem;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// List every regular file below `root` as an absolute path.
///
/// A relative `root` is resolved against the current directory. No ordering
/// is guaranteed and directories are not included. Nothing is written.
pub fn scan_directory<F: FileSystem + ?Sized>(fs: &F, root: &Path) -> Result<Vec<PathBuf>> {
    let root = absolute_path(root)?;

    if !fs.is_dir(&root) {
        return Err(CatalogError::DirectoryNotFound(path_to_string(&root)));
    }

    let files = fs.list_dir_recursive(&root).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => CatalogError::DirectoryNotFound(path_to_string(&root)),
        _ => CatalogError::Io {
            path: path_to_string(&root),
            source,
        },
    })?;

    debug!(root = %root.display(), files = files.len(), "Directory scanned");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalFs;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_root_is_directory_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = scan_directory(&LocalFs, &tmp.path().join("absent")).unwrap_err();
        assert_eq!(err.kind(), "directory_not_found");
    }

    #[test]
    fn test_file_root_is_directory_not_found() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("plain.txt");
        fs::write(&file, "x").unwrap();

        let err = scan_directory(&LocalFs, &file).unwrap_err();
        assert!(matches!(err, CatalogError::DirectoryNotFound(_)));
    }

    #[test]
    fn test_empty_root_yields_nothing() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("only/dirs")).unwrap();

        let files = scan_directory(&LocalFs, tmp.path()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_paths_are_absolute() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("sub/a.txt"), "a").unwrap();

        let files = scan_directory(&LocalFs, tmp.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].is_absolute());
        assert!(files[0].ends_with("sub/a.txt"));
    }
}
