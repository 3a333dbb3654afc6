//! [`FileSystem`] over the local disk.

use super::traits::FileSystem;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileSystem for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_dir_recursive(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    // The root itself failing is fatal; anything deeper is skipped.
                    if err.depth() == 0 {
                        return Err(err
                            .into_io_error()
                            .unwrap_or_else(|| io::Error::other("failed to read scan root")));
                    }
                    warn!(error = %err, "Skipping unreadable entry during scan");
                    continue;
                }
            };

            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    fn copy_file(&self, src: &Path, dst: &Path) -> io::Result<u64> {
        fs::copy(src, dst)
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn delete_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn make_dirs(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }
}
