//! Image attacher: images stored alongside a record.
//!
//! Attached images are decoded and re-encoded as PNG into the images
//! directory as `img{record_id}_{sort_order}.png`. The database keeps the
//! path relative to that directory so the directory can be moved.

use super::error::{CatalogError, Result};
use super::paths::path_to_string;
use crate::storage::{CatalogStore, FileSystem};
use filedock_db::ImageRecord;
use image::ImageFormat;
use serde::Serialize;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A stored image together with where it lives on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedImage {
    #[serde(flatten)]
    pub image: ImageRecord,
    pub absolute_path: String,
}

pub struct ImageAttacher<'a, S: ?Sized, F: ?Sized> {
    store: &'a S,
    fs: &'a F,
    images_dir: &'a Path,
}

impl<'a, S, F> ImageAttacher<'a, S, F>
where
    S: CatalogStore + ?Sized,
    F: FileSystem + ?Sized,
{
    pub fn new(store: &'a S, fs: &'a F, images_dir: &'a Path) -> Self {
        Self {
            store,
            fs,
            images_dir,
        }
    }

    /// Attach the image at `source` to a record as its next image.
    pub async fn attach(&self, record_id: i64, source: &Path) -> Result<ImageRecord> {
        self.require_record(record_id).await?;

        if !self.fs.exists(source) {
            return Err(CatalogError::ImageSourceMissing(path_to_string(source)));
        }
        let png = self.encode_png(source)?;

        let sort_order = self.store.reserve_image_slot(record_id).await?;
        let file_name = format!("img{record_id}_{sort_order}.png");
        let stored = self.images_dir.join(&file_name);

        self.fs
            .make_dirs(self.images_dir)
            .map_err(|err| CatalogError::from_write(err, self.images_dir))?;
        self.fs
            .write_file(&stored, &png)
            .map_err(|err| CatalogError::from_write(err, &stored))?;
        debug!(record_id, path = %stored.display(), bytes = png.len(), "Image written");

        let image = match self.store.insert_image(record_id, &file_name, sort_order).await {
            Ok(image) => image,
            Err(err) => {
                self.discard(&stored);
                return Err(err.into());
            }
        };
        self.store.touch_record(record_id).await?;

        info!(record_id, image_id = image.id, sort_order, "Image attached");
        Ok(image)
    }

    /// Images of a record, in sort order.
    pub async fn list(&self, record_id: i64) -> Result<Vec<ImageRecord>> {
        self.require_record(record_id).await?;
        Ok(self.store.list_images(record_id).await?)
    }

    /// Locate the stored file of an image.
    pub async fn resolve(&self, image_id: i64) -> Result<ResolvedImage> {
        let image = self
            .store
            .find_image(image_id)
            .await?
            .ok_or(CatalogError::ImageNotFound(image_id))?;

        let path = self.stored_path(&image);
        if !self.fs.exists(&path) {
            return Err(CatalogError::ImageFileMissing(path_to_string(&path)));
        }

        Ok(ResolvedImage {
            absolute_path: path_to_string(&path),
            image,
        })
    }

    /// Remove an image. The row always goes; the file is deleted best-effort.
    pub async fn detach(&self, image_id: i64) -> Result<ImageRecord> {
        let image = self
            .store
            .delete_image(image_id)
            .await?
            .ok_or(CatalogError::ImageNotFound(image_id))?;

        self.discard(&self.stored_path(&image));
        self.store.touch_record(image.record_id).await?;

        info!(record_id = image.record_id, image_id, "Image detached");
        Ok(image)
    }

    async fn require_record(&self, record_id: i64) -> Result<()> {
        match self.store.find_by_id(record_id).await? {
            Some(_) => Ok(()),
            None => Err(CatalogError::RecordNotFound(record_id)),
        }
    }

    fn encode_png(&self, source: &Path) -> Result<Vec<u8>> {
        let bytes = self
            .fs
            .read_file(source)
            .map_err(|err| CatalogError::from_io(err, source))?;

        let invalid = |err: image::ImageError| CatalogError::InvalidImage {
            path: path_to_string(source),
            reason: err.to_string(),
        };
        let decoded = image::load_from_memory(&bytes).map_err(invalid)?;

        let mut png = Vec::new();
        decoded
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(invalid)?;
        Ok(png)
    }

    fn stored_path(&self, image: &ImageRecord) -> PathBuf {
        self.images_dir.join(&image.image_path)
    }

    fn discard(&self, path: &Path) {
        if !self.fs.exists(path) {
            return;
        }
        if let Err(err) = self.fs.delete_file(path) {
            warn!(path = %path.display(), error = %err, "Failed to delete image file");
        }
    }
}
