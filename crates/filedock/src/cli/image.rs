//! `filedock image ...`: images attached to records.

use crate::cli::context::CommandContext;
use crate::cli::output::{format_time, outln, print_json, print_table};
use clap::Subcommand;
use filedock::catalog::ImageAttacher;
use filedock::storage::LocalFs;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum ImageAction {
    /// Attach an image file to a record (stored as PNG)
    Attach {
        /// Record ID
        id: i64,
        /// Image file to attach
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// List the images of a record
    List {
        /// Record ID
        id: i64,
        #[arg(long)]
        json: bool,
    },
    /// Print the stored path of an image
    Path {
        /// Image ID
        image_id: i64,
        #[arg(long)]
        json: bool,
    },
    /// Remove an image from its record
    Remove {
        /// Image ID
        image_id: i64,
        #[arg(long)]
        json: bool,
    },
}

impl ImageAction {
    pub fn wants_json(&self) -> bool {
        match self {
            Self::Attach { json, .. }
            | Self::List { json, .. }
            | Self::Path { json, .. }
            | Self::Remove { json, .. } => *json,
        }
    }
}

pub async fn run(ctx: &CommandContext, action: ImageAction) -> anyhow::Result<()> {
    let db = ctx.open_db().await?;
    let images_dir = ctx.config.images();
    let attacher = ImageAttacher::new(&db, &LocalFs, &images_dir);

    match action {
        ImageAction::Attach { id, file, json } => {
            let image = attacher.attach(id, &file).await?;
            if json {
                return print_json(&image);
            }
            outln!(
                "Attached image {} to record {} as {}",
                image.id,
                id,
                images_dir.join(&image.image_path).display()
            );
        }
        ImageAction::List { id, json } => {
            let images = attacher.list(id).await?;
            if json {
                return print_json(&images);
            }
            if images.is_empty() {
                outln!("Record {} has no images.", id);
                return Ok(());
            }
            let rows = images
                .iter()
                .map(|image| {
                    vec![
                        image.id.to_string(),
                        image.sort_order.to_string(),
                        image.image_path.clone(),
                        format_time(image.created_at),
                    ]
                })
                .collect();
            print_table(&["Image ID", "Order", "File", "Attached"], rows);
        }
        ImageAction::Path { image_id, json } => {
            let resolved = attacher.resolve(image_id).await?;
            if json {
                return print_json(&resolved);
            }
            outln!("{}", resolved.absolute_path);
        }
        ImageAction::Remove { image_id, json } => {
            let image = attacher.detach(image_id).await?;
            if json {
                return print_json(&image);
            }
            outln!("Removed image {} from record {}", image.id, image.record_id);
        }
    }
    Ok(())
}
