//! `filedock sync`: reconcile the catalog with a directory tree.

use crate::cli::context::CommandContext;
use crate::cli::output::{outln, print_fields, print_json};
use filedock::catalog::Reconciler;
use filedock::storage::LocalFs;
use std::path::PathBuf;

#[derive(Debug)]
pub struct SyncArgs {
    pub root: Option<PathBuf>,
    pub json: bool,
}

pub async fn run(ctx: &CommandContext, args: SyncArgs) -> anyhow::Result<()> {
    let root = match args.root {
        Some(root) => root,
        None => ctx.source_root()?,
    };
    let db = ctx.open_db().await?;

    let stats = Reconciler::new(&db, &LocalFs)
        .with_concurrency(ctx.config.sync_concurrency)
        .sync(&root)
        .await?;

    if args.json {
        return print_json(&stats);
    }

    print_fields(vec![
        ("Root", root.display().to_string()),
        ("Files scanned", stats.scanned.to_string()),
        ("New records", stats.inserted.to_string()),
        ("Total records", stats.total_records.to_string()),
        ("Missing on disk", stats.missing.to_string()),
    ]);
    if stats.missing > 0 {
        outln!("\nList them with: filedock list --missing");
    }
    Ok(())
}
