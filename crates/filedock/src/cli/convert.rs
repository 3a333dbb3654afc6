//! `filedock convert` and `filedock clear`.

use crate::cli::context::CommandContext;
use crate::cli::output::{outln, print_json};
use filedock::catalog::{ClearEngine, CopyEngine};
use filedock::storage::LocalFs;

#[derive(Debug)]
pub struct ConvertArgs {
    pub id: i64,
    pub json: bool,
}

pub async fn run_convert(ctx: &CommandContext, args: ConvertArgs) -> anyhow::Result<()> {
    let roots = ctx.roots()?;
    let db = ctx.open_db().await?;
    let outcome = CopyEngine::new(&db, &LocalFs, &roots)
        .convert(args.id)
        .await?;

    if args.json {
        return print_json(&outcome);
    }

    if outcome.already_exists {
        outln!(
            "{} already exists at {}; nothing copied",
            outcome.file_name, outcome.dest_path
        );
    } else {
        outln!("Copied {} -> {}", outcome.origin_path, outcome.dest_path);
    }
    Ok(())
}

#[derive(Debug)]
pub struct ClearArgs {
    pub id: i64,
    pub json: bool,
}

pub async fn run_clear(ctx: &CommandContext, args: ClearArgs) -> anyhow::Result<()> {
    let db = ctx.open_db().await?;
    let outcome = ClearEngine::new(&db, &LocalFs).clear(args.id).await?;

    if args.json {
        return print_json(&outcome);
    }

    match (&outcome.target_path, outcome.file_removed) {
        (None, _) => outln!("Record {} has no destination copy", args.id),
        (Some(target), true) => outln!("Removed {} and cleared record {}", target, args.id),
        (Some(target), false) => outln!(
            "Cleared record {}; {} was not deleted (see log)",
            args.id, target
        ),
    }
    Ok(())
}
