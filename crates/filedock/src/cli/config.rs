//! `filedock config`: show the resolved configuration.

use crate::cli::context::CommandContext;
use crate::cli::output::{outln, print_fields, print_json};
use filedock_logging::{filedock_home, logs_dir};
use std::path::Path;

#[derive(Debug)]
pub struct ConfigArgs {
    /// Save the resolved configuration to the config file
    pub write: bool,
    pub json: bool,
}

pub fn run(ctx: &CommandContext, args: ConfigArgs) -> anyhow::Result<()> {
    if args.write {
        ctx.config.save(&ctx.config_path)?;
    }

    let database = ctx.config.database();
    let images = ctx.config.images();
    let source = ctx.config.source();
    let dest = ctx.config.dest();

    if args.json {
        let value = serde_json::json!({
            "home": filedock_home().to_string_lossy(),
            "config_file": {
                "path": ctx.config_path.to_string_lossy(),
                "exists": ctx.config_path.exists(),
                "written": args.write,
            },
            "database": {
                "path": database.to_string_lossy(),
                "exists": database.exists(),
            },
            "source_root": source.as_deref().map(Path::to_string_lossy),
            "dest_root": dest.as_deref().map(Path::to_string_lossy),
            "images_dir": images.to_string_lossy(),
            "logs_dir": logs_dir().to_string_lossy(),
            "sync_concurrency": ctx.config.sync_concurrency,
        });
        return print_json(&value);
    }

    let unset = || "(not set)".to_string();
    print_fields(vec![
        ("Home", filedock_home().display().to_string()),
        ("Config file", describe(&ctx.config_path)),
        ("Database", describe(&database)),
        (
            "Source root",
            source.map(|p| p.display().to_string()).unwrap_or_else(unset),
        ),
        (
            "Destination root",
            dest.map(|p| p.display().to_string()).unwrap_or_else(unset),
        ),
        ("Images", images.display().to_string()),
        ("Logs", logs_dir().display().to_string()),
        ("Sync concurrency", ctx.config.sync_concurrency.to_string()),
    ]);
    if args.write {
        outln!("Wrote {}", ctx.config_path.display());
    }
    Ok(())
}

fn describe(path: &Path) -> String {
    let state = if path.exists() { "" } else { " (missing)" };
    format!("{}{}", path.display(), state)
}
