//! filedock command-line tool
//!
//! Catalogs the files under a source tree in a SQLite database, copies them
//! to a mirrored destination tree on request, and keeps descriptive fields
//! and images per file.

use anyhow::Result;
use clap::{Parser, Subcommand};
use filedock::catalog::RecordEdit;
use filedock::config::ConfigOverrides;
use filedock_db::RecordFilter;
use filedock_logging::{init_logging, LogConfig};
use std::path::PathBuf;
use std::process::ExitCode;

mod cli;

use cli::CommandContext;

#[derive(Parser, Debug)]
#[command(
    name = "filedock",
    version,
    about = "Catalog files, copy them between trees, attach images"
)]
struct Cli {
    /// Enable verbose logging (info/debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Config file (default: <home>/config.toml)
    #[arg(long, global = true, env = "FILEDOCK_CONFIG")]
    config: Option<PathBuf>,

    /// Tree that files are cataloged from
    #[arg(long, global = true, env = "FILEDOCK_SOURCE_ROOT")]
    source_root: Option<PathBuf>,

    /// Tree that convert copies into
    #[arg(long, global = true, env = "FILEDOCK_DEST_ROOT")]
    dest_root: Option<PathBuf>,

    /// Catalog database file
    #[arg(long, global = true, env = "FILEDOCK_DATABASE")]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Catalog new files under ROOT and re-check the ones already known
    Sync {
        /// Directory to reconcile (default: the configured source root)
        root: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List cataloged files
    List {
        /// Name contains (case-insensitive)
        #[arg(long)]
        name: Option<String>,

        /// Class contains
        #[arg(long)]
        class: Option<String>,

        /// Prompt contains
        #[arg(long)]
        prompt: Option<String>,

        /// File name contains
        #[arg(long)]
        file_name: Option<String>,

        /// Only files missing at the last sync
        #[arg(long)]
        missing: bool,

        /// Only files with a destination copy
        #[arg(long, conflicts_with = "unconverted")]
        converted: bool,

        /// Only files without a destination copy
        #[arg(long)]
        unconverted: bool,

        /// Maximum number of records
        #[arg(short = 'n', long)]
        limit: Option<i64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one record with its images
    Show {
        /// Record ID
        id: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Catalog statistics
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Copy a record's file into the destination tree
    Convert {
        /// Record ID
        id: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a record's destination copy and forget it
    Clear {
        /// Record ID
        id: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change name, class or prompt of a record (an empty value clears it)
    Edit {
        /// Record ID
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        class: Option<String>,

        #[arg(long)]
        prompt: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage images attached to records
    Image {
        #[command(subcommand)]
        action: cli::image::ImageAction,
    },

    /// Show resolved configuration
    Config {
        /// Write the resolved configuration to the config file
        #[arg(long)]
        write: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn command_wants_json(command: &Commands) -> bool {
    match command {
        Commands::Sync { json, .. }
        | Commands::List { json, .. }
        | Commands::Show { json, .. }
        | Commands::Stats { json }
        | Commands::Convert { json, .. }
        | Commands::Clear { json, .. }
        | Commands::Edit { json, .. }
        | Commands::Config { json, .. } => *json,
        Commands::Image { action } => action.wants_json(),
    }
}

async fn run_command(cli: Cli) -> Result<()> {
    let ctx = CommandContext::load(
        cli.config,
        ConfigOverrides {
            database_path: cli.database,
            source_root: cli.source_root,
            dest_root: cli.dest_root,
        },
    )?;

    match cli.command {
        Commands::Sync { root, json } => {
            cli::sync::run(&ctx, cli::sync::SyncArgs { root, json }).await
        }

        Commands::List {
            name,
            class,
            prompt,
            file_name,
            missing,
            converted,
            unconverted,
            limit,
            json,
        } => {
            let converted = match (converted, unconverted) {
                (true, _) => Some(true),
                (false, true) => Some(false),
                (false, false) => None,
            };
            let filter = RecordFilter {
                name,
                class,
                prompt,
                file_name,
                missing_only: missing,
                converted,
                limit,
            };
            cli::records::run_list(&ctx, cli::records::ListArgs { filter, json }).await
        }

        Commands::Show { id, json } => {
            cli::records::run_show(&ctx, cli::records::ShowArgs { id, json }).await
        }

        Commands::Stats { json } => {
            cli::records::run_stats(&ctx, cli::records::StatsArgs { json }).await
        }

        Commands::Convert { id, json } => {
            cli::convert::run_convert(&ctx, cli::convert::ConvertArgs { id, json }).await
        }

        Commands::Clear { id, json } => {
            cli::convert::run_clear(&ctx, cli::convert::ClearArgs { id, json }).await
        }

        Commands::Edit {
            id,
            name,
            class,
            prompt,
            json,
        } => {
            let edit = RecordEdit {
                name,
                class,
                prompt,
            };
            cli::records::run_edit(&ctx, cli::records::EditArgs { id, edit, json }).await
        }

        Commands::Image { action } => cli::image::run(&ctx, action).await,

        Commands::Config { write, json } => {
            cli::config::run(&ctx, cli::config::ConfigArgs { write, json })
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json_mode = command_wants_json(&cli.command);

    if let Err(err) = init_logging(LogConfig {
        app_name: "filedock",
        verbose: cli.verbose,
    }) {
        eprintln!("Warning: logging disabled: {:#}", err);
    }

    let result = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(anyhow::Error::from)
        .and_then(|runtime| runtime.block_on(run_command(cli)));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if json_mode {
                cli::error::print_json_error(&err);
            } else {
                eprintln!("{:?}", err);
            }
            ExitCode::from(1)
        }
    }
}
