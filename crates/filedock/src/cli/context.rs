//! Per-invocation command context: resolved configuration and the catalog.

use crate::cli::error::HelpfulError;
use filedock::catalog::CatalogRoots;
use filedock::config::{default_config_path, ConfigError, ConfigOverrides, FiledockConfig};
use filedock_db::FiledockDb;
use std::path::PathBuf;
use tracing::debug;

/// Settings shared by every command.
#[derive(Debug)]
pub struct CommandContext {
    pub config: FiledockConfig,
    pub config_path: PathBuf,
}

impl CommandContext {
    /// Resolve the config file and layer command-line overrides on top.
    pub fn load(config_path: Option<PathBuf>, overrides: ConfigOverrides) -> anyhow::Result<Self> {
        let config_path = config_path.unwrap_or_else(default_config_path);
        let mut config = match FiledockConfig::load_or_default(&config_path) {
            Ok(config) => config,
            Err(err @ (ConfigError::Parse { .. } | ConfigError::Read { .. })) => {
                return Err(HelpfulError::bad_config(&config_path, &err.to_string()).into());
            }
            Err(err) => return Err(err.into()),
        };
        config.apply(overrides);

        debug!(config = %config_path.display(), database = %config.database().display(), "Configuration resolved");
        Ok(Self {
            config,
            config_path,
        })
    }

    /// Open (creating if needed) the catalog database.
    pub async fn open_db(&self) -> anyhow::Result<FiledockDb> {
        let path = self.config.database();
        FiledockDb::open(&path).await.map_err(|err| {
            HelpfulError::database_unavailable(&path, &err.to_string()).into()
        })
    }

    pub fn source_root(&self) -> Result<PathBuf, HelpfulError> {
        self.config
            .source()
            .ok_or_else(|| HelpfulError::missing_source_root(&self.config_path))
    }

    /// Source and destination roots, made absolute against the working directory.
    pub fn roots(&self) -> anyhow::Result<CatalogRoots> {
        let source = self.source_root()?;
        let dest = self
            .config
            .dest()
            .ok_or_else(|| HelpfulError::missing_dest_root(&self.config_path))?;
        Ok(CatalogRoots::resolve(&source, &dest)?)
    }
}
