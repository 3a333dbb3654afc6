//! Configuration for filedock
//!
//! Read from `<home>/config.toml`, where home is `FILEDOCK_HOME` or
//! `~/.filedock`. A missing file means defaults. Command-line flags are
//! layered on top with [`FiledockConfig::apply`].

use crate::catalog::DEFAULT_SYNC_CONCURRENCY;
use filedock_logging::filedock_home;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Main configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiledockConfig {
    /// Path to the SQLite catalog
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Tree that files are cataloged from and copied out of
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,

    /// Tree that `convert` copies into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_root: Option<String>,

    /// Where attached images are stored
    #[serde(default = "default_images_dir")]
    pub images_dir: String,

    /// Existence checks in flight during a sync
    #[serde(default = "default_sync_concurrency")]
    pub sync_concurrency: usize,
}

fn default_database_path() -> String {
    filedock_home()
        .join("filedock.sqlite3")
        .to_string_lossy()
        .into_owned()
}

fn default_images_dir() -> String {
    filedock_home().join("images").to_string_lossy().into_owned()
}

fn default_sync_concurrency() -> usize {
    DEFAULT_SYNC_CONCURRENCY
}

impl Default for FiledockConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            source_root: None,
            dest_root: None,
            images_dir: default_images_dir(),
            sync_concurrency: default_sync_concurrency(),
        }
    }
}

/// Values given on the command line (or through `FILEDOCK_*` variables).
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub database_path: Option<PathBuf>,
    pub source_root: Option<PathBuf>,
    pub dest_root: Option<PathBuf>,
}

/// `<home>/config.toml`
pub fn default_config_path() -> PathBuf {
    filedock_home().join("config.toml")
}

impl FiledockConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load from `path`, or defaults if the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file, creating its directory.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        let write_error = |source| ConfigError::Write {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(write_error)?;
            }
        }
        std::fs::write(path, content).map_err(write_error)
    }

    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(path) = overrides.database_path {
            self.database_path = path.to_string_lossy().into_owned();
        }
        if let Some(root) = overrides.source_root {
            self.source_root = Some(root.to_string_lossy().into_owned());
        }
        if let Some(root) = overrides.dest_root {
            self.dest_root = Some(root.to_string_lossy().into_owned());
        }
    }

    pub fn database(&self) -> PathBuf {
        expand_home(&self.database_path)
    }

    pub fn images(&self) -> PathBuf {
        expand_home(&self.images_dir)
    }

    pub fn source(&self) -> Option<PathBuf> {
        self.source_root.as_deref().map(expand_home)
    }

    pub fn dest(&self) -> Option<PathBuf> {
        self.dest_root.as_deref().map(expand_home)
    }
}

/// Expand a leading `~/` to the user's home directory.
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = FiledockConfig::default();
        assert!(config.database_path.ends_with("filedock.sqlite3"));
        assert!(config.images_dir.ends_with("images"));
        assert_eq!(config.sync_concurrency, 8);
        assert!(config.source().is_none());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: FiledockConfig = toml::from_str(
            r#"
            source_root = "/data/incoming"
            sync_concurrency = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.source(), Some(PathBuf::from("/data/incoming")));
        assert_eq!(config.dest(), None);
        assert_eq!(config.sync_concurrency, 2);
        assert_eq!(config.images_dir, default_images_dir());
    }

    #[test]
    fn test_save_then_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/config.toml");
        let config = FiledockConfig {
            database_path: "/var/lib/filedock/catalog.sqlite3".to_string(),
            source_root: Some("/data/in".to_string()),
            dest_root: Some("/data/out".to_string()),
            images_dir: "/var/lib/filedock/images".to_string(),
            sync_concurrency: 16,
        };

        config.save(&path).unwrap();
        assert_eq!(FiledockConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_default_but_bad_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("config.toml");
        assert_eq!(
            FiledockConfig::load_or_default(&missing).unwrap(),
            FiledockConfig::default()
        );

        std::fs::write(&missing, "sync_concurrency = \"many\"").unwrap();
        let err = FiledockConfig::load_or_default(&missing).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_overrides_win() {
        let mut config = FiledockConfig {
            source_root: Some("/from/file".to_string()),
            ..Default::default()
        };
        config.apply(ConfigOverrides {
            source_root: Some(PathBuf::from("/from/flag")),
            dest_root: Some(PathBuf::from("/out")),
            database_path: None,
        });

        assert_eq!(config.source(), Some(PathBuf::from("/from/flag")));
        assert_eq!(config.dest(), Some(PathBuf::from("/out")));
        assert!(config.database_path.ends_with("filedock.sqlite3"));
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/abs/path"), PathBuf::from("/abs/path"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/x.db"), home.join("x.db"));
        }
    }
}
