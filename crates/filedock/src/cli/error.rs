//! Helpful error types for CLI commands
//!
//! Every error includes:
//! - What went wrong
//! - Context about the situation
//! - Suggestions for how to fix it

use filedock::catalog::CatalogError;
use filedock::config::ConfigError;
use std::fmt;
use std::path::Path;

/// An error with helpful context and suggestions
#[derive(Debug)]
pub struct HelpfulError {
    /// The main error message
    pub message: String,
    /// Additional context about what was happening
    pub context: Option<String>,
    /// Suggestions for how to fix the error
    pub suggestions: Vec<String>,
}

impl HelpfulError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestions(
        mut self,
        suggestions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.suggestions
            .extend(suggestions.into_iter().map(|s| s.into()));
        self
    }

    // === Common error constructors ===

    /// No source root on the command line, in the environment or in the config file
    pub fn missing_source_root(config_path: &Path) -> Self {
        Self::new("No source root configured")
            .with_context("This command needs to know which tree files are cataloged from")
            .with_suggestions([
                "TRY: Pass it directly: filedock --source-root /data/incoming <command>".to_string(),
                "TRY: Export FILEDOCK_SOURCE_ROOT=/data/incoming".to_string(),
                format!(
                    "TRY: Set source_root in {} (filedock config --write creates it)",
                    config_path.display()
                ),
            ])
    }

    /// No destination root anywhere
    pub fn missing_dest_root(config_path: &Path) -> Self {
        Self::new("No destination root configured")
            .with_context("convert copies files into the destination tree")
            .with_suggestions([
                "TRY: Pass it directly: filedock --dest-root /data/outgoing convert <ID>".to_string(),
                "TRY: Export FILEDOCK_DEST_ROOT=/data/outgoing".to_string(),
                format!("TRY: Set dest_root in {}", config_path.display()),
            ])
    }

    /// Config file exists but cannot be used
    pub fn bad_config(config_path: &Path, reason: &str) -> Self {
        Self::new(format!("Cannot load config: {}", config_path.display()))
            .with_context(reason.to_string())
            .with_suggestions([
                format!("TRY: Fix or remove the file: {}", config_path.display()),
                "TRY: Point elsewhere with --config or FILEDOCK_CONFIG".to_string(),
            ])
    }

    /// The catalog database could not be opened
    pub fn database_unavailable(db_path: &Path, reason: &str) -> Self {
        Self::new(format!("Cannot open catalog database: {}", db_path.display()))
            .with_context(reason.to_string())
            .with_suggestions([
                format!(
                    "TRY: Check that the directory is writable: ls -ld {}",
                    db_path
                        .parent()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| ".".to_string())
                ),
                "TRY: Use another database with --database or FILEDOCK_DATABASE".to_string(),
            ])
    }
}

impl fmt::Display for HelpfulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ERROR: {}", self.message)?;

        if let Some(ctx) = &self.context {
            writeln!(f, "CONTEXT: {}", ctx)?;
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            for suggestion in &self.suggestions {
                writeln!(f, "  {}", suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for HelpfulError {}

/// Stable code for an error reaching the top of a command.
pub fn error_kind(err: &anyhow::Error) -> &'static str {
    if let Some(err) = err.downcast_ref::<CatalogError>() {
        err.kind()
    } else if err.downcast_ref::<HelpfulError>().is_some() {
        "usage_error"
    } else if err.downcast_ref::<ConfigError>().is_some() {
        "config_error"
    } else {
        "internal_error"
    }
}

/// `{"error": {"kind": ..., "message": ...}}`
pub fn json_error(err: &anyhow::Error) -> serde_json::Value {
    let message = match err.downcast_ref::<HelpfulError>() {
        Some(helpful) => helpful.message.clone(),
        None => format!("{:#}", err),
    };
    serde_json::json!({
        "error": {
            "kind": error_kind(err),
            "message": message,
        }
    })
}

/// Print a command failure as JSON on stdout.
pub fn print_json_error(err: &anyhow::Error) {
    crate::cli::output::print_text(&json_error(err).to_string());
}
