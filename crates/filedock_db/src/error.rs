//! Error types for the catalog store.

use thiserror::Error;

/// Database operation result type.
pub type Result<T> = std::result::Result<T, DbError>;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx error (connection, query, etc.)
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// IO error (creating the database directory)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Row or database not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Constraint violation (unique origin path, missing owner record)
    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl DbError {
    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a constraint error.
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    /// Classify a failed INSERT, turning constraint failures into [`DbError::Constraint`].
    pub(crate) fn from_insert(err: sqlx::Error, what: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::constraint(format!("already cataloged: {what}"))
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                Self::constraint(format!("owner record does not exist: {what}"))
            }
            _ => Self::Sqlx(err),
        }
    }
}
