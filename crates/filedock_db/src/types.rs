//! Catalog entity types shared by the store and its callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// File Records
// ============================================================================

/// One tracked file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Store-assigned identifier
    pub id: i64,
    /// Absolute source path; unique, never changes after discovery
    pub origin_path: String,
    /// Base name of `origin_path` at discovery time
    pub file_name: String,
    pub name: Option<String>,
    pub class: Option<String>,
    pub prompt: Option<String>,
    /// Destination copy, if one was made
    pub target_path: Option<String>,
    /// Whether `origin_path` existed at the last sync (`None` before the first check)
    pub path_check: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FileRecord {
    /// True when the last sync found the origin file missing.
    pub fn is_missing(&self) -> bool {
        self.path_check == Some(false)
    }

    /// True when a destination copy is recorded.
    pub fn is_converted(&self) -> bool {
        self.target_path.is_some()
    }
}

/// A file discovered by sync that is not yet in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFileRecord {
    pub origin_path: String,
    pub file_name: String,
}

impl NewFileRecord {
    pub fn new(origin_path: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            origin_path: origin_path.into(),
            file_name: file_name.into(),
        }
    }
}

/// Changes to the descriptive fields of a record.
///
/// Outer `None` leaves a field untouched; `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldsUpdate {
    pub name: Option<Option<String>>,
    pub class: Option<Option<String>>,
    pub prompt: Option<Option<String>>,
}

impl FieldsUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.class.is_none() && self.prompt.is_none()
    }
}

/// Which records to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordCount {
    /// Every record
    All,
    /// `path_check = 0`
    Missing,
    /// Never checked by a sync (`path_check IS NULL`)
    Unchecked,
    /// `target_path IS NOT NULL`
    Converted,
}

/// Filters for listing records. Text filters are substring matches and are
/// ignored when blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFilter {
    pub name: Option<String>,
    pub class: Option<String>,
    pub prompt: Option<String>,
    pub file_name: Option<String>,
    /// Only records whose origin was missing at the last sync
    #[serde(default)]
    pub missing_only: bool,
    /// `Some(true)`: only converted records, `Some(false)`: only unconverted
    pub converted: Option<bool>,
    pub limit: Option<i64>,
}

/// A record as returned by a listing, with its image count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSummary {
    #[serde(flatten)]
    pub record: FileRecord,
    pub image_count: i64,
}

impl RecordSummary {
    pub fn has_image(&self) -> bool {
        self.image_count > 0
    }
}

// ============================================================================
// Images
// ============================================================================

/// An image attached to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub id: i64,
    pub record_id: i64,
    /// Path relative to the images directory
    pub image_path: String,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
