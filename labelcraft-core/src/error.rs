//! Error types: fatal run errors and per-sheet skip reasons

use crate::inference::CanonicalField;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort the whole run before any output is produced
#[derive(Debug, Error)]
pub enum LabelError {
    #[error("input workbook not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("failed to open workbook {}: {source}", path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Why a sheet produced no records.
///
/// Every variant is recovered locally: the sheet is skipped and the run
/// continues with the next one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("sheet name matches ignore pattern '{pattern}'")]
    Ignored { pattern: String },

    #[error("sheet could not be read: {0}")]
    Unreadable(String),

    #[error("no header row found in the first {scanned} rows")]
    HeaderNotFound { scanned: usize },

    #[error("required column '{0}' not found")]
    MissingColumn(CanonicalField),
}

impl SkipReason {
    /// Ignored sheets are expected and usually not worth reporting
    pub fn is_ignored(&self) -> bool {
        matches!(self, SkipReason::Ignored { .. })
    }
}
