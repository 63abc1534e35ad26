//! labelcraft-core: inventory workbooks to printable asset labels
//!
//! Reads loosely structured per-branch sheets, infers where each table
//! starts and which columns hold the asset fields, and normalizes rows into
//! [`AssetRecord`]s that the writers turn into PDF labels or a JSON export.

pub mod config;
pub mod error;
pub mod extract;
pub mod inference;
pub mod reader;
pub mod record;
pub mod writer;

use std::path::Path;

pub use config::{CodeMode, LabelConfig};
pub use error::{LabelError, SkipReason};
pub use extract::{Extraction, SheetReport};
pub use record::AssetRecord;
pub use writer::{JsonExporter, LabelPdfWriter, RecordWriter};

/// Main extraction interface
pub struct Labeler {
    config: LabelConfig,
}

impl Labeler {
    /// Create a labeler with default configuration
    pub fn new() -> Self {
        Self::with_config(LabelConfig::default())
    }

    /// Create a labeler with custom configuration
    pub fn with_config(config: LabelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LabelConfig {
        &self.config
    }

    /// Read a workbook and extract records from every sheet
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<Extraction, LabelError> {
        let workbook = reader::read_workbook(path)?;
        Ok(self.extract_workbook(&workbook))
    }

    /// Extract records from an already loaded workbook
    pub fn extract_workbook(&self, workbook: &reader::Workbook) -> Extraction {
        extract::extract_workbook(workbook, &self.config)
    }
}

impl Default for Labeler {
    fn default() -> Self {
        Self::new()
    }
}
