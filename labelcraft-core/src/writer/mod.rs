//! Output writers for normalized records

mod json_export;
pub mod metrics;
pub mod payload;
mod pdf_labels;

pub use json_export::JsonExporter;
pub use pdf_labels::{LabelGeometry, LabelPdfWriter, qr_runs};

use crate::config::LabelConfig;
use crate::record::AssetRecord;
use anyhow::Result;
use std::path::Path;

/// Trait that all output writers implement
pub trait RecordWriter {
    /// Short output kind (e.g., "pdf")
    fn kind(&self) -> &str;

    /// Write all records to `path`; returns how many were written
    fn write(&self, records: &[AssetRecord], path: &Path) -> Result<usize>;
}

/// Pick a writer from the output file extension
pub fn writer_for_path(path: &Path, config: &LabelConfig) -> Result<Box<dyn RecordWriter>> {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
        .as_deref()
    {
        Some("pdf") => Ok(Box::new(LabelPdfWriter::new(&config.label)?)),
        Some("json") => Ok(Box::new(JsonExporter::new(&config.export))),
        _ => anyhow::bail!("Unsupported output format: {}", path.display()),
    }
}
