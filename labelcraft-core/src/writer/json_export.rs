//! Flat JSON export for the web lookup page

use super::RecordWriter;
use crate::config::ExportConfig;
use crate::record::AssetRecord;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize)]
struct ExportRecord<'a> {
    id: &'a str,
    description: &'a str,
    brand: &'a str,
    model: &'a str,
    serial: &'a str,
    sede: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a str>,
}

/// Writes all records as one pretty-printed JSON array
#[derive(Debug, Clone, Default)]
pub struct JsonExporter {
    config: ExportConfig,
}

impl JsonExporter {
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Serialized document; UTF-8 with non-ASCII kept literal
    pub fn to_json(&self, records: &[AssetRecord]) -> Result<String> {
        let rows: Vec<ExportRecord<'_>> = records
            .iter()
            .map(|record| ExportRecord {
                id: &record.id,
                description: &record.description,
                brand: &record.brand,
                model: &record.model,
                serial: if record.serial.is_empty() {
                    &self.config.serial_default
                } else {
                    &record.serial
                },
                sede: &record.branch,
                category: record.category.as_deref(),
            })
            .collect();

        Ok(serde_json::to_string_pretty(&rows)?)
    }
}

impl RecordWriter for JsonExporter {
    fn kind(&self) -> &str {
        "json"
    }

    fn write(&self, records: &[AssetRecord], path: &Path) -> Result<usize> {
        let json = self.to_json(records)?;
        fs::write(path, json + "\n")
            .with_context(|| format!("Failed to write export: {}", path.display()))?;
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, serial: &str) -> AssetRecord {
        AssetRecord {
            id: id.to_string(),
            description: "Máquina de café".to_string(),
            brand: "Oster".to_string(),
            model: String::new(),
            serial: serial.to_string(),
            sheet: "Sede Perú".to_string(),
            branch: "Sede Perú".to_string(),
            category: None,
        }
    }

    #[test]
    fn test_serial_default_and_fields() {
        let exporter = JsonExporter::default();
        let json = exporter.to_json(&[record("C-1", ""), record("C-2", "SN123")]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["serial"], "S/N");
        assert_eq!(value[1]["serial"], "SN123");
        assert_eq!(value[0]["sede"], "Sede Perú");
        assert!(value[0].get("category").is_none());
    }

    #[test]
    fn test_configured_serial_default() {
        let exporter = JsonExporter::new(&ExportConfig {
            serial_default: "SIN SERIAL".to_string(),
        });
        let json = exporter.to_json(&[record("C-1", "")]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["serial"], "SIN SERIAL");
    }

    #[test]
    fn test_non_ascii_kept_literal_and_indented() {
        let exporter = JsonExporter::new(&ExportConfig::default());
        let json = exporter.to_json(&[record("C-1", "")]).unwrap();

        assert!(json.contains("Máquina de café"));
        assert!(!json.contains("\\u"));
        assert!(json.contains("\n    \"id\": \"C-1\""));
    }

    #[test]
    fn test_category_included_when_known() {
        let mut with_category = record("RE-1", "");
        with_category.category = Some("Refrigeración".to_string());
        let json = JsonExporter::default().to_json(&[with_category]).unwrap();
        assert!(json.contains("\"category\": \"Refrigeración\""));
    }

    #[test]
    fn test_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("activos.json");
        let exporter = JsonExporter::new(&ExportConfig::default());

        let written = exporter.write(&[record("C-1", "")], &path).unwrap();

        assert_eq!(written, 1);
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with('['));
        assert!(content.ends_with("]\n"));
    }
}
