//! Configuration system for label generation

use crate::error::LabelError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration, one section per pipeline stage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub columns: ColumnCandidates,
    #[serde(default)]
    pub categories: CategoryConfig,
    #[serde(default)]
    pub label: LabelLayoutConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl LabelConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: LabelConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Reject settings that would make the run meaningless
    pub fn validate(&self) -> Result<(), LabelError> {
        if self.inference.header_keywords.is_empty() {
            return Err(LabelError::Config(
                "inference.header_keywords must not be empty".to_string(),
            ));
        }
        if self.inference.header_min_matches == 0 {
            return Err(LabelError::Config(
                "inference.header_min_matches must be at least 1".to_string(),
            ));
        }
        if self.inference.header_scan_rows == 0 {
            return Err(LabelError::Config(
                "inference.header_scan_rows must be at least 1".to_string(),
            ));
        }
        if self.columns.id.is_empty() {
            return Err(LabelError::Config(
                "columns.id needs at least one candidate".to_string(),
            ));
        }
        if self.inference.require_description && self.columns.description.is_empty() {
            return Err(LabelError::Config(
                "columns.description needs at least one candidate when descriptions are required"
                    .to_string(),
            ));
        }

        let label = &self.label;
        if !(label.width_mm > 0.0 && label.height_mm > 0.0) {
            return Err(LabelError::Config(format!(
                "label size must be positive, got {}x{} mm",
                label.width_mm, label.height_mm
            )));
        }
        for (key, value) in [
            ("label.accent_color", &label.accent_color),
            ("label.text_color", &label.text_color),
            ("label.muted_color", &label.muted_color),
        ] {
            if parse_hex_color(value).is_none() {
                return Err(LabelError::Config(format!(
                    "{} is not a #RRGGBB color: '{}'",
                    key, value
                )));
            }
        }
        if label.code_mode == CodeMode::Url
            && label.url_base.as_deref().is_none_or(|base| base.trim().is_empty())
        {
            return Err(LabelError::Config(
                "label.url_base is required when code_mode = \"url\"".to_string(),
            ));
        }

        Ok(())
    }
}

/// Which sheets to read and how to name branches
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Sheets whose name contains any of these (case-insensitive) are skipped
    pub ignore_sheets: Vec<String>,
    /// Phrases removed from sheet names to obtain the branch name
    pub branch_name_strip: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            ignore_sheets: strings(&[
                "NOMENCLATURA",
                "MODELO",
                "RESUMEN",
                "INDICE",
                "PORTADA",
                "CODIF",
            ]),
            branch_name_strip: strings(&["Base de Datos Maestra", "Base Datos Maestra"]),
        }
    }
}

/// Header row detection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub header_keywords: Vec<String>,
    pub header_min_matches: usize,
    pub header_scan_rows: usize,
    /// Skip sheets without a resolvable description column
    pub require_description: bool,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            header_keywords: strings(&[
                "DESCRIPCION",
                "MARCA",
                "MODELO",
                "SERIAL",
                "CODIGO",
                "BIEN",
            ]),
            header_min_matches: 2,
            header_scan_rows: 15,
            require_description: true,
        }
    }
}

/// Candidate header names per canonical field, in priority order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnCandidates {
    pub id: Vec<String>,
    pub description: Vec<String>,
    pub brand: Vec<String>,
    pub model: Vec<String>,
    pub serial: Vec<String>,
}

impl Default for ColumnCandidates {
    fn default() -> Self {
        Self {
            id: strings(&["CODIGO", "ID", "ETIQUETA"]),
            description: strings(&["DESCRIPCION", "BIEN", "NOMBRE"]),
            brand: strings(&["MARCA"]),
            model: strings(&["MODELO"]),
            serial: strings(&["SERIAL", "SERIE", "S/N"]),
        }
    }
}

/// Nomenclature sheet lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    pub sheet_patterns: Vec<String>,
    /// Zero-based header row of the nomenclature sheet
    pub header_row: usize,
    pub code_keywords: Vec<String>,
    pub category_keywords: Vec<String>,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            sheet_patterns: strings(&["codif", "nomenclatura"]),
            header_row: 0,
            code_keywords: strings(&["dig", "XX"]),
            category_keywords: strings(&["cat"]),
        }
    }
}

/// What the QR code on each label encodes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeMode {
    /// Multi-line text card readable offline
    #[default]
    Card,
    /// Link to an external lookup page
    Url,
}

/// Label page geometry, branding and code payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelLayoutConfig {
    pub width_mm: f32,
    pub height_mm: f32,
    pub code_mode: CodeMode,
    pub url_base: Option<String>,
    pub url_param: String,
    pub title: String,
    pub card_title: String,
    pub card_footer: String,
    /// Printed instead of brand/model when both are empty
    pub generic_text: String,
    pub accent_color: String,
    pub text_color: String,
    pub muted_color: String,
    pub logo: Option<PathBuf>,
}

impl Default for LabelLayoutConfig {
    fn default() -> Self {
        Self {
            width_mm: 57.0,
            height_mm: 32.0,
            code_mode: CodeMode::Card,
            url_base: None,
            url_param: "id".to_string(),
            title: "ACTIVO FIJO".to_string(),
            card_title: "ACTIVO FIJO".to_string(),
            card_footer: "Inventario Verificado".to_string(),
            generic_text: "GENERICO".to_string(),
            accent_color: "#D32F2F".to_string(),
            text_color: "#000000".to_string(),
            muted_color: "#333333".to_string(),
            logo: None,
        }
    }
}

/// JSON export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub serial_default: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            serial_default: "S/N".to_string(),
        }
    }
}

/// Parse `#RRGGBB` into 0..1 channel values
pub fn parse_hex_color(value: &str) -> Option<(f32, f32, f32)> {
    let hex = value.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .ok()
            .map(|v| f32::from(v) / 255.0)
    };
    Some((channel(0)?, channel(2)?, channel(4)?))
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
