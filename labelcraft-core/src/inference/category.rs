//! Prefix -> category lookup built from the nomenclature sheet

use crate::config::CategoryConfig;
use crate::reader::{Sheet, Workbook};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;

static TOKEN_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("valid token separator pattern"));

#[derive(Debug, Error, PartialEq, Eq)]
enum CategoryError {
    #[error("no sheet name contains any of {0:?}")]
    SheetNotFound(Vec<String>),
    #[error("nomenclature sheet '{0}' could not be read: {1}")]
    Unreadable(String, String),
    #[error("nomenclature sheet '{0}' has no header row {1}")]
    HeaderMissing(String, usize),
    #[error("nomenclature sheet '{sheet}' has no {what} column")]
    ColumnMissing { sheet: String, what: &'static str },
}

/// Uppercase code prefix -> category name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTable {
    entries: HashMap<String, String>,
}

impl CategoryTable {
    /// Build the table from the workbook's nomenclature sheet.
    ///
    /// Never fails: any problem locating or parsing the sheet leaves the
    /// table empty and records get no category.
    pub fn from_workbook(workbook: &Workbook, config: &CategoryConfig) -> Self {
        match Self::try_from_workbook(workbook, config) {
            Ok(table) => {
                tracing::debug!("loaded {} category codes", table.len());
                table
            }
            Err(e) => {
                tracing::warn!("categories unavailable: {}", e);
                Self::default()
            }
        }
    }

    fn try_from_workbook(
        workbook: &Workbook,
        config: &CategoryConfig,
    ) -> Result<Self, CategoryError> {
        let patterns: Vec<String> = config
            .sheet_patterns
            .iter()
            .map(|p| p.to_lowercase())
            .collect();

        let sheet = workbook
            .sheets
            .iter()
            .find(|sheet| {
                let name = sheet.name.to_lowercase();
                patterns.iter().any(|p| !p.is_empty() && name.contains(p.as_str()))
            })
            .ok_or_else(|| CategoryError::SheetNotFound(config.sheet_patterns.clone()))?;

        Self::from_sheet(sheet, config)
    }

    fn from_sheet(sheet: &Sheet, config: &CategoryConfig) -> Result<Self, CategoryError> {
        if let Some(error) = &sheet.load_error {
            return Err(CategoryError::Unreadable(sheet.name.clone(), error.clone()));
        }
        if config.header_row >= sheet.rows.len() {
            return Err(CategoryError::HeaderMissing(
                sheet.name.clone(),
                config.header_row,
            ));
        }

        let labels = sheet.row_text(config.header_row);
        let code_col = find_keyword_column(&labels, &config.code_keywords).ok_or_else(|| {
            CategoryError::ColumnMissing {
                sheet: sheet.name.clone(),
                what: "code",
            }
        })?;
        let category_col = find_keyword_column(&labels, &config.category_keywords)
            .ok_or_else(|| CategoryError::ColumnMissing {
                sheet: sheet.name.clone(),
                what: "category",
            })?;

        let mut table = Self::default();
        for row in sheet.rows.iter().skip(config.header_row + 1) {
            let code = row
                .get(code_col)
                .map(|c| c.display().trim().to_uppercase())
                .unwrap_or_default();
            if code.is_empty() || code == "NAN" {
                continue;
            }
            let category = row
                .get(category_col)
                .map(|c| c.display().trim().to_string())
                .unwrap_or_default();
            if category.is_empty() {
                continue;
            }
            table.insert(code, category);
        }

        Ok(table)
    }

    /// Register a code; the code is normalized to trimmed uppercase
    pub fn insert(&mut self, code: impl AsRef<str>, category: impl Into<String>) {
        self.entries
            .insert(code.as_ref().trim().to_uppercase(), category.into());
    }

    /// Category of the first identifier token present in the table
    pub fn lookup(&self, identifier: &str) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        TOKEN_SEPARATOR
            .split(identifier.trim())
            .filter(|token| !token.is_empty())
            .find_map(|token| self.entries.get(&token.to_uppercase()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// First label containing any keyword, case-insensitive
fn find_keyword_column(labels: &[String], keywords: &[String]) -> Option<usize> {
    let keywords: Vec<String> = keywords
        .iter()
        .map(|k| k.trim().to_uppercase())
        .filter(|k| !k.is_empty())
        .collect();

    labels.iter().position(|label| {
        let label = label.to_uppercase();
        keywords.iter().any(|k| label.contains(k.as_str()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::CellValue;

    fn nomenclature(name: &str, rows: &[&[&str]]) -> Sheet {
        Sheet::from_rows(
            name,
            rows.iter()
                .map(|row| row.iter().map(|s| CellValue::from(*s)).collect())
                .collect(),
        )
    }

    #[test]
    fn test_lookup_by_prefix_token() {
        let mut table = CategoryTable::default();
        table.insert("RE", "Refrigeration");

        assert_eq!(table.lookup("RE-045"), Some("Refrigeration"));
        assert_eq!(table.lookup("re 045"), Some("Refrigeration"));
        assert_eq!(table.lookup("045"), None);
    }

    #[test]
    fn test_lookup_first_matching_token() {
        let mut table = CategoryTable::default();
        table.insert("MO", "Mobiliario");
        table.insert("EQ", "Equipos");

        assert_eq!(table.lookup("SUC1-EQ-MO-7"), Some("Equipos"));
        assert_eq!(table.lookup("  -- "), None);
    }

    #[test]
    fn test_empty_table_has_no_category() {
        let table = CategoryTable::default();
        assert!(table.is_empty());
        assert_eq!(table.lookup("RE-045"), None);
    }

    #[test]
    fn test_build_from_nomenclature_sheet() {
        let workbook = Workbook {
            sheets: vec![
                nomenclature("Sucursal", &[&["CODIGO", "DESCRIPCION"]]),
                nomenclature(
                    "Codificacion",
                    &[
                        &["DIGITOS", "CATEGORIA"],
                        &[" re ", " Refrigeracion "],
                        &["nan", "Ignorada"],
                        &["", "Vacia"],
                        &["MO", ""],
                        &["EQ", "Equipos"],
                    ],
                ),
            ],
            ..Default::default()
        };

        let table = CategoryTable::from_workbook(&workbook, &CategoryConfig::default());

        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup("RE-1"), Some("Refrigeracion"));
        assert_eq!(table.lookup("EQ-1"), Some("Equipos"));
        assert_eq!(table.lookup("NAN-1"), None);
    }

    #[test]
    fn test_xx_code_column_and_header_row() {
        let sheet = nomenclature(
            "NOMENCLATURA",
            &[&["Tabla de codigos"], &["XX", "Cat."], &["AA", "Aires"]],
        );
        let config = CategoryConfig {
            header_row: 1,
            ..Default::default()
        };

        let table = CategoryTable::from_sheet(&sheet, &config).unwrap();
        assert_eq!(table.lookup("AA-3"), Some("Aires"));
    }

    #[test]
    fn test_failures_yield_empty_table() {
        let config = CategoryConfig::default();

        let workbook = Workbook {
            sheets: vec![nomenclature("Sucursal", &[&["x"]])],
            ..Default::default()
        };
        assert!(CategoryTable::from_workbook(&workbook, &config).is_empty());

        let missing_column = nomenclature("Codif", &[&["CLAVE", "NOMBRE"]]);
        assert_eq!(
            CategoryTable::from_sheet(&missing_column, &config),
            Err(CategoryError::ColumnMissing {
                sheet: "Codif".to_string(),
                what: "code"
            })
        );

        let unreadable = Sheet::unreadable("Codif", "bad range");
        assert!(matches!(
            CategoryTable::from_sheet(&unreadable, &config),
            Err(CategoryError::Unreadable(_, _))
        ));

        let empty = nomenclature("Codif", &[]);
        assert!(matches!(
            CategoryTable::from_sheet(&empty, &config),
            Err(CategoryError::HeaderMissing(_, 0))
        ));
    }
}
