//! Workbook data structures

use std::path::PathBuf;

/// Represents a complete workbook
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub path: PathBuf,
    pub sheets: Vec<Sheet>,
}

/// Represents a worksheet as a grid anchored at A1
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub name: String,
    /// Row-major cells; row 0 is the first spreadsheet row. Rows end at
    /// their last used cell, so they may differ in length
    pub rows: Vec<Vec<CellValue>>,
    /// Error message if the sheet range could not be read
    pub load_error: Option<String>,
}

impl Sheet {
    /// Build a sheet from an already materialized grid
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
            load_error: None,
        }
    }

    /// Build a sheet that failed to load
    pub fn unreadable(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
            load_error: Some(error.into()),
        }
    }

    /// Get a cell at the given position
    pub fn get_cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Displayed text of the first `limit` rows
    pub fn text_rows(&self, limit: usize) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .take(limit)
            .map(|row| row.iter().map(CellValue::display).collect())
            .collect()
    }

    /// Displayed text of a single row, empty when out of range
    pub fn row_text(&self, row: usize) -> Vec<String> {
        self.rows
            .get(row)
            .map(|r| r.iter().map(CellValue::display).collect())
            .unwrap_or_default()
    }
}

/// Cell value types
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
    Error(String),
}

impl CellValue {
    /// String form of the value as a spreadsheet would show it.
    ///
    /// Integral numbers drop their fractional part so that a code typed as
    /// `45` is not rendered as `45.0`.
    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Text(s) => s.clone(),
            CellValue::Boolean(true) => "TRUE".to_string(),
            CellValue::Boolean(false) => "FALSE".to_string(),
            CellValue::Error(e) => e.clone(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
