//! Normalized asset records and the row iterator that produces them

use crate::inference::{CanonicalField, CategoryTable, ColumnMap};
use crate::reader::CellValue;
use serde::{Deserialize, Serialize};

/// Identifier values that mean "no identifier", compared case-insensitively
const PLACEHOLDER_IDS: [&str; 4] = ["", "nan", "0", "none"];

/// One asset, as read from one spreadsheet row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub id: String,
    pub description: String,
    pub brand: String,
    pub model: String,
    pub serial: String,
    /// Raw name of the source sheet
    pub sheet: String,
    /// Branch display name derived from the sheet name
    pub branch: String,
    pub category: Option<String>,
}

impl AssetRecord {
    /// `brand model`, or `None` when both are blank
    pub fn brand_model(&self) -> Option<String> {
        let text = format!("{} {}", self.brand, self.model);
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

/// True for empty or placeholder identifiers (`nan`, `0`, `none`)
pub fn is_placeholder_id(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    PLACEHOLDER_IDS.contains(&value.as_str())
}

/// Remove every literal `nan` (case-sensitive) and trim
pub fn strip_nan(value: &str) -> String {
    value.replace("nan", "").trim().to_string()
}

/// Lazily turns the data rows of one sheet into records.
///
/// Rows whose identifier is empty or a placeholder are skipped; rows come
/// out in sheet order.
pub struct RecordNormalizer<'a> {
    rows: std::slice::Iter<'a, Vec<CellValue>>,
    columns: &'a ColumnMap,
    sheet: &'a str,
    branch: &'a str,
    categories: &'a CategoryTable,
}

impl<'a> RecordNormalizer<'a> {
    /// `data_rows` are the rows following the header row
    pub fn new(
        data_rows: &'a [Vec<CellValue>],
        columns: &'a ColumnMap,
        sheet: &'a str,
        branch: &'a str,
        categories: &'a CategoryTable,
    ) -> Self {
        Self {
            rows: data_rows.iter(),
            columns,
            sheet,
            branch,
            categories,
        }
    }

    fn field(&self, row: &[CellValue], field: CanonicalField) -> String {
        self.columns
            .index(field)
            .and_then(|index| row.get(index))
            .map(|cell| cell.display().trim().to_string())
            .unwrap_or_default()
    }

    fn normalize(&self, row: &[CellValue]) -> Option<AssetRecord> {
        let id = self.field(row, CanonicalField::Id);
        if is_placeholder_id(&id) {
            return None;
        }

        let description = self
            .field(row, CanonicalField::Description)
            .replace(['\r', '\n'], " ")
            .trim()
            .to_string();
        let category = self.categories.lookup(&id).map(str::to_string);

        Some(AssetRecord {
            description,
            brand: strip_nan(&self.field(row, CanonicalField::Brand)),
            model: strip_nan(&self.field(row, CanonicalField::Model)),
            serial: strip_nan(&self.field(row, CanonicalField::Serial)),
            sheet: self.sheet.to_string(),
            branch: self.branch.to_string(),
            category,
            id,
        })
    }
}

impl Iterator for RecordNormalizer<'_> {
    type Item = AssetRecord;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let row = self.rows.next()?;
            if let Some(record) = self.normalize(row) {
                return Some(record);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::ResolvedColumn;

    fn column_map(fields: &[(CanonicalField, usize)]) -> ColumnMap {
        let mut map = ColumnMap::default();
        for (field, index) in fields {
            map.insert(
                *field,
                ResolvedColumn {
                    index: *index,
                    label: field.to_string(),
                },
            );
        }
        map
    }

    fn row(cells: &[&str]) -> Vec<CellValue> {
        cells
            .iter()
            .map(|s| {
                if s.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::from(*s)
                }
            })
            .collect()
    }

    #[test]
    fn test_placeholder_ids() {
        for value in ["", "  ", "nan", "NaN", "0", "None", "NONE", " nan "] {
            assert!(is_placeholder_id(value), "{value:?} should be a placeholder");
        }
        for value in ["00", "nan1", "0-1", "RE-045", "N/A"] {
            assert!(!is_placeholder_id(value), "{value:?} should be kept");
        }
    }

    #[test]
    fn test_strip_nan_is_case_sensitive_substring_removal() {
        assert_eq!(strip_nan("nan"), "");
        assert_eq!(strip_nan(" HP "), "HP");
        assert_eq!(strip_nan("NaN"), "NaN");
        // known quirk: legitimate text loses the substring too
        assert_eq!(strip_nan("Banana"), "Baa");
    }

    #[test]
    fn test_normalizer_skips_placeholder_rows_in_order() {
        let columns = column_map(&[
            (CanonicalField::Id, 0),
            (CanonicalField::Description, 1),
            (CanonicalField::Brand, 2),
        ]);
        let rows = vec![
            row(&["A-1", "Silla", "Ofimax"]),
            vec![CellValue::Number(0.0), "Mesa".into(), CellValue::Empty],
            row(&["", "Sin codigo", ""]),
            row(&["A-2", "Nevera\nvertical", "nan"]),
        ];
        let categories = CategoryTable::default();

        let records: Vec<_> =
            RecordNormalizer::new(&rows, &columns, "Sede 1", "Sede 1", &categories).collect();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "A-1");
        assert_eq!(records[0].brand, "Ofimax");
        assert_eq!(records[1].id, "A-2");
        assert_eq!(records[1].description, "Nevera vertical");
        assert_eq!(records[1].brand, "");
        assert_eq!(records[1].model, "");
        assert_eq!(records[1].branch, "Sede 1");
    }

    #[test]
    fn test_numeric_ids_and_short_rows() {
        let columns = column_map(&[(CanonicalField::Id, 0), (CanonicalField::Serial, 4)]);
        let rows = vec![vec![CellValue::Number(1045.0)]];
        let categories = CategoryTable::default();

        let records: Vec<_> =
            RecordNormalizer::new(&rows, &columns, "S", "S", &categories).collect();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "1045");
        assert_eq!(records[0].serial, "");
        assert_eq!(records[0].description, "");
    }

    #[test]
    fn test_category_attached() {
        let columns = column_map(&[(CanonicalField::Id, 0)]);
        let rows = vec![row(&["RE-045"]), row(&["045"])];
        let mut categories = CategoryTable::default();
        categories.insert("RE", "Refrigeration");

        let records: Vec<_> =
            RecordNormalizer::new(&rows, &columns, "S", "S", &categories).collect();

        assert_eq!(records[0].category.as_deref(), Some("Refrigeration"));
        assert_eq!(records[1].category, None);
    }

    #[test]
    fn test_brand_model() {
        let mut record = AssetRecord {
            id: "1".to_string(),
            description: String::new(),
            brand: String::new(),
            model: String::new(),
            serial: String::new(),
            sheet: "S".to_string(),
            branch: "S".to_string(),
            category: None,
        };
        assert_eq!(record.brand_model(), None);

        record.model = "X200".to_string();
        assert_eq!(record.brand_model().as_deref(), Some("X200"));

        record.brand = "HP".to_string();
        assert_eq!(record.brand_model().as_deref(), Some("HP X200"));
    }
}
