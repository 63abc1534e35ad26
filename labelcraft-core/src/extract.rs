//! Per-sheet extraction: ignore list, header, columns, records

use crate::config::LabelConfig;
use crate::error::SkipReason;
use crate::inference::{CanonicalField, CategoryTable, ColumnMap, HeaderLocator};
use crate::reader::{Sheet, Workbook};
use crate::record::{AssetRecord, RecordNormalizer};
use serde::Serialize;

/// Outcome of processing one sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetReport {
    pub name: String,
    pub branch: String,
    /// Number of records, or why the sheet was skipped
    #[serde(serialize_with = "serialize_outcome")]
    pub outcome: Result<usize, SkipReason>,
}

impl SheetReport {
    pub fn is_processed(&self) -> bool {
        self.outcome.is_ok()
    }
}

fn serialize_outcome<S>(outcome: &Result<usize, SkipReason>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeMap;

    let mut map = serializer.serialize_map(Some(1))?;
    match outcome {
        Ok(count) => map.serialize_entry("records", count)?,
        Err(reason) => map.serialize_entry("skipped", &reason.to_string())?,
    }
    map.end()
}

/// Everything extracted from one workbook
#[derive(Debug, Clone, Default, Serialize)]
pub struct Extraction {
    pub records: Vec<AssetRecord>,
    pub sheets: Vec<SheetReport>,
    /// Size of the category table used for lookups
    pub category_codes: usize,
}

impl Extraction {
    /// Sheets that contributed to the run (ignored sheets excluded)
    pub fn processed_sheets(&self) -> impl Iterator<Item = &SheetReport> {
        self.sheets.iter().filter(|s| s.is_processed())
    }

    /// Sheets skipped for a structural reason (ignored sheets excluded)
    pub fn skipped_sheets(&self) -> impl Iterator<Item = (&SheetReport, &SkipReason)> {
        self.sheets.iter().filter_map(|s| match &s.outcome {
            Err(reason) if !reason.is_ignored() => Some((s, reason)),
            _ => None,
        })
    }
}

/// Run every sheet of the workbook in order
pub fn extract_workbook(workbook: &Workbook, config: &LabelConfig) -> Extraction {
    let categories = CategoryTable::from_workbook(workbook, &config.categories);
    let locator = HeaderLocator::from_config(&config.inference);

    let mut extraction = Extraction {
        category_codes: categories.len(),
        ..Default::default()
    };

    for sheet in &workbook.sheets {
        let branch = branch_name(&sheet.name, &config.input.branch_name_strip);
        let outcome = extract_sheet(sheet, &branch, config, &locator, &categories);

        let outcome = match outcome {
            Ok(records) => {
                tracing::debug!("sheet '{}': {} records", sheet.name, records.len());
                let count = records.len();
                extraction.records.extend(records);
                Ok(count)
            }
            Err(reason) => {
                if !reason.is_ignored() {
                    tracing::debug!("sheet '{}' skipped: {}", sheet.name, reason);
                }
                Err(reason)
            }
        };

        extraction.sheets.push(SheetReport {
            name: sheet.name.clone(),
            branch,
            outcome,
        });
    }

    extraction
}

/// Records of one sheet, or the reason it yields none
pub fn extract_sheet(
    sheet: &Sheet,
    branch: &str,
    config: &LabelConfig,
    locator: &HeaderLocator,
    categories: &CategoryTable,
) -> Result<Vec<AssetRecord>, SkipReason> {
    if let Some(pattern) = ignore_match(&sheet.name, &config.input.ignore_sheets) {
        return Err(SkipReason::Ignored {
            pattern: pattern.to_string(),
        });
    }
    if let Some(error) = &sheet.load_error {
        return Err(SkipReason::Unreadable(error.clone()));
    }

    let window = sheet.text_rows(locator.window());
    let header_row = locator
        .locate(&window)
        .ok_or(SkipReason::HeaderNotFound {
            scanned: window.len(),
        })?;

    let labels = sheet.row_text(header_row);
    let columns = ColumnMap::resolve(&labels, &config.columns);
    tracing::debug!(
        "sheet '{}': header at row {}, id column {:?}",
        sheet.name,
        header_row,
        columns.label(CanonicalField::Id)
    );

    if !columns.contains(CanonicalField::Id) {
        return Err(SkipReason::MissingColumn(CanonicalField::Id));
    }
    if config.inference.require_description && !columns.contains(CanonicalField::Description) {
        return Err(SkipReason::MissingColumn(CanonicalField::Description));
    }

    let data_rows = &sheet.rows[header_row + 1..];
    Ok(RecordNormalizer::new(data_rows, &columns, &sheet.name, branch, categories).collect())
}

/// First ignore pattern contained in the sheet name, case-insensitive
pub fn ignore_match<'a>(sheet_name: &str, ignore: &'a [String]) -> Option<&'a str> {
    let name = sheet_name.to_uppercase();
    ignore
        .iter()
        .map(String::as_str)
        .find(|pattern| {
            let pattern = pattern.trim();
            !pattern.is_empty() && name.contains(&pattern.to_uppercase())
        })
}

/// Sheet name with boilerplate phrases removed; falls back to the raw name
pub fn branch_name(sheet_name: &str, strip: &[String]) -> String {
    let mut name = sheet_name.to_string();
    for phrase in strip.iter().filter(|p| !p.is_empty()) {
        name = name.replace(phrase.as_str(), "");
    }
    let name = name.trim();
    if name.is_empty() {
        sheet_name.trim().to_string()
    } else {
        name.to_string()
    }
}
