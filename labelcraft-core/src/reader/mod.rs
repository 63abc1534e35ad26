//! Excel/ODS file reader using calamine

use crate::error::LabelError;
use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};
use std::path::Path;

pub mod workbook;

pub use workbook::{CellValue, Sheet, Workbook};

/// Read a workbook from a file path.
///
/// Opening the file is fatal on failure; each sheet is then read on its own
/// and a sheet that cannot be read is kept with its load error.
pub fn read_workbook<P: AsRef<Path>>(path: P) -> Result<Workbook, LabelError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LabelError::MissingInput(path.to_path_buf()));
    }

    let mut excel: Sheets<_> =
        open_workbook_auto(path).map_err(|source| LabelError::Workbook {
            path: path.to_path_buf(),
            source,
        })?;

    let sheet_names = excel.sheet_names();
    let mut sheets = Vec::with_capacity(sheet_names.len());

    for sheet_name in &sheet_names {
        let sheet = match excel.worksheet_range(sheet_name) {
            Ok(range) => parse_sheet(sheet_name, &range),
            Err(e) => {
                tracing::debug!("sheet '{}' could not be read: {}", sheet_name, e);
                Sheet::unreadable(sheet_name.as_str(), e.to_string())
            }
        };
        sheets.push(sheet);
    }

    Ok(Workbook {
        path: path.to_path_buf(),
        sheets,
    })
}

fn parse_sheet(name: &str, range: &Range<Data>) -> Sheet {
    // calamine ranges start at the first used cell; rebuild the grid from A1
    // so row indices match what a user sees in the spreadsheet
    let (Some((start_row, start_col)), Some((end_row, _))) = (range.start(), range.end()) else {
        return Sheet::from_rows(name, Vec::new());
    };
    let (start_row, start_col) = (start_row as usize, start_col as usize);

    // Only used cells are visited, so a stray value far to the right widens
    // its own row and nothing else
    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); end_row as usize + 1];
    for (row, col, data) in range.used_cells() {
        let cells = &mut rows[start_row + row];
        let col = start_col + col;
        if cells.len() <= col {
            cells.resize(col + 1, CellValue::Empty);
        }
        cells[col] = parse_cell_value(data);
    }

    Sheet::from_rows(name, rows)
}

fn parse_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::Error(e) => CellValue::Error(e.to_string()),
        Data::Empty => CellValue::Empty,
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}
