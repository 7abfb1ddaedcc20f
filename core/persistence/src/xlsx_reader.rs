//! FILENAME: core/persistence/src/xlsx_reader.rs

use crate::loader::parse_date;
use crate::{PersistenceError, RawSheet};
use calamine::{open_workbook_auto, Data, Reader};
use engine::CellValue;
use std::path::Path;

/// Reads the first sheet of an `.xlsx`/`.xls` workbook. The first row of the
/// used range is the header row.
pub fn read_spreadsheet(path: &Path) -> Result<RawSheet, PersistenceError> {
    let mut workbook = open_workbook_auto(path)?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| PersistenceError::EmptyInput(path.to_path_buf()))??;

    let mut rows_iter = range.rows();
    let headers: Vec<String> = match rows_iter.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| convert_cell(cell).display_value())
            .collect(),
        None => return Err(PersistenceError::EmptyInput(path.to_path_buf())),
    };

    let mut rows = Vec::new();
    for row in rows_iter {
        let mut values: Vec<CellValue> = row.iter().map(convert_cell).collect();
        if values.iter().all(CellValue::is_empty) {
            continue;
        }
        values.resize(headers.len(), CellValue::Empty);
        rows.push(values);
    }

    log::debug!(
        target: "LOAD",
        "read {} row(s) from first sheet of {}",
        rows.len(),
        path.display()
    );

    Ok(RawSheet { headers, rows })
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) if s.trim().is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => CellValue::Date(value.date()),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => parse_date(s)
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => {
            log::warn!(target: "LOAD", "spreadsheet cell error {:?} read as empty", e);
            CellValue::Empty
        }
    }
}
