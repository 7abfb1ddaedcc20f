//! FILENAME: core/persistence/src/csv_reader.rs

use crate::sniffer::sniff_file;
use crate::{PersistenceError, RawSheet};
use engine::CellValue;
use std::path::Path;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Reads a delimited text file using the sniffed separator.
/// Every non-blank field becomes a text cell; typing happens in the loader.
pub fn read_csv(path: &Path) -> Result<RawSheet, PersistenceError> {
    let delimiter = sniff_file(path)?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let text = decode_field(field);
            if i == 0 {
                text.trim_start_matches(BYTE_ORDER_MARK).to_string()
            } else {
                text
            }
        })
        .collect();

    let width = headers.len();
    let mut rows = Vec::new();

    for record in reader.byte_records() {
        let record = record?;
        let mut row: Vec<CellValue> = record
            .iter()
            .take(width)
            .map(|field| text_cell(decode_field(field)))
            .collect();

        if row.iter().all(CellValue::is_empty) {
            continue;
        }
        row.resize(width, CellValue::Empty);
        rows.push(row);
    }

    log::debug!(
        target: "LOAD",
        "read {} row(s) x {} column(s) from {}",
        rows.len(),
        width,
        path.display()
    );

    Ok(RawSheet { headers, rows })
}

/// UTF-8 when valid, otherwise Latin-1 (every byte maps to one char).
fn decode_field(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

fn text_cell(text: String) -> CellValue {
    if text.trim().is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(text)
    }
}
