//! FILENAME: core/persistence/src/loader.rs
//! Record Loader - turns an input file into a typed `RawTable`.
//!
//! Dispatches on the file extension, normalizes headers, types every column
//! by content, coerces SALES and ORDERDATE, and derives the Month and
//! Quarter columns.

use crate::csv_reader::read_csv;
use crate::xlsx_reader::read_spreadsheet;
use crate::{PersistenceError, RawSheet};
use chrono::{NaiveDate, NaiveDateTime};
use engine::schema;
use engine::{CellValue, Column, ColumnType, Period, RawTable};
use std::path::Path;

const DATETIME_FORMATS: [&str; 5] = [
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 4] = ["%m/%d/%Y", "%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];

// ============================================================================
// INPUT FORMAT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Delimited,
    Spreadsheet,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self, PersistenceError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(InputFormat::Delimited),
            "xlsx" | "xls" => Ok(InputFormat::Spreadsheet),
            _ => Err(PersistenceError::UnsupportedFormat(format!(
                "{} (expected .csv, .xlsx or .xls)",
                path.display()
            ))),
        }
    }
}

// ============================================================================
// LOADING
// ============================================================================

/// Loads a sales export into a typed table.
pub fn load_sales_table(path: &Path) -> Result<RawTable, PersistenceError> {
    let sheet = match InputFormat::from_path(path)? {
        InputFormat::Delimited => read_csv(path)?,
        InputFormat::Spreadsheet => read_spreadsheet(path)?,
    };

    let table = build_sales_table(sheet)?;
    log::info!(
        target: "LOAD",
        "loaded {} row(s) from {}",
        table.row_count(),
        path.display()
    );
    Ok(table)
}

/// Builds the typed table from an untyped sheet. Required headers are matched
/// ignoring case and renamed to their canonical spelling.
pub fn build_sales_table(sheet: RawSheet) -> Result<RawTable, PersistenceError> {
    let headers: Vec<String> = sheet
        .headers
        .iter()
        .map(|header| {
            let trimmed = header.trim();
            schema::canonical_name(trimmed)
                .map(str::to_string)
                .unwrap_or_else(|| trimmed.to_string())
        })
        .collect();

    for required in schema::REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(PersistenceError::MissingColumn(required.to_string()));
        }
    }

    let mut columns = Vec::with_capacity(headers.len() + 2);
    let mut order_dates: Vec<Option<NaiveDate>> = Vec::new();

    for (index, name) in headers.iter().enumerate() {
        if name == schema::MONTH || name == schema::QUARTER {
            log::warn!(target: "LOAD", "input column '{}' is replaced by the derived one", name);
            continue;
        }

        let cells: Vec<CellValue> = sheet
            .rows
            .iter()
            .map(|row| row.get(index).cloned().unwrap_or(CellValue::Empty))
            .collect();

        let column = match name.as_str() {
            schema::SALES => coerce_sales(name, cells),
            schema::ORDERDATE => {
                let column = coerce_order_dates(name, cells);
                order_dates = column.cells.iter().map(CellValue::as_date).collect();
                column
            }
            _ => infer_column(name, cells),
        };
        columns.push(column);
    }

    columns.push(Column::new(
        schema::MONTH,
        ColumnType::Period,
        derive_periods(&order_dates, Period::month_of),
    ));
    columns.push(Column::new(
        schema::QUARTER,
        ColumnType::Period,
        derive_periods(&order_dates, Period::quarter_of),
    ));

    Ok(RawTable::from_columns(columns)?)
}

// ============================================================================
// COLUMN TYPING
// ============================================================================

/// Types a column by its content: numbers when every non-empty cell is
/// numeric, dates or booleans when every non-empty cell already is one,
/// otherwise text.
fn infer_column(name: &str, cells: Vec<CellValue>) -> Column {
    let filled: Vec<&CellValue> = cells.iter().filter(|c| !c.is_empty()).collect();

    let kind = if filled.is_empty() {
        ColumnType::Text
    } else if filled.iter().all(|c| parse_number(c).is_some()) {
        ColumnType::Number
    } else if filled.iter().all(|c| matches!(c, CellValue::Date(_))) {
        ColumnType::Date
    } else if filled.iter().all(|c| matches!(c, CellValue::Boolean(_))) {
        ColumnType::Boolean
    } else {
        ColumnType::Text
    };

    let cells = cells
        .into_iter()
        .map(|cell| {
            if cell.is_empty() {
                return CellValue::Empty;
            }
            match kind {
                ColumnType::Number => parse_number(&cell).map(CellValue::Number).unwrap_or(cell),
                ColumnType::Text => match cell {
                    CellValue::Text(_) => cell,
                    other => CellValue::Text(other.display_value()),
                },
                _ => cell,
            }
        })
        .collect();

    Column::new(name, kind, cells)
}

fn coerce_sales(name: &str, cells: Vec<CellValue>) -> Column {
    let mut rejected = 0usize;
    let cells = cells
        .into_iter()
        .map(|cell| {
            if cell.is_empty() {
                return CellValue::Empty;
            }
            match parse_number(&cell) {
                Some(n) => CellValue::Number(n),
                None => {
                    rejected += 1;
                    CellValue::Empty
                }
            }
        })
        .collect();

    if rejected > 0 {
        log::warn!(target: "LOAD", "{} non-numeric {} value(s) ignored", rejected, name);
    }
    Column::new(name, ColumnType::Number, cells)
}

fn coerce_order_dates(name: &str, cells: Vec<CellValue>) -> Column {
    let mut degraded = 0usize;
    let cells = cells
        .into_iter()
        .map(|cell| match cell {
            CellValue::Date(_) => cell,
            CellValue::Text(ref text) if !cell.is_empty() => match parse_date(text) {
                Some(date) => CellValue::Date(date),
                None => {
                    degraded += 1;
                    CellValue::Empty
                }
            },
            CellValue::Empty | CellValue::Text(_) => CellValue::Empty,
            _ => {
                degraded += 1;
                CellValue::Empty
            }
        })
        .collect();

    if degraded > 0 {
        log::warn!(
            target: "LOAD",
            "DateParseDegraded: {} {} value(s) could not be parsed and are left out of month/quarter reports",
            degraded,
            name
        );
    }
    Column::new(name, ColumnType::Date, cells)
}

fn derive_periods(dates: &[Option<NaiveDate>], period_of: fn(NaiveDate) -> Period) -> Vec<CellValue> {
    dates
        .iter()
        .map(|date| match date {
            Some(date) => CellValue::Period(period_of(*date)),
            None => CellValue::Empty,
        })
        .collect()
}

// ============================================================================
// VALUE PARSING
// ============================================================================

fn parse_number(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(n) if n.is_finite() => Some(*n),
        CellValue::Text(text) => text.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Parses the date shapes sales exports use. The time part, if any, is dropped.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        })
}
