//! FILENAME: core/persistence/src/lib.rs
//! Sales Report Persistence Module
//!
//! Reads sales exports (delimited text, XLSX, XLS) into typed tables and
//! writes assembled report books as XLSX, CSV or PDF artifacts.

mod csv_reader;
mod csv_writer;
mod error;
mod loader;
mod output;
mod pdf_writer;
mod render;
mod sniffer;
mod xlsx_reader;
mod xlsx_writer;

#[cfg(test)]
mod fixtures;

pub use csv_writer::{table_to_csv, CsvRenderer};
pub use error::PersistenceError;
pub use loader::{build_sales_table, load_sales_table, parse_date, InputFormat};
pub use output::{
    write_atomically, write_report, StagedFile, CLEANED_DATA_FILE, REPORT_FILE_STEM,
};
pub use pdf_writer::{document_lines, DocumentLine, LineStyle, PdfRenderer, DOCUMENT_TITLE};
pub use render::{OutputFormat, ReportRenderer};
pub use sniffer::{sniff_delimiter, sniff_file, CANDIDATE_DELIMITERS};
pub use xlsx_writer::{XlsxRenderer, SUMMARY_SHEET_NAME};

use engine::CellValue;

// ============================================================================
// RAW SHEET
// ============================================================================

/// An untyped grid read from an input file: the header row and the data rows
/// below it, every row padded to the header width.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}
