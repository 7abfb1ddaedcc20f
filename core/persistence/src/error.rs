//! FILENAME: core/persistence/src/error.rs

use engine::TableError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XLSX write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("Spreadsheet read error: {0}")]
    XlsxRead(#[from] calamine::Error),

    #[error("PDF write error: {0}")]
    Pdf(String),

    #[error("Delimiter cannot be determined for {}: the header line has no tab, comma or pipe", .path.display())]
    DelimiterUnresolved { path: PathBuf },

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Input file has no header row: {}", .0.display())]
    EmptyInput(PathBuf),

    #[error("Invalid table: {0}")]
    Table(#[from] TableError),
}
