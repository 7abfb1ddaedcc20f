//! FILENAME: core/persistence/src/render.rs
//! Output format dispatch.

use crate::csv_writer::CsvRenderer;
use crate::pdf_writer::PdfRenderer;
use crate::xlsx_writer::XlsxRenderer;
use crate::PersistenceError;
use engine::ReportBook;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Turns a report book into the bytes of one artifact.
pub trait ReportRenderer {
    fn render(&self, book: &ReportBook) -> Result<Vec<u8>, PersistenceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    #[serde(rename = "xlsx")]
    Workbook,
    #[serde(rename = "csv")]
    FlatTable,
    #[serde(rename = "pdf")]
    Document,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Workbook => "xlsx",
            OutputFormat::FlatTable => "csv",
            OutputFormat::Document => "pdf",
        }
    }

    pub fn render(&self, book: &ReportBook) -> Result<Vec<u8>, PersistenceError> {
        match self {
            OutputFormat::Workbook => XlsxRenderer.render(book),
            OutputFormat::FlatTable => CsvRenderer.render(book),
            OutputFormat::Document => PdfRenderer::default().render(book),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = PersistenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().trim_start_matches('.').to_ascii_lowercase();
        match normalized.as_str() {
            "xlsx" => Ok(OutputFormat::Workbook),
            "csv" => Ok(OutputFormat::FlatTable),
            "pdf" => Ok(OutputFormat::Document),
            _ => Err(PersistenceError::UnsupportedFormat(format!(
                "output format '{}' (expected xlsx, csv or pdf)",
                s
            ))),
        }
    }
}
