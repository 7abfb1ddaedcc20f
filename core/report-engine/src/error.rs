//! FILENAME: core/report-engine/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReportError {
    #[error("Empty dataset: SALES has no numeric values to bucket")]
    EmptyDataset,

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Unknown report: {0}")]
    UnknownReport(String),
}
