//! FILENAME: app/src/lib.rs
// PURPOSE: Invocation surface of the report generator: load, assemble, render.
// CONTEXT: Used by the `sales-report` binary and the integration tests.

pub mod logging;
pub mod session;

pub use persistence::{OutputFormat, PersistenceError};
pub use report_engine::{ReportError, ReportKind, ReportRequest};
pub use session::{SessionSettings, DEFAULT_SETTINGS_FILE};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// REQUEST & ERRORS
// ============================================================================

/// Everything one run needs. Serializable so callers can remember it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub input_path: PathBuf,
    pub output_folder: PathBuf,
    pub reports: ReportRequest,
    pub format: OutputFormat,
    #[serde(default)]
    pub export_cleaned_data: bool,
}

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("No reports selected")]
    NoReports,
}

// ============================================================================
// GENERATION
// ============================================================================

/// Runs one report generation and returns the artifact path.
pub fn generate(
    input_path: &Path,
    output_folder: &Path,
    reports: &ReportRequest,
    format: OutputFormat,
) -> Result<PathBuf, GenerateError> {
    generate_with(&GenerateRequest {
        input_path: input_path.to_path_buf(),
        output_folder: output_folder.to_path_buf(),
        reports: reports.clone(),
        format,
        export_cleaned_data: false,
    })
}

/// Same as `generate`, with the cleaned-data export when requested.
/// Nothing is written unless loading and every report succeed.
pub fn generate_with(request: &GenerateRequest) -> Result<PathBuf, GenerateError> {
    log_info!(
        "GENERATE",
        "input={} reports={} format={}",
        request.input_path.display(),
        request.reports.len(),
        request.format
    );

    if request.reports.is_empty() {
        return Err(GenerateError::NoReports);
    }

    let table = persistence::load_sales_table(&request.input_path)?;
    let book = report_engine::assemble(&table, &request.reports)?;

    let cleaned = request.export_cleaned_data.then_some(&table);
    let path = persistence::write_report(&book, request.format, &request.output_folder, cleaned)?;

    log_info!("GENERATE", "report saved to {}", path.display());
    Ok(path)
}
