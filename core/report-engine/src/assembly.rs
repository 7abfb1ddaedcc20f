//! FILENAME: core/report-engine/src/assembly.rs
//! Report Assembly - runs the requested reports in order.
//!
//! Pure orchestration: no I/O, so everything here is testable against an
//! in-memory table.

use crate::aggregation::{compute_report, grand_total, total_summary};
use crate::definition::{ReportKind, ReportRequest};
use crate::error::ReportError;
use engine::{RawTable, ReportBook};

/// Computes every requested report, in request order. The grand total is
/// computed once and only attached when TotalSummary was requested.
pub fn assemble(table: &RawTable, request: &ReportRequest) -> Result<ReportBook, ReportError> {
    let total = if request.contains(ReportKind::TotalSummary) {
        Some(grand_total(table)?)
    } else {
        None
    };

    let mut tables = Vec::with_capacity(request.len());
    for kind in request.kinds() {
        let result = match (kind, total) {
            (ReportKind::TotalSummary, Some(total)) => {
                total_summary(&kind.definition(), total)
            }
            _ => compute_report(table, *kind)?,
        };
        log::debug!(
            target: "REPORT",
            "computed '{}' rows={}",
            result.title,
            result.rows.len()
        );
        tables.push(result);
    }

    log::info!(
        target: "REPORT",
        "assembled {} report(s) over {} row(s)",
        tables.len(),
        table.row_count()
    );

    Ok(ReportBook {
        tables,
        grand_total: total,
    })
}
