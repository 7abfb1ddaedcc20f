//! FILENAME: core/report-engine/src/lib.rs
//! Sales report subsystem.
//!
//! This crate computes the named sales reports over a loaded table. It depends
//! on `engine` only for shared types (RawTable, NamedResultTable, ReportBook).
//!
//! Layers:
//! - `definition`: What each report IS (grouping, order, truncation)
//! - `aggregation`: How each report is calculated
//! - `assembly`: Runs a request in order and collects the results

pub mod aggregation;
pub mod assembly;
pub mod definition;
pub mod error;

pub use assembly::assemble;
pub use definition::{
    DateGroupLevel, Grouping, ReportDefinition, ReportKind, ReportRequest, SortOrder, TOP_N,
};
pub use aggregation::{
    compute_report, grand_total, sum_by_field, sum_by_period, sum_by_range, RangeCategory,
    SalesRange,
};
pub use error::ReportError;
