//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Main library entry point for the sales report data model.
//! CONTEXT: Re-exports public types and modules for use by other crates.

pub mod cell;
pub mod number_format;
pub mod report;
pub mod schema;
pub mod table;

// Re-export commonly used types at the crate root
pub use cell::{CellValue, ColumnType, Period};
pub use number_format::CurrencyFormat;
pub use report::{ColumnFormat, NamedResultTable, ReportBook, ResultColumn, TableRole};
pub use table::{Column, RawTable, TableError};
