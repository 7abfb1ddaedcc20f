//! FILENAME: core/engine/src/table.rs
//! PURPOSE: The in-memory table produced by ingestion.
//! CONTEXT: A `RawTable` is built once per run from a delimited file or a
//! spreadsheet and is read-only afterwards. Columns are stored separately
//! (column-major) because every aggregation walks one or two columns.

use crate::cell::{CellValue, ColumnType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("Column '{name}' has {actual} cells, expected {expected}")]
    RaggedColumn {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Duplicate column header: {0}")]
    DuplicateHeader(String),
}

/// A single named column of typed cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnType,
    pub cells: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnType, cells: Vec<CellValue>) -> Self {
        Column {
            name: name.into(),
            kind,
            cells,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Numeric values of the column, skipping empty and non-numeric cells.
    pub fn numbers(&self) -> impl Iterator<Item = f64> + '_ {
        self.cells.iter().filter_map(CellValue::as_number)
    }
}

/// Ordered collection of equal-length columns.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawTable {
    columns: Vec<Column>,
    row_count: usize,
}

impl RawTable {
    /// Builds a table, trimming every header and checking the
    /// equal-length and unique-header invariants.
    pub fn from_columns(mut columns: Vec<Column>) -> Result<Self, TableError> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);
        let mut seen = HashSet::new();

        for column in columns.iter_mut() {
            column.name = column.name.trim().to_string();

            if column.len() != row_count {
                return Err(TableError::RaggedColumn {
                    name: column.name.clone(),
                    expected: row_count,
                    actual: column.len(),
                });
            }
            if !seen.insert(column.name.clone()) {
                return Err(TableError::DuplicateHeader(column.name.clone()));
            }
        }

        Ok(RawTable { columns, row_count })
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Looks up a column by exact (already trimmed) name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}
