//! FILENAME: core/engine/src/report.rs
//! PURPOSE: Output-side data model shared by the aggregation engine and the renderers.
//! CONTEXT: A `NamedResultTable` is what one aggregation produces; a `ReportBook`
//! is the ordered set of them handed to exactly one renderer.

use crate::cell::CellValue;
use crate::number_format::CurrencyFormat;
use serde::{Deserialize, Serialize};

/// How a result column is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ColumnFormat {
    #[default]
    Text,
    /// Sales-derived amount, shown as `$#,##0.00`.
    Currency,
}

impl ColumnFormat {
    /// The currency format for amount columns; `None` for plain text.
    pub fn currency_format(&self) -> Option<CurrencyFormat> {
        match self {
            ColumnFormat::Text => None,
            ColumnFormat::Currency => Some(CurrencyFormat::sales()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultColumn {
    pub name: String,
    pub format: ColumnFormat,
}

impl ResultColumn {
    pub fn text(name: impl Into<String>) -> Self {
        ResultColumn {
            name: name.into(),
            format: ColumnFormat::Text,
        }
    }

    pub fn currency(name: impl Into<String>) -> Self {
        ResultColumn {
            name: name.into(),
            format: ColumnFormat::Currency,
        }
    }
}

/// What a table represents, which decides how renderers treat it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableRole {
    /// A grouped sum of SALES; workbooks chart it.
    Breakdown,
    /// The single-row grand total.
    GrandTotal,
}

/// The output of one aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedResultTable {
    pub title: String,
    pub role: TableRole,
    pub columns: Vec<ResultColumn>,
    /// Rows in the aggregation's defined order, each aligned to `columns`.
    pub rows: Vec<Vec<CellValue>>,
}

impl NamedResultTable {
    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_chart(&self) -> bool {
        self.role == TableRole::Breakdown && !self.rows.is_empty() && self.columns.len() >= 2
    }

    /// Formats one cell for text output, applying the column's display format.
    pub fn display_cell(&self, col: usize, value: &CellValue) -> String {
        let currency = self.columns.get(col).and_then(|c| c.format.currency_format());
        match (currency, value) {
            (Some(currency), CellValue::Number(n)) => currency.format(*n),
            _ => value.display_value(),
        }
    }

    /// All rows rendered as display strings.
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(col, value)| self.display_cell(col, value))
                    .collect()
            })
            .collect()
    }
}

/// The assembled output of one run: result tables in request order,
/// plus the grand total when it was requested.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReportBook {
    pub tables: Vec<NamedResultTable>,
    pub grand_total: Option<f64>,
}

impl ReportBook {
    /// Tables that are grouped breakdowns (everything except the grand total).
    pub fn breakdowns(&self) -> impl Iterator<Item = &NamedResultTable> {
        self.tables.iter().filter(|t| t.role == TableRole::Breakdown)
    }
}
