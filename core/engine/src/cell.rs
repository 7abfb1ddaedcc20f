//! FILENAME: core/engine/src/cell.rs
//! PURPOSE: Defines the value held by a single cell of a loaded sales table.
//! CONTEXT: This file contains the `CellValue` enum, the derived calendar
//! `Period` used for month/quarter grouping, and the `ColumnType` tag that
//! the loader assigns to every column after content sniffing.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun",
    "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// ============================================================================
// PERIOD
// ============================================================================

/// A calendar period derived from an order date.
/// Variants are never mixed inside one column, so the derived ordering
/// (year first, then month/quarter) is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Period {
    Month { year: i32, month: u32 },
    Quarter { year: i32, quarter: u32 },
}

impl Period {
    pub fn month_of(date: NaiveDate) -> Self {
        Period::Month {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn quarter_of(date: NaiveDate) -> Self {
        Period::Quarter {
            year: date.year(),
            quarter: (date.month() - 1) / 3 + 1,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Month { year, month } => {
                let name = MONTH_NAMES
                    .get((*month as usize).saturating_sub(1))
                    .copied()
                    .unwrap_or("???");
                write!(f, "{} {}", name, year)
            }
            Period::Quarter { year, quarter } => write!(f, "{} Q{}", year, quarter),
        }
    }
}

// ============================================================================
// CELL VALUE
// ============================================================================

/// Represents the raw or coerced data within a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
    Date(NaiveDate),
    Period(Period),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_period(&self) -> Option<Period> {
        match self {
            CellValue::Period(p) => Some(*p),
            _ => None,
        }
    }

    /// Returns the value as text, the way it is used for grouping keys
    /// and for plain-text exports.
    pub fn display_value(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => {
                // Format without unnecessary decimal places
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Text(s) => s.clone(),
            CellValue::Boolean(b) => {
                if *b { "TRUE" } else { "FALSE" }.to_string()
            }
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            CellValue::Period(p) => p.to_string(),
        }
    }
}

// ============================================================================
// COLUMN TYPE
// ============================================================================

/// Declared semantic type of a loaded column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Text,
    Number,
    Boolean,
    Date,
    Period,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_labels_are_human_readable() {
        let date = NaiveDate::from_ymd_opt(2003, 2, 24).unwrap();
        assert_eq!(Period::month_of(date).to_string(), "Feb 2003");
        assert_eq!(Period::quarter_of(date).to_string(), "2003 Q1");

        let december = NaiveDate::from_ymd_opt(2004, 12, 1).unwrap();
        assert_eq!(Period::quarter_of(december).to_string(), "2004 Q4");
    }

    #[test]
    fn periods_order_chronologically() {
        let mut months = vec![
            Period::Month { year: 2004, month: 1 },
            Period::Month { year: 2003, month: 12 },
            Period::Month { year: 2003, month: 2 },
        ];
        months.sort();
        assert_eq!(months[0], Period::Month { year: 2003, month: 2 });
        assert_eq!(months[2], Period::Month { year: 2004, month: 1 });
    }

    #[test]
    fn display_value_drops_integer_decimals() {
        assert_eq!(CellValue::Number(42.0).display_value(), "42");
        assert_eq!(CellValue::Number(2.5).display_value(), "2.5");
        assert_eq!(CellValue::Empty.display_value(), "");
        assert!(CellValue::Text("   ".to_string()).is_empty());
    }

    #[test]
    fn non_finite_numbers_are_not_numeric() {
        assert_eq!(CellValue::Number(f64::NAN).as_number(), None);
        assert_eq!(CellValue::Number(3.0).as_number(), Some(3.0));
    }
}
