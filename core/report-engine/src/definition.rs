//! FILENAME: core/report-engine/src/definition.rs
//! Report Definitions - what each named report IS.
//!
//! This module contains the closed set of report identifiers and the
//! description of how each one groups, sorts and truncates. These structures
//! are designed to be:
//! - Serializable (so callers can remember the last selection)
//! - Parsed from the names users type or pick
//! - Immutable snapshots of user intent

use crate::error::ReportError;
use engine::schema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of rows kept by the "top" reports.
pub const TOP_N: usize = 5;

// ============================================================================
// REPORT KIND
// ============================================================================

/// The fixed set of reports a caller can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportKind {
    TopProducts,
    TopCustomers,
    ByCountry,
    ByMonth,
    ByQuarter,
    ByRange,
    TotalSummary,
}

impl ReportKind {
    pub const ALL: [ReportKind; 7] = [
        ReportKind::TopProducts,
        ReportKind::TopCustomers,
        ReportKind::ByCountry,
        ReportKind::ByMonth,
        ReportKind::ByQuarter,
        ReportKind::ByRange,
        ReportKind::TotalSummary,
    ];

    /// Display title, also used as the sheet name in workbooks.
    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::TopProducts => "Top Products",
            ReportKind::TopCustomers => "Top Customers",
            ReportKind::ByCountry => "Sales by Country",
            ReportKind::ByMonth => "Sales by Month",
            ReportKind::ByQuarter => "Sales by Quarter",
            ReportKind::ByRange => "Sales by Range",
            ReportKind::TotalSummary => "Total Sales Summary",
        }
    }

    /// Snake-case key, as used in settings files.
    pub fn key(&self) -> &'static str {
        match self {
            ReportKind::TopProducts => "top_products",
            ReportKind::TopCustomers => "top_customers",
            ReportKind::ByCountry => "by_country",
            ReportKind::ByMonth => "by_month",
            ReportKind::ByQuarter => "by_quarter",
            ReportKind::ByRange => "by_range",
            ReportKind::TotalSummary => "total_summary",
        }
    }

    pub fn definition(&self) -> ReportDefinition {
        let (grouping, sort_order, top_n) = match self {
            ReportKind::TopProducts => (
                Grouping::Field(schema::PRODUCTLINE),
                SortOrder::ValueDescending,
                Some(TOP_N),
            ),
            ReportKind::TopCustomers => (
                Grouping::Field(schema::CUSTOMERNAME),
                SortOrder::ValueDescending,
                Some(TOP_N),
            ),
            ReportKind::ByCountry => (
                Grouping::Field(schema::COUNTRY),
                SortOrder::ValueDescending,
                None,
            ),
            ReportKind::ByMonth => (
                Grouping::Date(DateGroupLevel::Month),
                SortOrder::Chronological,
                None,
            ),
            ReportKind::ByQuarter => (
                Grouping::Date(DateGroupLevel::Quarter),
                SortOrder::Chronological,
                None,
            ),
            ReportKind::ByRange => (Grouping::SalesRange, SortOrder::Fixed, None),
            ReportKind::TotalSummary => (Grouping::None, SortOrder::Fixed, None),
        };

        ReportDefinition {
            kind: *self,
            title: self.title(),
            grouping,
            sort_order,
            top_n,
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for ReportKind {
    type Err = ReportError;

    /// Accepts `TopProducts`, `top_products`, `Top Products` and the longer
    /// labels such as `Sales by Range (Low/Mid/High)`, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .split('(')
            .next()
            .unwrap_or_default()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        let kind = match normalized.as_str() {
            "topproducts" => ReportKind::TopProducts,
            "topcustomers" => ReportKind::TopCustomers,
            "bycountry" | "salesbycountry" => ReportKind::ByCountry,
            "bymonth" | "salesbymonth" => ReportKind::ByMonth,
            "byquarter" | "salesbyquarter" => ReportKind::ByQuarter,
            "byrange" | "salesbyrange" => ReportKind::ByRange,
            "totalsummary" | "totalsalessummary" | "total" => ReportKind::TotalSummary,
            _ => return Err(ReportError::UnknownReport(s.trim().to_string())),
        };
        Ok(kind)
    }
}

// ============================================================================
// REPORT DEFINITION
// ============================================================================

/// Levels for date grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateGroupLevel {
    Month,
    Quarter,
}

impl DateGroupLevel {
    /// Name of the derived column holding this level's periods.
    pub fn column_name(&self) -> &'static str {
        match self {
            DateGroupLevel::Month => schema::MONTH,
            DateGroupLevel::Quarter => schema::QUARTER,
        }
    }
}

/// What the rows of a report are keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    /// Distinct values of a text column.
    Field(&'static str),
    /// Calendar periods derived from ORDERDATE.
    Date(DateGroupLevel),
    /// Low/Middle/High thirds of the SALES range.
    SalesRange,
    /// A single grand-total row.
    None,
}

/// Row order of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Largest sum first; ties by ascending key.
    ValueDescending,
    /// Oldest period first.
    Chronological,
    /// Order fixed by the report itself.
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportDefinition {
    pub kind: ReportKind,
    pub title: &'static str,
    pub grouping: Grouping,
    pub sort_order: SortOrder,
    pub top_n: Option<usize>,
}

// ============================================================================
// REPORT REQUEST
// ============================================================================

/// Ordered set of distinct reports. Duplicates collapse onto their first
/// occurrence; order decides sheet/section order in the output.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<ReportKind>", into = "Vec<ReportKind>")]
pub struct ReportRequest {
    kinds: Vec<ReportKind>,
}

impl ReportRequest {
    pub fn new(kinds: impl IntoIterator<Item = ReportKind>) -> Self {
        let mut request = ReportRequest::default();
        for kind in kinds {
            request.push(kind);
        }
        request
    }

    /// Every report, in the default order.
    pub fn all() -> Self {
        ReportRequest::new(ReportKind::ALL)
    }

    /// Parses report names, failing on the first unknown one.
    pub fn parse<S: AsRef<str>>(names: &[S]) -> Result<Self, ReportError> {
        let kinds = names
            .iter()
            .map(|name| name.as_ref().parse::<ReportKind>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ReportRequest::new(kinds))
    }

    pub fn push(&mut self, kind: ReportKind) {
        if !self.kinds.contains(&kind) {
            self.kinds.push(kind);
        }
    }

    pub fn kinds(&self) -> &[ReportKind] {
        &self.kinds
    }

    pub fn contains(&self, kind: ReportKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }
}

impl From<Vec<ReportKind>> for ReportRequest {
    fn from(kinds: Vec<ReportKind>) -> Self {
        ReportRequest::new(kinds)
    }
}

impl From<ReportRequest> for Vec<ReportKind> {
    fn from(request: ReportRequest) -> Self {
        request.kinds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_all_spellings() {
        assert_eq!("TopProducts".parse::<ReportKind>(), Ok(ReportKind::TopProducts));
        assert_eq!("top_customers".parse::<ReportKind>(), Ok(ReportKind::TopCustomers));
        assert_eq!("Sales by Country".parse::<ReportKind>(), Ok(ReportKind::ByCountry));
        assert_eq!(
            "Sales by Range (Low/Mid/High)".parse::<ReportKind>(),
            Ok(ReportKind::ByRange)
        );
        assert_eq!(
            "Total Sales Summary".parse::<ReportKind>(),
            Ok(ReportKind::TotalSummary)
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(
            "by_weekday".parse::<ReportKind>(),
            Err(ReportError::UnknownReport("by_weekday".to_string()))
        );
    }

    #[test]
    fn test_request_collapses_duplicates_in_order() {
        let request = ReportRequest::new([
            ReportKind::ByRange,
            ReportKind::TopProducts,
            ReportKind::ByRange,
            ReportKind::TotalSummary,
        ]);
        assert_eq!(
            request.kinds(),
            &[ReportKind::ByRange, ReportKind::TopProducts, ReportKind::TotalSummary]
        );
    }

    #[test]
    fn test_every_kind_round_trips_through_its_key_and_title() {
        for kind in ReportKind::ALL {
            assert_eq!(kind.key().parse::<ReportKind>(), Ok(kind));
            assert_eq!(kind.title().parse::<ReportKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_top_reports_truncate() {
        assert_eq!(ReportKind::TopProducts.definition().top_n, Some(TOP_N));
        assert_eq!(ReportKind::ByCountry.definition().top_n, None);
        assert_eq!(
            ReportKind::ByQuarter.definition().grouping,
            Grouping::Date(DateGroupLevel::Quarter)
        );
    }
}
