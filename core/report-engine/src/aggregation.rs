//! FILENAME: core/report-engine/src/aggregation.rs
//! Aggregation Engine - turns a loaded table into one result table per report.
//!
//! Every report is a pure function `&RawTable -> NamedResultTable`; nothing is
//! cached between calls, so the same table always yields the same rows.

use crate::definition::{DateGroupLevel, Grouping, ReportDefinition, ReportKind, SortOrder};
use crate::error::ReportError;
use engine::schema;
use engine::{CellValue, Column, NamedResultTable, Period, RawTable, ResultColumn, TableRole};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

/// Smallest currency unit; offsets the displayed lower bound of the Middle and
/// High buckets so adjacent ranges do not overlap.
pub const SMALLEST_CURRENCY_UNIT: f64 = 0.01;

pub const TOTAL_SALES_LABEL: &str = "Total Sales";

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Computes one report over the table.
pub fn compute_report(table: &RawTable, kind: ReportKind) -> Result<NamedResultTable, ReportError> {
    let definition = kind.definition();

    match definition.grouping {
        Grouping::Field(field) => field_report(table, &definition, field),
        Grouping::Date(level) => period_report(table, &definition, level),
        Grouping::SalesRange => range_report(table, &definition),
        Grouping::None => Ok(total_summary(&definition, grand_total(table)?)),
    }
}

/// Sum of every numeric SALES value in the table.
pub fn grand_total(table: &RawTable) -> Result<f64, ReportError> {
    Ok(sales_column(table)?.numbers().sum())
}

/// Builds the single-row TotalSummary table for an already computed total.
pub fn total_summary(definition: &ReportDefinition, total: f64) -> NamedResultTable {
    NamedResultTable {
        title: definition.title.to_string(),
        role: TableRole::GrandTotal,
        columns: vec![ResultColumn::text("Metric"), ResultColumn::currency(schema::SALES)],
        rows: vec![vec![
            CellValue::Text(TOTAL_SALES_LABEL.to_string()),
            CellValue::Number(total),
        ]],
    }
}

// ============================================================================
// GROUPED SUMS
// ============================================================================

/// Sums SALES per distinct value of `field`.
/// Rows with an empty key are left out; rows with an empty SALES cell still
/// register their group with nothing added to it.
pub fn sum_by_field(table: &RawTable, field: &str) -> Result<Vec<(String, f64)>, ReportError> {
    let sales = sales_column(table)?;
    let keys = require_column(table, field)?;

    let mut index: FxHashMap<String, usize> = FxHashMap::default();
    let mut groups: Vec<(String, f64)> = Vec::new();

    for (key, value) in keys.cells.iter().zip(&sales.cells) {
        if key.is_empty() {
            continue;
        }
        let label = key.display_value().trim().to_string();
        let slot = *index.entry(label.clone()).or_insert_with(|| {
            groups.push((label, 0.0));
            groups.len() - 1
        });
        if let Some(amount) = value.as_number() {
            groups[slot].1 += amount;
        }
    }

    Ok(groups)
}

/// Sorts grouped sums largest first. Ties keep ascending key order.
pub fn sort_descending(groups: &mut [(String, f64)]) {
    groups.sort_by(|a, b| a.0.cmp(&b.0));
    groups.sort_by(|a, b| b.1.total_cmp(&a.1));
}

fn field_report(
    table: &RawTable,
    definition: &ReportDefinition,
    field: &str,
) -> Result<NamedResultTable, ReportError> {
    let mut groups = sum_by_field(table, field)?;

    if definition.sort_order == SortOrder::ValueDescending {
        sort_descending(&mut groups);
    }
    if let Some(limit) = definition.top_n {
        groups.truncate(limit);
    }

    Ok(breakdown(definition, field, groups))
}

// ============================================================================
// DATE GROUPING
// ============================================================================

/// Sums SALES per calendar period, oldest first. Rows without a period
/// (unparseable ORDERDATE) are excluded.
pub fn sum_by_period(
    table: &RawTable,
    level: DateGroupLevel,
) -> Result<Vec<(Period, f64)>, ReportError> {
    let sales = sales_column(table)?;
    let periods = period_keys(table, level)?;

    let mut sums: BTreeMap<Period, f64> = BTreeMap::new();
    for (period, value) in periods.into_iter().zip(&sales.cells) {
        let Some(period) = period else {
            continue;
        };
        let entry = sums.entry(period).or_insert(0.0);
        if let Some(amount) = value.as_number() {
            *entry += amount;
        }
    }

    Ok(sums.into_iter().collect())
}

/// Uses the derived Month/Quarter column when present, otherwise derives the
/// periods from ORDERDATE directly.
fn period_keys(table: &RawTable, level: DateGroupLevel) -> Result<Vec<Option<Period>>, ReportError> {
    if let Some(column) = table.column(level.column_name()) {
        return Ok(column.cells.iter().map(CellValue::as_period).collect());
    }

    let dates = require_column(table, schema::ORDERDATE)?;
    Ok(dates
        .cells
        .iter()
        .map(|cell| {
            cell.as_date().map(|date| match level {
                DateGroupLevel::Month => Period::month_of(date),
                DateGroupLevel::Quarter => Period::quarter_of(date),
            })
        })
        .collect())
}

fn period_report(
    table: &RawTable,
    definition: &ReportDefinition,
    level: DateGroupLevel,
) -> Result<NamedResultTable, ReportError> {
    let groups = sum_by_period(table, level)?
        .into_iter()
        .map(|(period, sum)| (period.to_string(), sum))
        .collect();

    Ok(breakdown(definition, level.column_name(), groups))
}

// ============================================================================
// RANGE BUCKETING
// ============================================================================

/// Sale-value buckets, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeCategory {
    Low,
    Middle,
    High,
}

impl RangeCategory {
    pub const ALL: [RangeCategory; 3] = [RangeCategory::Low, RangeCategory::Middle, RangeCategory::High];

    pub fn label(&self) -> &'static str {
        match self {
            RangeCategory::Low => "Low Range",
            RangeCategory::Middle => "Middle Range",
            RangeCategory::High => "High Range",
        }
    }
}

/// Thresholds splitting `[min, max]` into three equal-width bands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalesRange {
    pub min: f64,
    pub max: f64,
    pub low: f64,
    pub high: f64,
}

impl SalesRange {
    /// Returns `None` when there are no values.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut bounds: Option<(f64, f64)> = None;
        for value in values {
            bounds = Some(match bounds {
                None => (value, value),
                Some((min, max)) => (min.min(value), max.max(value)),
            });
        }

        let (min, max) = bounds?;
        let width = max - min;
        Some(SalesRange {
            min,
            max,
            low: min + width / 3.0,
            high: min + 2.0 * width / 3.0,
        })
    }

    /// A value on a threshold belongs to the lower bucket. When every value is
    /// equal the thresholds coincide and everything lands in Low.
    pub fn classify(&self, value: f64) -> RangeCategory {
        if value <= self.low {
            RangeCategory::Low
        } else if value <= self.high {
            RangeCategory::Middle
        } else {
            RangeCategory::High
        }
    }

    /// Displayed (minimum, maximum) of a bucket.
    pub fn bounds(&self, category: RangeCategory) -> (f64, f64) {
        match category {
            RangeCategory::Low => (self.min, self.low),
            RangeCategory::Middle => (self.low + SMALLEST_CURRENCY_UNIT, self.high),
            RangeCategory::High => (self.high + SMALLEST_CURRENCY_UNIT, self.max),
        }
    }
}

/// Per-bucket sums in Low, Middle, High order. Fails with `EmptyDataset`
/// when SALES holds no numbers.
pub fn sum_by_range(table: &RawTable) -> Result<(SalesRange, [f64; 3]), ReportError> {
    let sales = sales_column(table)?;
    let range = SalesRange::from_values(sales.numbers()).ok_or(ReportError::EmptyDataset)?;

    let mut sums = [0.0; 3];
    for value in sales.numbers() {
        let slot = match range.classify(value) {
            RangeCategory::Low => 0,
            RangeCategory::Middle => 1,
            RangeCategory::High => 2,
        };
        sums[slot] += value;
    }

    Ok((range, sums))
}

fn range_report(table: &RawTable, definition: &ReportDefinition) -> Result<NamedResultTable, ReportError> {
    let (range, sums) = sum_by_range(table)?;

    let rows = RangeCategory::ALL
        .iter()
        .zip(sums)
        .map(|(category, sum)| {
            let (lower, upper) = range.bounds(*category);
            vec![
                CellValue::Text(category.label().to_string()),
                CellValue::Number(sum),
                CellValue::Number(lower),
                CellValue::Number(upper),
            ]
        })
        .collect();

    Ok(NamedResultTable {
        title: definition.title.to_string(),
        role: TableRole::Breakdown,
        columns: vec![
            ResultColumn::text("Range Category"),
            ResultColumn::currency(schema::SALES),
            ResultColumn::currency("Minimum sale value"),
            ResultColumn::currency("Maximum sale value"),
        ],
        rows,
    })
}

// ============================================================================
// HELPERS
// ============================================================================

fn breakdown(definition: &ReportDefinition, key_header: &str, groups: Vec<(String, f64)>) -> NamedResultTable {
    NamedResultTable {
        title: definition.title.to_string(),
        role: TableRole::Breakdown,
        columns: vec![ResultColumn::text(key_header), ResultColumn::currency(schema::SALES)],
        rows: groups
            .into_iter()
            .map(|(key, sum)| vec![CellValue::Text(key), CellValue::Number(sum)])
            .collect(),
    }
}

fn require_column<'a>(table: &'a RawTable, name: &str) -> Result<&'a Column, ReportError> {
    table
        .column(name)
        .ok_or_else(|| ReportError::MissingColumn(name.to_string()))
}

fn sales_column(table: &RawTable) -> Result<&Column, ReportError> {
    require_column(table, schema::SALES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use engine::ColumnType;

    fn text_column(name: &str, values: &[&str]) -> Column {
        Column::new(
            name,
            ColumnType::Text,
            values.iter().map(|v| CellValue::Text(v.to_string())).collect(),
        )
    }

    fn sales_column_of(values: &[f64]) -> Column {
        Column::new(
            schema::SALES,
            ColumnType::Number,
            values.iter().map(|v| CellValue::Number(*v)).collect(),
        )
    }

    fn table(columns: Vec<Column>) -> RawTable {
        RawTable::from_columns(columns).unwrap()
    }

    fn row_pairs(result: &NamedResultTable) -> Vec<(String, f64)> {
        result
            .rows
            .iter()
            .map(|row| (row[0].display_value(), row[1].as_number().unwrap()))
            .collect()
    }

    #[test]
    fn test_top_products_groups_and_sorts() {
        let data = table(vec![
            text_column(schema::PRODUCTLINE, &["A", "B", "A"]),
            sales_column_of(&[100.0, 300.0, 50.0]),
        ]);

        let result = compute_report(&data, ReportKind::TopProducts).unwrap();
        assert_eq!(result.title, "Top Products");
        assert_eq!(result.headers(), vec!["PRODUCTLINE", "SALES"]);
        assert_eq!(
            row_pairs(&result),
            vec![("B".to_string(), 300.0), ("A".to_string(), 150.0)]
        );
    }

    #[test]
    fn test_top_customers_keeps_five() {
        let names = ["a", "b", "c", "d", "e", "f", "g"];
        let data = table(vec![
            text_column(schema::CUSTOMERNAME, &names),
            sales_column_of(&[1.0, 7.0, 3.0, 6.0, 5.0, 4.0, 2.0]),
        ]);

        let result = compute_report(&data, ReportKind::TopCustomers).unwrap();
        let keys: Vec<String> = row_pairs(&result).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "d", "e", "f", "c"]);
    }

    #[test]
    fn test_ties_break_by_key() {
        let data = table(vec![
            text_column(schema::COUNTRY, &["USA", "France", "Spain"]),
            sales_column_of(&[10.0, 10.0, 20.0]),
        ]);

        let result = compute_report(&data, ReportKind::ByCountry).unwrap();
        let keys: Vec<String> = row_pairs(&result).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Spain", "France", "USA"]);
    }

    #[test]
    fn test_empty_keys_are_skipped_and_empty_sales_register_group() {
        let data = table(vec![
            text_column(schema::COUNTRY, &["USA", "", "Norway"]),
            Column::new(
                schema::SALES,
                ColumnType::Number,
                vec![CellValue::Number(5.0), CellValue::Number(9.0), CellValue::Empty],
            ),
        ]);

        let groups = sum_by_field(&data, schema::COUNTRY).unwrap();
        assert_eq!(groups, vec![("USA".to_string(), 5.0), ("Norway".to_string(), 0.0)]);
    }

    #[test]
    fn test_months_are_chronological_and_skip_missing_dates() {
        let date = |y, m, d| CellValue::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap());
        let data = table(vec![
            Column::new(
                schema::ORDERDATE,
                ColumnType::Date,
                vec![date(2004, 1, 5), date(2003, 11, 2), CellValue::Empty, date(2003, 11, 20)],
            ),
            sales_column_of(&[10.0, 20.0, 40.0, 5.0]),
        ]);

        let months = compute_report(&data, ReportKind::ByMonth).unwrap();
        assert_eq!(months.headers(), vec!["Month", "SALES"]);
        assert_eq!(
            row_pairs(&months),
            vec![("Nov 2003".to_string(), 25.0), ("Jan 2004".to_string(), 10.0)]
        );

        let quarters = compute_report(&data, ReportKind::ByQuarter).unwrap();
        assert_eq!(
            row_pairs(&quarters),
            vec![("2003 Q4".to_string(), 25.0), ("2004 Q1".to_string(), 10.0)]
        );
    }

    #[test]
    fn test_range_scenario() {
        let data = table(vec![sales_column_of(&[10.0, 20.0, 30.0])]);

        let (range, sums) = sum_by_range(&data).unwrap();
        assert_eq!(range.min, 10.0);
        assert_eq!(range.max, 30.0);
        assert!((range.low - 16.6667).abs() < 1e-3);
        assert!((range.high - 23.3333).abs() < 1e-3);
        assert_eq!(sums, [10.0, 20.0, 30.0]);

        let result = compute_report(&data, ReportKind::ByRange).unwrap();
        let labels: Vec<String> = result.rows.iter().map(|r| r[0].display_value()).collect();
        assert_eq!(labels, vec!["Low Range", "Middle Range", "High Range"]);

        // High bucket shows the true maximum, Middle starts one cent above Low
        assert_eq!(result.rows[2][3], CellValue::Number(30.0));
        let middle_min = result.rows[1][2].as_number().unwrap();
        assert!((middle_min - (range.low + 0.01)).abs() < 1e-9);
    }

    #[test]
    fn test_threshold_values_fall_into_lower_bucket() {
        // min 0, max 3: thresholds are exactly 1 and 2
        let range = SalesRange::from_values([0.0, 3.0]).unwrap();
        assert_eq!(range.classify(1.0), RangeCategory::Low);
        assert_eq!(range.classify(2.0), RangeCategory::Middle);
        assert_eq!(range.classify(2.0001), RangeCategory::High);
    }

    #[test]
    fn test_equal_sales_collapse_into_low_range() {
        let data = table(vec![sales_column_of(&[42.0, 42.0, 42.0])]);
        let (_, sums) = sum_by_range(&data).unwrap();
        assert_eq!(sums, [126.0, 0.0, 0.0]);

        let result = compute_report(&data, ReportKind::ByRange).unwrap();
        assert_eq!(result.rows.len(), 3);
        assert_eq!(result.rows[1][1], CellValue::Number(0.0));
    }

    #[test]
    fn test_range_requires_numeric_sales() {
        let data = table(vec![Column::new(
            schema::SALES,
            ColumnType::Number,
            vec![CellValue::Empty, CellValue::Empty],
        )]);

        assert_eq!(
            compute_report(&data, ReportKind::ByRange),
            Err(ReportError::EmptyDataset)
        );
        // other reports degrade instead of failing
        let total = compute_report(&data, ReportKind::TotalSummary).unwrap();
        assert_eq!(total.rows[0][1], CellValue::Number(0.0));
    }

    #[test]
    fn test_missing_key_column() {
        let data = table(vec![sales_column_of(&[1.0])]);
        assert_eq!(
            compute_report(&data, ReportKind::ByCountry),
            Err(ReportError::MissingColumn("COUNTRY".to_string()))
        );
    }

    #[test]
    fn test_total_summary_row() {
        let data = table(vec![sales_column_of(&[1.5, 2.5])]);
        let result = compute_report(&data, ReportKind::TotalSummary).unwrap();
        assert_eq!(result.role, TableRole::GrandTotal);
        assert_eq!(
            result.rows,
            vec![vec![CellValue::Text("Total Sales".to_string()), CellValue::Number(4.0)]]
        );
    }
}
