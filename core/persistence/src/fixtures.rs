//! FILENAME: core/persistence/src/fixtures.rs
//! Report books shared by the renderer tests.

use engine::{CellValue, NamedResultTable, ReportBook, ResultColumn, TableRole};

fn text(s: &str) -> CellValue {
    CellValue::Text(s.to_string())
}

pub fn products_table() -> NamedResultTable {
    NamedResultTable {
        title: "Top Products".to_string(),
        role: TableRole::Breakdown,
        columns: vec![ResultColumn::text("PRODUCTLINE"), ResultColumn::currency("SALES")],
        rows: vec![
            vec![text("Classic Cars"), CellValue::Number(3919615.66)],
            vec![text("Vintage Cars"), CellValue::Number(1903150.84)],
        ],
    }
}

pub fn range_table() -> NamedResultTable {
    NamedResultTable {
        title: "Sales by Range".to_string(),
        role: TableRole::Breakdown,
        columns: vec![
            ResultColumn::text("Range Category"),
            ResultColumn::currency("SALES"),
            ResultColumn::currency("Minimum sale value"),
            ResultColumn::currency("Maximum sale value"),
        ],
        rows: vec![
            vec![
                text("Low Range"),
                CellValue::Number(10.0),
                CellValue::Number(10.0),
                CellValue::Number(16.67),
            ],
            vec![
                text("Middle Range"),
                CellValue::Number(20.0),
                CellValue::Number(16.68),
                CellValue::Number(23.33),
            ],
        ],
    }
}

pub fn total_table(total: f64) -> NamedResultTable {
    NamedResultTable {
        title: "Total Sales Summary".to_string(),
        role: TableRole::GrandTotal,
        columns: vec![ResultColumn::text("Metric"), ResultColumn::currency("SALES")],
        rows: vec![vec![text("Total Sales"), CellValue::Number(total)]],
    }
}

pub fn empty_breakdown(title: &str) -> NamedResultTable {
    NamedResultTable {
        title: title.to_string(),
        role: TableRole::Breakdown,
        columns: vec![ResultColumn::text("Month"), ResultColumn::currency("SALES")],
        rows: Vec::new(),
    }
}

/// Products, then the grand total, then the range breakdown.
pub fn sample_book() -> ReportBook {
    let total = 5822766.5;
    ReportBook {
        tables: vec![products_table(), total_table(total), range_table()],
        grand_total: Some(total),
    }
}
