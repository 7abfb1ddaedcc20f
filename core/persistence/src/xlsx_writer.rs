//! FILENAME: core/persistence/src/xlsx_writer.rs

use crate::render::ReportRenderer;
use crate::PersistenceError;
use engine::{CellValue, ColumnFormat, CurrencyFormat, NamedResultTable, ReportBook, TableRole};
use rust_xlsxwriter::{Chart, ChartType, Format, Workbook as XlsxWorkbook, Worksheet};

/// Sheet name used for the grand total.
pub const SUMMARY_SHEET_NAME: &str = "Summary";
const COLUMN_WIDTH: f64 = 30.0;
const MAX_SHEET_NAME_LEN: usize = 31;
const Y_AXIS_TITLE: &str = "Sales";

/// Writes one sheet per result table, each breakdown with a column chart.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxRenderer;

impl ReportRenderer for XlsxRenderer {
    fn render(&self, book: &ReportBook) -> Result<Vec<u8>, PersistenceError> {
        let mut xlsx = XlsxWorkbook::new();
        let header_format = Format::new().set_bold();
        let currency_format = Format::new().set_num_format(CurrencyFormat::sales().excel_format());

        for table in &book.tables {
            let worksheet = xlsx.add_worksheet();
            match table.role {
                TableRole::GrandTotal => {
                    let total = book.grand_total.unwrap_or_else(|| table_total(table));
                    write_summary_sheet(worksheet, total, &header_format, &currency_format)?;
                }
                TableRole::Breakdown => {
                    write_breakdown_sheet(worksheet, table, &header_format, &currency_format)?;
                }
            }
        }

        log::debug!(target: "RENDER", "workbook with {} sheet(s)", book.tables.len());
        Ok(xlsx.save_to_buffer()?)
    }
}

fn write_summary_sheet(
    worksheet: &mut Worksheet,
    total: f64,
    header_format: &Format,
    currency_format: &Format,
) -> Result<(), PersistenceError> {
    worksheet.set_name(SUMMARY_SHEET_NAME)?;
    worksheet.set_column_width(0, COLUMN_WIDTH)?;
    worksheet.set_column_width(1, COLUMN_WIDTH)?;
    worksheet.write_string_with_format(0, 0, "Total Sales", header_format)?;
    worksheet.write_number_with_format(0, 1, total, currency_format)?;
    Ok(())
}

fn write_breakdown_sheet(
    worksheet: &mut Worksheet,
    table: &NamedResultTable,
    header_format: &Format,
    currency_format: &Format,
) -> Result<(), PersistenceError> {
    let sheet_name = sheet_name(&table.title);
    worksheet.set_name(&sheet_name)?;

    for (col, column) in table.columns.iter().enumerate() {
        let col = col as u16;
        worksheet.set_column_width(col, COLUMN_WIDTH)?;
        worksheet.write_string_with_format(0, col, &column.name, header_format)?;
    }

    for (index, row) in table.rows.iter().enumerate() {
        let row_num = index as u32 + 1;
        for (col, value) in row.iter().enumerate() {
            let format = match table.columns.get(col).map(|c| c.format) {
                Some(ColumnFormat::Currency) => Some(currency_format),
                _ => None,
            };
            write_value(worksheet, row_num, col as u16, value, format)?;
        }
    }

    if table.has_chart() {
        let last_row = table.rows.len() as u32;
        let mut chart = Chart::new(ChartType::Column);
        chart
            .add_series()
            .set_name((sheet_name.as_str(), 0, 1))
            .set_categories((sheet_name.as_str(), 1, 0, last_row, 0))
            .set_values((sheet_name.as_str(), 1, 1, last_row, 1));
        chart.title().set_name(&table.title);
        chart.x_axis().set_name(&table.columns[0].name);
        chart.y_axis().set_name(Y_AXIS_TITLE);
        chart.legend().set_hidden();
        // E2
        worksheet.insert_chart(1, 4, &chart)?;
    }

    Ok(())
}

fn write_value(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    format: Option<&Format>,
) -> Result<(), PersistenceError> {
    match (value, format) {
        (CellValue::Empty, _) => {}
        (CellValue::Number(n), Some(fmt)) => {
            worksheet.write_number_with_format(row, col, *n, fmt)?;
        }
        (CellValue::Number(n), None) => {
            worksheet.write_number(row, col, *n)?;
        }
        (CellValue::Boolean(b), _) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        (other, _) => {
            worksheet.write_string(row, col, other.display_value())?;
        }
    }
    Ok(())
}

fn table_total(table: &NamedResultTable) -> f64 {
    table
        .rows
        .first()
        .and_then(|row| row.get(1))
        .and_then(CellValue::as_number)
        .unwrap_or(0.0)
}

/// Worksheet names are limited to 31 characters and may not contain `[]:*?/\`.
fn sheet_name(title: &str) -> String {
    title
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c => c,
        })
        .take(MAX_SHEET_NAME_LEN)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use calamine::{Data, DataType, Reader, Xlsx};
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn read_back(bytes: Vec<u8>) -> Xlsx<Cursor<Vec<u8>>> {
        Xlsx::new(Cursor::new(bytes)).unwrap()
    }

    fn chart_parts(bytes: Vec<u8>) -> Vec<String> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<String> = archive
            .file_names()
            .filter(|name| name.starts_with("xl/charts/chart") && name.ends_with(".xml"))
            .map(String::from)
            .collect();
        let mut parts: Vec<String> = Vec::new();
        for name in names {
            let mut xml = String::new();
            archive.by_name(&name).unwrap().read_to_string(&mut xml).unwrap();
            parts.push(xml);
        }
        parts
    }

    #[test]
    fn test_sheets_follow_request_order() {
        let bytes = XlsxRenderer.render(&fixtures::sample_book()).unwrap();
        let workbook = read_back(bytes);
        assert_eq!(
            workbook.sheet_names(),
            vec!["Top Products", "Summary", "Sales by Range"]
        );
    }

    #[test]
    fn test_breakdown_sheet_has_header_and_rows() {
        let bytes = XlsxRenderer.render(&fixtures::sample_book()).unwrap();
        let mut workbook = read_back(bytes);
        let range = workbook.worksheet_range("Top Products").unwrap();

        assert_eq!(range.get((0, 0)), Some(&Data::String("PRODUCTLINE".to_string())));
        assert_eq!(range.get((0, 1)), Some(&Data::String("SALES".to_string())));
        assert_eq!(range.get((1, 0)), Some(&Data::String("Classic Cars".to_string())));
        assert_eq!(range.get((2, 1)).and_then(|c| c.as_f64()), Some(1903150.84));
    }

    #[test]
    fn test_summary_sheet_holds_only_the_total() {
        let bytes = XlsxRenderer.render(&fixtures::sample_book()).unwrap();
        let mut workbook = read_back(bytes);
        let range = workbook.worksheet_range(SUMMARY_SHEET_NAME).unwrap();

        assert_eq!(range.get_size(), (1, 2));
        assert_eq!(range.get((0, 0)), Some(&Data::String("Total Sales".to_string())));
        assert_eq!(range.get((0, 1)).and_then(|c| c.as_f64()), Some(5822766.5));
    }

    #[test]
    fn test_empty_breakdown_still_gets_a_sheet() {
        let book = ReportBook {
            tables: vec![fixtures::empty_breakdown("Sales by Month")],
            grand_total: None,
        };
        let bytes = XlsxRenderer.render(&book).unwrap();
        let mut workbook = read_back(bytes);
        let range = workbook.worksheet_range("Sales by Month").unwrap();
        assert_eq!(range.get_size(), (1, 2));
    }

    #[test]
    fn test_one_chart_per_non_empty_breakdown() {
        let book = fixtures::sample_book();
        let expected = book.tables.iter().filter(|t| t.has_chart()).count();
        assert_eq!(expected, 2);

        let bytes = XlsxRenderer.render(&book).unwrap();
        assert_eq!(chart_parts(bytes).len(), expected);
    }

    #[test]
    fn test_empty_breakdown_has_no_chart() {
        let book = ReportBook {
            tables: vec![fixtures::empty_breakdown("Sales by Month"), fixtures::products_table()],
            grand_total: None,
        };
        let bytes = XlsxRenderer.render(&book).unwrap();
        assert_eq!(chart_parts(bytes).len(), 1);
    }

    #[test]
    fn test_chart_series_is_named_after_the_value_header() {
        let book = ReportBook {
            tables: vec![fixtures::products_table()],
            grand_total: None,
        };
        let charts = chart_parts(XlsxRenderer.render(&book).unwrap());
        assert_eq!(charts.len(), 1);

        let xml = &charts[0];
        assert!(xml.contains("<c:tx>"));
        assert!(xml.contains("'Top Products'!$B$1"));
        assert!(xml.contains("'Top Products'!$B$2:$B$3"));
    }

    #[test]
    fn test_sheet_name_is_sanitized() {
        assert_eq!(sheet_name("Sales: a/b"), "Sales_ a_b");
        assert_eq!(sheet_name(&"x".repeat(40)).len(), 31);
    }
}
