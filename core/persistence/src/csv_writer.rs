//! FILENAME: core/persistence/src/csv_writer.rs

use crate::render::ReportRenderer;
use crate::PersistenceError;
use engine::{NamedResultTable, RawTable, ReportBook};

/// Writes only the first breakdown of the book. The grand total and any
/// further breakdowns are dropped because a flat file holds a single header row.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvRenderer;

impl ReportRenderer for CsvRenderer {
    fn render(&self, book: &ReportBook) -> Result<Vec<u8>, PersistenceError> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        if let Some(table) = book.breakdowns().next() {
            write_table(&mut writer, table)?;
            if book.tables.len() > 1 {
                log::warn!(
                    target: "RENDER",
                    "csv output keeps only '{}'; {} other report(s) dropped",
                    table.title,
                    book.tables.len() - 1
                );
            }
        }

        finish(writer)
    }
}

fn write_table(
    writer: &mut csv::Writer<Vec<u8>>,
    table: &NamedResultTable,
) -> Result<(), PersistenceError> {
    writer.write_record(table.headers())?;
    for row in table.display_rows() {
        writer.write_record(&row)?;
    }
    Ok(())
}

/// Serializes a loaded table as plain CSV, dates as `YYYY-MM-DD`.
pub fn table_to_csv(table: &RawTable) -> Result<Vec<u8>, PersistenceError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.headers())?;

    for index in 0..table.row_count() {
        let record: Vec<String> = table
            .columns()
            .iter()
            .map(|column| column.cells[index].display_value())
            .collect();
        writer.write_record(&record)?;
    }

    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, PersistenceError> {
    writer
        .into_inner()
        .map_err(|e| PersistenceError::Io(e.into_error()))
}
