//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for report generator integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const SAMPLE_HEADER: &str =
    "ORDERNUMBER,QUANTITYORDERED,SALES,ORDERDATE,STATUS,PRODUCTLINE,CUSTOMERNAME,COUNTRY";

/// (ORDERDATE, PRODUCTLINE, SALES, CUSTOMERNAME, COUNTRY)
pub const SAMPLE_ROWS: [(&str, &str, f64, &str, &str); 8] = [
    ("2/24/2003 0:00", "Motorcycles", 2871.00, "Land of Toys Inc.", "USA"),
    ("5/7/2003 0:00", "Classic Cars", 3884.34, "Reims Collectables", "France"),
    ("7/1/2003 0:00", "Motorcycles", 2765.90, "Lyon Souveniers", "France"),
    ("8/25/2003 0:00", "Ships", 3746.70, "Toys4GrownUps.com", "USA"),
    ("10/10/2003 0:00", "Classic Cars", 5205.27, "Corporate Gift Ideas Co.", "USA"),
    ("10/28/2003 0:00", "Trains", 3479.76, "Technics Stores Inc.", "Norway"),
    ("11/11/2003 0:00", "Vintage Cars", 2497.77, "Dragon Souveniers, Ltd.", "Singapore"),
    ("1/15/2004 0:00", "Classic Cars", 5512.32, "Reims Collectables", "France"),
];

/// Scratch directory holding input files and an output folder.
pub struct TestHarness {
    pub dir: TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        TestHarness {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Sum of SALES over the sample rows.
    pub fn sample_total() -> f64 {
        SAMPLE_ROWS.iter().map(|row| row.2).sum()
    }

    /// The sample rows as comma-separated text with the full header.
    pub fn sample_csv_text() -> String {
        let mut text = String::from(SAMPLE_HEADER);
        text.push('\n');
        for (i, (date, product, sales, customer, country)) in SAMPLE_ROWS.iter().enumerate() {
            text.push_str(&format!(
                "{},{},{:.2},{},Shipped,{},\"{}\",{}\n",
                10100 + i,
                20 + i,
                sales,
                date,
                product,
                customer,
                country
            ));
        }
        text
    }

    pub fn write_input(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).expect("write input");
        path
    }

    pub fn sample_csv(&self) -> PathBuf {
        self.write_input("sales_data_sample.csv", &Self::sample_csv_text())
    }

    /// The sample with one column removed.
    pub fn csv_without(&self, column: &str) -> PathBuf {
        let text = Self::sample_csv_text();
        let mut lines = text.lines();
        let header: Vec<&str> = lines.next().unwrap_or_default().split(',').collect();
        let skip = header.iter().position(|h| *h == column);

        let mut out = String::new();
        let keep = |fields: Vec<&str>| -> String {
            fields
                .into_iter()
                .enumerate()
                .filter(|(i, _)| Some(*i) != skip)
                .map(|(_, f)| f)
                .collect::<Vec<_>>()
                .join(",")
        };
        out.push_str(&keep(header.clone()));
        out.push('\n');
        for line in lines {
            // quoted customer names may contain commas; only drop the column
            // by index when the row splits cleanly
            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() == header.len() {
                out.push_str(&keep(fields));
                out.push('\n');
            }
        }
        self.write_input("missing_column.csv", &out)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    pub fn settings_path(&self) -> PathBuf {
        self.dir.path().join("settings.json")
    }

    /// File names currently in the output folder, sorted.
    pub fn output_files(&self) -> Vec<String> {
        list_files(&self.output_dir())
    }
}

pub fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}
