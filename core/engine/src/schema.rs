//! FILENAME: core/engine/src/schema.rs
//! PURPOSE: Column names of a sales export.
//! CONTEXT: Required headers are matched case-insensitively by the loader and
//! renamed to the canonical spellings below; Month and Quarter are derived.

pub const ORDERDATE: &str = "ORDERDATE";
pub const PRODUCTLINE: &str = "PRODUCTLINE";
pub const SALES: &str = "SALES";
pub const CUSTOMERNAME: &str = "CUSTOMERNAME";
pub const COUNTRY: &str = "COUNTRY";

/// Derived from ORDERDATE by the loader.
pub const MONTH: &str = "Month";
pub const QUARTER: &str = "Quarter";

pub const REQUIRED_COLUMNS: [&str; 5] = [ORDERDATE, PRODUCTLINE, SALES, CUSTOMERNAME, COUNTRY];

/// Returns the canonical spelling of a required column, if `header`
/// names one (ignoring case and surrounding whitespace).
pub fn canonical_name(header: &str) -> Option<&'static str> {
    let trimmed = header.trim();
    REQUIRED_COLUMNS
        .iter()
        .copied()
        .find(|name| name.eq_ignore_ascii_case(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_ignore_case_and_whitespace() {
        assert_eq!(canonical_name(" sales "), Some(SALES));
        assert_eq!(canonical_name("OrderDate"), Some(ORDERDATE));
        assert_eq!(canonical_name("STATUS"), None);
    }
}
