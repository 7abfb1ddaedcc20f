//! FILENAME: core/engine/src/number_format.rs
//! PURPOSE: Currency formatting for report amounts.
//! CONTEXT: Every renderer formats sales amounts through this module so the
//! workbook, flat table and document agree on the same text.

use serde::{Deserialize, Serialize};

/// A prefix-symbol currency format with a fixed number of decimals.
/// Negative amounts are shown in parentheses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyFormat {
    pub decimal_places: u8,
    pub symbol: String,
}

impl CurrencyFormat {
    /// The format used for every SALES-derived amount: `$1,234.50`.
    pub fn sales() -> Self {
        CurrencyFormat {
            decimal_places: 2,
            symbol: "$".to_string(),
        }
    }

    /// Spreadsheet number-format code, e.g. `"$"#,##0.00;("$"#,##0.00)`.
    pub fn excel_format(&self) -> String {
        let decimals = if self.decimal_places > 0 {
            format!(".{}", "0".repeat(self.decimal_places as usize))
        } else {
            String::new()
        };
        let positive = format!("\"{}\"#,##0{}", self.symbol, decimals);
        format!("{};({})", positive, positive)
    }

    /// Formats `value` as display text.
    pub fn format(&self, value: f64) -> String {
        let rounded = format!("{:.prec$}", value.abs(), prec = self.decimal_places as usize);
        let (integer, fraction) = match rounded.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (rounded.as_str(), None),
        };

        let mut text = self.symbol.clone();
        text.push_str(&group_thousands(integer));
        if let Some(fraction) = fraction {
            text.push('.');
            text.push_str(fraction);
        }

        // "-0.00" after rounding is still zero
        let nonzero = rounded.chars().any(|c| c.is_ascii_digit() && c != '0');
        if value < 0.0 && nonzero {
            format!("({})", text)
        } else {
            text
        }
    }
}

/// Inserts `,` every three digits from the right of an unsigned digit run.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
