//! FILENAME: core/persistence/src/sniffer.rs
//! Delimiter sniffing for delimited text inputs.
//!
//! Only the first line is examined; header and data rows are assumed to share
//! one separator.

use crate::PersistenceError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Candidate separators, in tie-break order.
pub const CANDIDATE_DELIMITERS: [u8; 3] = [b'\t', b',', b'|'];

/// Picks the candidate that occurs most often in `first_line`.
/// Ties go to the earliest candidate; `None` when no candidate occurs.
pub fn sniff_delimiter(first_line: &str) -> Option<u8> {
    let mut best: Option<(u8, usize)> = None;

    for &candidate in &CANDIDATE_DELIMITERS {
        let count = first_line.bytes().filter(|&b| b == candidate).count();
        if count == 0 {
            continue;
        }
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((candidate, count)),
        }
    }

    best.map(|(delimiter, _)| delimiter)
}

/// Reads the first line of `path` and sniffs its separator.
pub fn sniff_file(path: &Path) -> Result<u8, PersistenceError> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut first_line = Vec::new();
    reader.read_until(b'\n', &mut first_line)?;

    if first_line.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(PersistenceError::EmptyInput(path.to_path_buf()));
    }

    // Separators are ASCII, so a lossy decode is enough for counting
    let line = String::from_utf8_lossy(&first_line);
    let delimiter = sniff_delimiter(line.trim_end_matches(['\r', '\n']))
        .ok_or_else(|| PersistenceError::DelimiterUnresolved {
            path: path.to_path_buf(),
        })?;

    log::debug!(
        target: "LOAD",
        "sniffed delimiter {:?} for {}",
        delimiter as char,
        path.display()
    );
    Ok(delimiter)
}
