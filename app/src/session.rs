//! FILENAME: app/src/session.rs
// PURPOSE: Remembers the last run's parameters between invocations.
// CONTEXT: Stored as JSON (default `settings.json` in the working directory).
// A missing or unreadable file is never an error; the session just starts empty.

use crate::GenerateRequest;
use crate::{log_debug, log_warn};
use persistence::{OutputFormat, PersistenceError};
use report_engine::{ReportKind, ReportRequest};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub last_input: String,
    pub last_output: String,
    pub last_format: String,
    /// Report titles as shown to the user, e.g. "Top Products".
    pub last_options: Vec<String>,
}

impl SessionSettings {
    /// Reads the session file. Missing or corrupt files yield an empty session.
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                log_debug!("SESSION", "no session at {}: {}", path.display(), e);
                return SessionSettings::default();
            }
        };

        match serde_json::from_str(&text) {
            Ok(settings) => settings,
            Err(e) => {
                log_warn!("SESSION", "ignoring corrupt session file {}: {}", path.display(), e);
                SessionSettings::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::from)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        persistence::write_atomically(path, json.as_bytes())?;
        Ok(())
    }

    pub fn from_request(request: &GenerateRequest) -> Self {
        SessionSettings {
            last_input: request.input_path.display().to_string(),
            last_output: request.output_folder.display().to_string(),
            last_format: request.format.extension().to_string(),
            last_options: request
                .reports
                .kinds()
                .iter()
                .map(|kind| kind.title().to_string())
                .collect(),
        }
    }

    pub fn input_path(&self) -> Option<PathBuf> {
        non_empty(&self.last_input).map(PathBuf::from)
    }

    pub fn output_folder(&self) -> Option<PathBuf> {
        non_empty(&self.last_output).map(PathBuf::from)
    }

    /// The remembered format; an unrecognised value counts as absent.
    pub fn format(&self) -> Option<OutputFormat> {
        non_empty(&self.last_format).and_then(|f| f.parse().ok())
    }

    /// Remembered reports in their saved order. Unknown names are skipped.
    pub fn reports(&self) -> ReportRequest {
        let mut request = ReportRequest::default();
        for name in &self.last_options {
            match name.parse::<ReportKind>() {
                Ok(kind) => request.push(kind),
                Err(e) => log_warn!("SESSION", "skipping saved report: {}", e),
            }
        }
        request
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
