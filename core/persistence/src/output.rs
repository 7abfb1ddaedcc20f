//! FILENAME: core/persistence/src/output.rs
//! Artifact placement: fixed file names inside the chosen output folder,
//! written through temp files so a failed run never leaves a partial file.

use crate::csv_writer::table_to_csv;
use crate::render::OutputFormat;
use crate::PersistenceError;
use engine::{RawTable, ReportBook};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const REPORT_FILE_STEM: &str = "sales_summary_report";
pub const CLEANED_DATA_FILE: &str = "cleaned_sales_data.csv";

// ============================================================================
// STAGED FILES
// ============================================================================

/// Bytes written to a temp file beside their final path, not yet visible
/// under that name. Dropping it removes the temp file.
#[derive(Debug)]
pub struct StagedFile {
    temp: NamedTempFile,
    path: PathBuf,
}

impl StagedFile {
    /// Writes `bytes` to a temp file in the directory of `path`, with the
    /// permissions `path` has or would get as a new file.
    pub fn stage(path: &Path, bytes: &[u8]) -> Result<Self, PersistenceError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = new_temp_file(dir)?;
        temp.write_all(bytes)?;
        keep_existing_permissions(&temp, path)?;
        temp.as_file().sync_all()?;

        Ok(StagedFile {
            temp,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Renames the temp file onto its final path.
    pub fn commit(self) -> Result<PathBuf, PersistenceError> {
        self.temp
            .persist(&self.path)
            .map_err(|e| PersistenceError::Io(e.error))?;
        Ok(self.path)
    }
}

/// New files get `0o666` less the process umask, like any created file.
#[cfg(unix)]
fn new_temp_file(dir: &Path) -> Result<NamedTempFile, PersistenceError> {
    use std::os::unix::fs::PermissionsExt;

    Ok(tempfile::Builder::new()
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)?)
}

#[cfg(not(unix))]
fn new_temp_file(dir: &Path) -> Result<NamedTempFile, PersistenceError> {
    Ok(NamedTempFile::new_in(dir)?)
}

/// An overwritten file keeps its mode.
fn keep_existing_permissions(temp: &NamedTempFile, path: &Path) -> Result<(), PersistenceError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => {
            temp.as_file().set_permissions(meta.permissions())?;
        }
        _ => {}
    }
    Ok(())
}

/// Writes `bytes` next to `path` and renames onto it. On error the temp file
/// is removed and `path` is untouched.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<PathBuf, PersistenceError> {
    StagedFile::stage(path, bytes)?.commit()
}

// ============================================================================
// REPORT RUN
// ============================================================================

/// Renders `book` and stores it as `<folder>/sales_summary_report.<ext>`,
/// creating the folder when needed. With `cleaned`, the loaded table is also
/// stored as `<folder>/cleaned_sales_data.csv`.
///
/// Both artifacts are rendered and staged before either is renamed into
/// place. If the second rename fails, the first artifact is removed again.
pub fn write_report(
    book: &ReportBook,
    format: OutputFormat,
    folder: &Path,
    cleaned: Option<&RawTable>,
) -> Result<PathBuf, PersistenceError> {
    let report_bytes = format.render(book)?;
    let cleaned_bytes = cleaned.map(table_to_csv).transpose()?;

    fs::create_dir_all(folder)?;
    let report_path = folder.join(format!("{}.{}", REPORT_FILE_STEM, format.extension()));
    let report = StagedFile::stage(&report_path, &report_bytes)?;
    let export = match &cleaned_bytes {
        Some(bytes) => Some(StagedFile::stage(&folder.join(CLEANED_DATA_FILE), bytes)?),
        None => None,
    };

    // the report goes last so its presence means the run completed
    let export_path = match export {
        Some(staged) => Some(staged.commit()?),
        None => None,
    };
    let path = match report.commit() {
        Ok(path) => path,
        Err(err) => {
            if let Some(export_path) = &export_path {
                if let Err(remove_err) = fs::remove_file(export_path) {
                    log::warn!(
                        target: "OUTPUT",
                        "could not remove {}: {}",
                        export_path.display(),
                        remove_err
                    );
                }
            }
            return Err(err);
        }
    };

    if let (Some(table), Some(export_path)) = (cleaned, &export_path) {
        log::info!(
            target: "OUTPUT",
            "exported {} cleaned row(s) to {}",
            table.row_count(),
            export_path.display()
        );
    }
    log::info!(
        target: "OUTPUT",
        "wrote {} report(s) as {} to {}",
        book.tables.len(),
        format,
        path.display()
    );
    Ok(path)
}
