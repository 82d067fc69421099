//! CSV output of a run's history.
use std::env;
use std::fs::{create_dir_all, File};
use std::path::{Path, PathBuf};

use csv::Writer;
use log::{info, trace};

use crate::error::EpiError;
use crate::history::History;

const REPORT_NAME: &str = "history";

/// Where and how reports are written. The file lands at
/// `<directory>/<file_prefix>history.csv`.
#[derive(Clone, Debug)]
pub struct ReportOptions {
    pub directory: PathBuf,
    pub file_prefix: String,
    pub overwrite: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            directory: env::current_dir().unwrap_or_default(),
            file_prefix: String::new(),
            overwrite: false,
        }
    }
}

impl ReportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn directory(&mut self, directory: PathBuf) -> &mut Self {
        self.directory = directory;
        self
    }

    pub fn file_prefix(&mut self, file_prefix: String) -> &mut Self {
        self.file_prefix = file_prefix;
        self
    }

    pub fn overwrite(&mut self, overwrite: bool) -> &mut Self {
        self.overwrite = overwrite;
        self
    }

    pub fn path(&self) -> PathBuf {
        self.directory
            .join(format!("{}{REPORT_NAME}.csv", self.file_prefix))
    }
}

// Creates the report file and any missing parent directories. An existing file is only
// replaced when `overwrite` is set.
fn create_report_file(path: &Path, overwrite: bool) -> Result<File, EpiError> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    if path.exists() && !overwrite {
        return Err(EpiError::ReportError(format!(
            "{} already exists; pass --force-overwrite to replace it",
            path.display()
        )));
    }
    Ok(File::create(path)?)
}

/// Writes one CSV row per recorded tick. Returns the path written.
///
/// # Errors
/// Returns an error if the file exists and `overwrite` is off, or on any I/O failure.
pub fn write_history(history: &History, options: &ReportOptions) -> Result<PathBuf, EpiError> {
    let path = options.path();
    trace!("writing history report to {}", path.display());
    let file = create_report_file(&path, options.overwrite)?;
    let mut writer = Writer::from_writer(file);
    for row in history.rows() {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!("wrote {} rows to {}", history.len(), path.display());
    Ok(path)
}
