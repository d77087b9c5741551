//! Source file discovery.
//!
//! Expected layout:
//!
//! ```text
//! <root>/<month>/<week label>/<pharmacy>/<export>.{csv,xlsx,xls}
//! ```
//!
//! e.g. `data/December/Week of 12-1/TPH/orders.csv`. The week label is turned
//! into the record `period_start` by a `WeekLabelRule`; everything that does
//! not fit the layout is skipped and logged, never fatal. Only an unreadable
//! root stops the run.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::domain::Pharmacy;
use crate::error::AppError;
use crate::io::labels::WeekLabelRule;

/// On-disk format of an export file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    /// Excel workbook; only the first sheet is read.
    Workbook,
}

impl SourceFormat {
    /// Format implied by the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(SourceFormat::Csv),
            "xlsx" | "xls" => Some(SourceFormat::Workbook),
            _ => None,
        }
    }
}

/// One export file with its resolved ingestion context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub pharmacy: Pharmacy,
    pub period_start: NaiveDate,
    pub path: PathBuf,
    pub format: SourceFormat,
}

/// Discovery output: readable exports plus files we cannot read.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub files: Vec<SourceFile>,
    /// Files inside pharmacy folders with an unsupported extension.
    pub unsupported: Vec<PathBuf>,
}

/// Walk `root` and list every export file, sorted by path.
pub fn discover(root: &Path, rule: &WeekLabelRule) -> Result<Discovery, AppError> {
    let months = sorted_entries(root).map_err(|e| {
        AppError::new(2, format!("Failed to read data root '{}': {e}", root.display()))
    })?;

    let mut out = Discovery::default();

    for month_dir in months.into_iter().filter(|p| p.is_dir()) {
        for week_dir in list_dirs(&month_dir) {
            let label = file_name(&week_dir);
            let Some(period_start) = rule.resolve(&label) else {
                debug!(dir = %week_dir.display(), "week label has no date, skipping");
                continue;
            };

            for pharmacy_dir in list_dirs(&week_dir) {
                let Some(pharmacy) = Pharmacy::from_name(&file_name(&pharmacy_dir)) else {
                    debug!(dir = %pharmacy_dir.display(), "unknown pharmacy folder, skipping");
                    continue;
                };

                for path in list_files(&pharmacy_dir) {
                    match SourceFormat::from_path(&path) {
                        Some(format) => out.files.push(SourceFile {
                            pharmacy,
                            period_start,
                            path,
                            format,
                        }),
                        None => {
                            warn!(file = %path.display(), "unsupported export format, skipping");
                            out.unsupported.push(path);
                        }
                    }
                }
            }
        }
    }

    Ok(out)
}

fn sorted_entries(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut paths = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect::<Vec<_>>();
    paths.sort();
    Ok(paths)
}

fn list_dirs(dir: &Path) -> Vec<PathBuf> {
    list(dir).into_iter().filter(|p| p.is_dir()).collect()
}

fn list_files(dir: &Path) -> Vec<PathBuf> {
    list(dir)
        .into_iter()
        .filter(|p| p.is_file() && !is_hidden(p))
        .collect()
}

fn list(dir: &Path) -> Vec<PathBuf> {
    match sorted_entries(dir) {
        Ok(paths) => paths,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "failed to list directory, skipping");
            Vec::new()
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn is_hidden(path: &Path) -> bool {
    file_name(path).starts_with('.')
}
