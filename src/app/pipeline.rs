//! The batch pipeline.
//!
//! discover -> parse (parallel, per file) -> aggregate weekly/monthly ->
//! project -> summarize
//!
//! A `Pipeline` owns its configuration; every stage returns a fresh
//! collection that the next stage borrows. Nothing is shared between runs.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, FixedOffset};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::aggregate::{aggregate_by_month, aggregate_by_week};
use crate::domain::{
    CanonicalRecord, MonthlyBucket, Pharmacy, PharmacySummary, PipelineConfig, Snapshot, WeeklyBucket,
};
use crate::error::AppError;
use crate::io::discovery::{SourceFile, SourceFormat, discover};
use crate::io::ingest::RawTable;
use crate::projection::project;
use crate::report::generate_summary;

/// A source file that contributed no records because it could not be parsed.
#[derive(Debug, Clone)]
pub struct FileFailure {
    pub path: PathBuf,
    pub pharmacy: Pharmacy,
    pub message: String,
}

/// What happened during ingest.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub files_found: usize,
    pub files_parsed: usize,
    pub file_failures: Vec<FileFailure>,
    /// Files skipped for their format (neither CSV nor a workbook).
    pub files_unsupported: usize,
    pub rows_read: usize,
    /// Rows the CSV reader could not decode.
    pub row_errors: usize,
    pub records: usize,
}

/// Per-file result of the parse stage.
#[derive(Debug)]
struct FileOutcome {
    records: Vec<CanonicalRecord>,
    rows_read: usize,
    row_errors: usize,
    failure: Option<FileFailure>,
}

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestReport,
    pub records: Vec<CanonicalRecord>,
    pub weekly: Vec<WeeklyBucket>,
    pub monthly: Vec<MonthlyBucket>,
    pub projections: Vec<WeeklyBucket>,
    pub summary: BTreeMap<Pharmacy, PharmacySummary>,
}

impl RunOutput {
    /// Build the export document: historical weeks first, then projections.
    pub fn snapshot(&self, last_updated: DateTime<FixedOffset>) -> Snapshot {
        let mut weekly_data = Vec::with_capacity(self.weekly.len() + self.projections.len());
        weekly_data.extend(self.weekly.iter().cloned());
        weekly_data.extend(self.projections.iter().cloned());

        Snapshot {
            weekly_data,
            monthly_data: self.monthly.clone(),
            summary: self.summary.clone(),
            last_updated,
        }
    }
}

pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Discover and parse every export under the data root, then process.
    ///
    /// Only an unreadable data root is an error; bad files are reported in
    /// `RunOutput::ingest` and skipped.
    pub fn run(&self) -> Result<RunOutput, AppError> {
        let discovery = discover(&self.config.data_root, &self.config.week_labels)?;
        info!(
            root = %self.config.data_root.display(),
            files = discovery.files.len(),
            unsupported = discovery.unsupported.len(),
            "discovered source files"
        );

        let (records, mut ingest) = ingest_files(&discovery.files);
        ingest.files_unsupported = discovery.unsupported.len();

        Ok(self.process(records, ingest))
    }

    /// Run the aggregation, projection and summary stages on parsed records.
    pub fn process(&self, records: Vec<CanonicalRecord>, ingest: IngestReport) -> RunOutput {
        let weekly = aggregate_by_week(&records);
        let monthly = aggregate_by_month(&records);
        info!(
            records = records.len(),
            weekly = weekly.len(),
            monthly = monthly.len(),
            "aggregated records"
        );

        let projections = project(&weekly, self.config.horizon);
        info!(projections = projections.len(), horizon = self.config.horizon, "projected series");

        let summary = generate_summary(&weekly, self.config.top_k);

        RunOutput {
            ingest,
            records,
            weekly,
            monthly,
            projections,
            summary,
        }
    }
}

/// Parse every file (in parallel) and merge the records in file order.
pub fn ingest_files(files: &[SourceFile]) -> (Vec<CanonicalRecord>, IngestReport) {
    let outcomes: Vec<FileOutcome> = files.par_iter().map(ingest_file).collect();

    let mut report = IngestReport {
        files_found: files.len(),
        ..IngestReport::default()
    };
    let mut records = Vec::new();

    for outcome in outcomes {
        report.rows_read += outcome.rows_read;
        report.row_errors += outcome.row_errors;
        match outcome.failure {
            Some(failure) => report.file_failures.push(failure),
            None => report.files_parsed += 1,
        }
        records.extend(outcome.records);
    }
    report.records = records.len();

    (records, report)
}

fn ingest_file(file: &SourceFile) -> FileOutcome {
    let table = match file.format {
        SourceFormat::Csv => RawTable::from_path(&file.path),
        SourceFormat::Workbook => RawTable::from_workbook(&file.path),
    };
    let parsed = table.and_then(|table| {
        let records = file.pharmacy.parser().parse(&table, file.period_start)?;
        Ok((table, records))
    });

    match parsed {
        Ok((table, records)) => {
            if !table.row_errors().is_empty() {
                warn!(
                    file = %file.path.display(),
                    row_errors = table.row_errors().len(),
                    "skipped undecodable rows"
                );
            }
            FileOutcome {
                rows_read: table.rows().len() + table.row_errors().len(),
                row_errors: table.row_errors().len(),
                records,
                failure: None,
            }
        }
        Err(e) => {
            warn!(
                file = %file.path.display(),
                pharmacy = %file.pharmacy,
                error = %e,
                "failed to process source file, skipping"
            );
            FileOutcome {
                records: Vec::new(),
                rows_read: 0,
                row_errors: 0,
                failure: Some(FileFailure {
                    path: file.path.clone(),
                    pharmacy: file.pharmacy,
                    message: e.to_string(),
                }),
            }
        }
    }
}
