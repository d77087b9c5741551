//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - initializes logging
//! - runs the pipeline and writes the snapshot
//! - serves snapshot views as JSON on stdout

use chrono::Local;
use clap::Parser;
use serde::Serialize;
use tracing::info;

use crate::cli::{Command, ProcessArgs, ShowArgs, View};
use crate::domain::PipelineConfig;
use crate::error::AppError;
use crate::io::labels::WeekLabelRule;
use crate::query;

pub mod pipeline;

/// Entry point for the `rxp` binary.
pub fn run() -> Result<(), AppError> {
    // Environment fallbacks for clap must be in place before parsing.
    dotenvy::dotenv().ok();
    let cli = crate::cli::Cli::parse();
    crate::logging::init_logging(cli.log_json);

    match cli.command {
        Command::Process(args) => handle_process(args),
        Command::Show(args) => handle_show(args),
    }
}

fn handle_process(args: ProcessArgs) -> Result<(), AppError> {
    let config = pipeline_config_from_args(&args);
    let pipeline = pipeline::Pipeline::new(config);
    let run = pipeline.run()?;

    let snapshot = run.snapshot(Local::now().fixed_offset());
    crate::io::export::write_snapshot(&pipeline.config().output, &snapshot)?;
    info!(path = %pipeline.config().output.display(), "snapshot written");

    if !args.quiet {
        println!("{}", crate::report::format_run_summary(&run, pipeline.config()));
    }
    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let path = &args.snapshot;
    let load = || query::load_snapshot(path);

    match &args.view {
        View::Health => print_json(&query::health(path)),
        View::All => print_json(&load()?),
        View::Pharmacies => print_json(&query::pharmacies(&load()?)),
        View::Pharmacy { name } => print_json(&query::pharmacy_view(&load()?, name)),
        View::Sku { pharmacy, sku } => print_json(&query::product_view(&load()?, pharmacy, sku)),
        View::Summary => print_json(query::summary(&load()?)),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::new(2, format!("Failed to encode JSON: {e}")))?;
    println!("{text}");
    Ok(())
}

pub fn pipeline_config_from_args(args: &ProcessArgs) -> PipelineConfig {
    PipelineConfig {
        data_root: args.data_root.clone(),
        output: args.output.clone(),
        horizon: args.horizon,
        top_k: args.top,
        week_labels: WeekLabelRule {
            cutoff_month: args.cutoff_month,
            name_cutoff_month: args.name_cutoff_month,
            early_year: args.early_year,
            late_year: args.late_year,
        },
    }
}
