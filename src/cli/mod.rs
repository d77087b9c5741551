//! Command-line parsing for the pharmacy projection tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the pipeline code. Every option can also come from the
//! environment (or a `.env` file).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::PipelineConfig;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "rxp", version, about = "Pharmacy inventory aggregation and projections")]
pub struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse all exports, aggregate, project, and write the snapshot.
    Process(ProcessArgs),
    /// Read views from an existing snapshot.
    Show(ShowArgs),
}

/// Options for a pipeline run.
#[derive(Debug, Args, Clone)]
pub struct ProcessArgs {
    /// Root folder holding `<month>/<week label>/<pharmacy>/` exports.
    #[arg(long, env = "RXP_DATA_ROOT", default_value = ".")]
    pub data_root: PathBuf,

    /// Snapshot JSON to write.
    #[arg(long, env = "RXP_OUTPUT", default_value = "backend/processed_data.json")]
    pub output: PathBuf,

    /// Weeks to project past the last observed week of each product.
    #[arg(long, env = "RXP_HORIZON", default_value_t = PipelineConfig::DEFAULT_HORIZON)]
    pub horizon: usize,

    /// Products listed per pharmacy in the summary.
    #[arg(long, env = "RXP_TOP_K", default_value_t = PipelineConfig::DEFAULT_TOP_K)]
    pub top: usize,

    /// Numeric week labels (`12-1`) with a month >= this belong to the early year.
    #[arg(long, env = "RXP_CUTOFF_MONTH", default_value_t = 9, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub cutoff_month: u32,

    /// Month-name week labels (`Feb 2nd`) with a month >= this belong to the early year.
    #[arg(long, env = "RXP_NAME_CUTOFF_MONTH", default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub name_cutoff_month: u32,

    /// Year for labels on or after the cutoff month.
    #[arg(long, env = "RXP_EARLY_YEAR", default_value_t = 2025)]
    pub early_year: i32,

    /// Year for labels before the cutoff month.
    #[arg(long, env = "RXP_LATE_YEAR", default_value_t = 2026)]
    pub late_year: i32,

    /// Skip printing the run summary.
    #[arg(long)]
    pub quiet: bool,
}

/// Options for reading the snapshot.
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Snapshot JSON produced by `rxp process`.
    #[arg(long, env = "RXP_OUTPUT", default_value = "backend/processed_data.json")]
    pub snapshot: PathBuf,

    #[command(subcommand)]
    pub view: View,
}

/// Snapshot views.
#[derive(Debug, Subcommand)]
pub enum View {
    /// The whole document.
    All,
    /// Pharmacy names with data.
    Pharmacies,
    /// Weekly, monthly and summary rows for one pharmacy.
    Pharmacy { name: String },
    /// Weekly rows for one product of one pharmacy.
    Sku { pharmacy: String, sku: String },
    /// Per-pharmacy summary statistics.
    Summary,
    /// Whether a snapshot is available.
    Health,
}
