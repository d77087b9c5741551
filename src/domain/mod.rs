//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the pharmacy identifier (`Pharmacy`)
//! - normalized line items (`CanonicalRecord`)
//! - aggregation outputs (`WeeklyBucket`, `MonthlyBucket`, `PharmacySummary`)
//! - the exported document (`Snapshot`) and run configuration (`PipelineConfig`)

pub mod types;

pub use types::*;
