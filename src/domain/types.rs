//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between pipeline stages in-memory
//! - exported to the snapshot JSON
//! - reloaded later by the query views

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::io::labels::WeekLabelRule;

/// Source system a record came from.
///
/// Each variant owns exactly one source schema (see `sources`). Adding a
/// pharmacy means adding a variant here and a parser for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Pharmacy {
    Belmar,
    Curexa,
    #[serde(rename = "TPH")]
    Tph,
}

impl Pharmacy {
    pub const ALL: [Pharmacy; 3] = [Pharmacy::Belmar, Pharmacy::Curexa, Pharmacy::Tph];

    /// Name used in folder layouts and exported documents.
    pub fn display_name(self) -> &'static str {
        match self {
            Pharmacy::Belmar => "Belmar",
            Pharmacy::Curexa => "Curexa",
            Pharmacy::Tph => "TPH",
        }
    }

    /// Resolve a folder (or query) name, ignoring case and surrounding whitespace.
    pub fn from_name(name: &str) -> Option<Pharmacy> {
        let name = name.trim();
        Pharmacy::ALL
            .into_iter()
            .find(|p| p.display_name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Pharmacy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One observed line item after normalization.
///
/// Every field is always populated: numeric fields are coerced to `0.0`
/// rather than left absent, and records without a key never get built.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRecord {
    pub pharmacy: Pharmacy,
    pub product_key: String,
    pub quantity: f64,
    pub amount: f64,
    /// Start of the reporting week the record was filed under (not the
    /// transaction date).
    pub period_start: NaiveDate,
}

/// Weekly bucket, historical or projected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyBucket {
    pub pharmacy: Pharmacy,
    #[serde(rename = "sku")]
    pub product_key: String,
    /// `%Y-W%U` of `week_start`.
    pub year_week: String,
    pub week_start: NaiveDate,
    pub quantity: f64,
    pub amount: f64,
    pub is_projection: bool,
}

/// Monthly bucket (historical only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    pub pharmacy: Pharmacy,
    #[serde(rename = "sku")]
    pub product_key: String,
    /// `%Y-%m` of the record's `period_start`.
    pub year_month: String,
    pub quantity: f64,
    pub amount: f64,
}

/// Per-pharmacy rollup served to dashboards.
///
/// Field names follow the existing dashboard contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PharmacySummary {
    /// Distinct product keys.
    pub total_skus: usize,
    pub total_quantity: f64,
    /// Sum of `amount` over all historical weekly buckets.
    pub total_revenue: f64,
    /// Mean of per-week quantity totals across observed weeks.
    pub avg_weekly_quantity: f64,
    /// Largest products by total quantity (descending, ties by key).
    pub top_skus: Vec<TopProduct>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopProduct {
    pub sku: String,
    pub quantity: f64,
}

/// The exported document of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Historical buckets followed by projected buckets.
    pub weekly_data: Vec<WeeklyBucket>,
    pub monthly_data: Vec<MonthlyBucket>,
    pub summary: BTreeMap<Pharmacy, PharmacySummary>,
    pub last_updated: DateTime<FixedOffset>,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus environment and defaults).
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub data_root: PathBuf,
    pub output: PathBuf,
    /// Number of future weeks emitted per product series.
    pub horizon: usize,
    /// Number of products listed in each pharmacy's `top_skus`.
    pub top_k: usize,
    pub week_labels: WeekLabelRule,
}

impl PipelineConfig {
    pub const DEFAULT_HORIZON: usize = 8;
    pub const DEFAULT_TOP_K: usize = 10;

    pub fn new(data_root: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            output: output.into(),
            horizon: Self::DEFAULT_HORIZON,
            top_k: Self::DEFAULT_TOP_K,
            week_labels: WeekLabelRule::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pharmacy_names_resolve_case_insensitively() {
        assert_eq!(Pharmacy::from_name("tph"), Some(Pharmacy::Tph));
        assert_eq!(Pharmacy::from_name(" Belmar "), Some(Pharmacy::Belmar));
        assert_eq!(Pharmacy::from_name("CUREXA"), Some(Pharmacy::Curexa));
        assert_eq!(Pharmacy::from_name("Walgreens"), None);
    }

    #[test]
    fn weekly_bucket_uses_dashboard_field_names() {
        let bucket = WeeklyBucket {
            pharmacy: Pharmacy::Tph,
            product_key: "SEMA-2.5".to_string(),
            year_week: "2025-W48".to_string(),
            week_start: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
            quantity: 3.0,
            amount: 120.0,
            is_projection: false,
        };
        let json = serde_json::to_value(&bucket).unwrap();
        assert_eq!(json["pharmacy"], "TPH");
        assert_eq!(json["sku"], "SEMA-2.5");
        assert_eq!(json["week_start"], "2025-12-01");
        assert_eq!(json["is_projection"], false);
    }
}
