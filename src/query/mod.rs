//! Read-only views over an exported snapshot.
//!
//! These mirror what a serving layer exposes: the pharmacy list, one
//! pharmacy's rows, one product's rows, the summary map and a health probe.
//! A snapshot that does not exist yet is reported as
//! `QueryError::DataUnavailable`, distinct from a snapshot that exists but
//! cannot be read.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::{MonthlyBucket, Pharmacy, PharmacySummary, Snapshot, WeeklyBucket};
use crate::error::QueryError;

/// Load the snapshot at `path`.
pub fn load_snapshot(path: &Path) -> Result<Snapshot, QueryError> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(QueryError::DataUnavailable {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(QueryError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_reader(BufReader::new(file)).map_err(|source| QueryError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub data_available: bool,
    pub data_file: PathBuf,
}

/// Liveness probe; never fails.
pub fn health(path: &Path) -> Health {
    Health {
        status: "healthy",
        data_available: path.is_file(),
        data_file: path.to_path_buf(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PharmacyList {
    pub pharmacies: Vec<Pharmacy>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PharmacyView {
    pub pharmacy: String,
    pub weekly_data: Vec<WeeklyBucket>,
    pub monthly_data: Vec<MonthlyBucket>,
    /// `None` for pharmacies without data.
    pub summary: Option<PharmacySummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductView {
    pub pharmacy: String,
    pub sku: String,
    pub weekly_data: Vec<WeeklyBucket>,
}

/// Pharmacies that have a summary entry.
pub fn pharmacies(snapshot: &Snapshot) -> PharmacyList {
    PharmacyList {
        pharmacies: snapshot.summary.keys().copied().collect(),
    }
}

/// All rows of one pharmacy. Unknown names produce an empty view.
pub fn pharmacy_view(snapshot: &Snapshot, name: &str) -> PharmacyView {
    let pharmacy = Pharmacy::from_name(name);
    PharmacyView {
        pharmacy: name.to_string(),
        weekly_data: snapshot
            .weekly_data
            .iter()
            .filter(|r| Some(r.pharmacy) == pharmacy)
            .cloned()
            .collect(),
        monthly_data: snapshot
            .monthly_data
            .iter()
            .filter(|r| Some(r.pharmacy) == pharmacy)
            .cloned()
            .collect(),
        summary: pharmacy.and_then(|p| snapshot.summary.get(&p).cloned()),
    }
}

/// Weekly rows (historical and projected) of one product.
pub fn product_view(snapshot: &Snapshot, name: &str, sku: &str) -> ProductView {
    let pharmacy = Pharmacy::from_name(name);
    ProductView {
        pharmacy: name.to_string(),
        sku: sku.to_string(),
        weekly_data: snapshot
            .weekly_data
            .iter()
            .filter(|r| Some(r.pharmacy) == pharmacy && r.product_key == sku)
            .cloned()
            .collect(),
    }
}

pub fn summary(snapshot: &Snapshot) -> &BTreeMap<Pharmacy, PharmacySummary> {
    &snapshot.summary
}
