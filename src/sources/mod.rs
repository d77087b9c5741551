//! Per-pharmacy source parsers.
//!
//! Each pharmacy exports line items in its own schema. A parser maps one
//! `RawTable` from that schema to canonical records:
//!
//! - `belmar`: product key composed from name + strength + form
//! - `tph`: literal SKU code, administrative codes excluded
//! - `curexa`: literal SKU code, a smaller exclusion set
//!
//! Parsers never fail on individual rows. A file-level problem (such as a
//! missing key column) is returned as a `SourceError` and the caller decides
//! how to report it.

use chrono::NaiveDate;

use crate::domain::{CanonicalRecord, Pharmacy};
use crate::error::SourceError;
use crate::io::ingest::RawTable;
use crate::normalize::{RecordDraft, normalize};

pub mod belmar;
pub mod curexa;
pub mod tph;

pub use belmar::BelmarParser;
pub use curexa::CurexaParser;
pub use tph::TphParser;

/// Common contract of all source parsers.
pub trait SourceParser: Sync {
    fn pharmacy(&self) -> Pharmacy;

    /// Parse one table filed under the week starting `period_start`.
    fn parse(&self, table: &RawTable, period_start: NaiveDate) -> Result<Vec<CanonicalRecord>, SourceError>;
}

impl Pharmacy {
    /// Parser for this pharmacy's export schema.
    pub fn parser(self) -> &'static dyn SourceParser {
        match self {
            Pharmacy::Belmar => &BelmarParser,
            Pharmacy::Curexa => &CurexaParser,
            Pharmacy::Tph => &TphParser,
        }
    }
}

/// Shared row loop for sources keyed by a literal SKU column.
///
/// Rows whose code is in `excluded` (fees, shipping, supplies) are skipped.
pub(crate) fn parse_sku_rows(
    table: &RawTable,
    pharmacy: Pharmacy,
    excluded: &[&str],
    period_start: NaiveDate,
) -> Result<Vec<CanonicalRecord>, SourceError> {
    if !table.has_column("sku") {
        return Err(SourceError::MissingColumn("SKU"));
    }

    let records = table
        .rows()
        .iter()
        .filter_map(|row| {
            let sku = table.get(row, "sku")?;
            if excluded.contains(&sku) {
                return None;
            }
            let draft = RecordDraft {
                pharmacy,
                product_key: Some(sku.to_string()),
                quantity: table.get(row, "quantity"),
                amount: table.get(row, "total"),
            };
            normalize(draft, period_start)
        })
        .collect();

    Ok(records)
}
