//! TPH order exports.
//!
//! Columns used: `SKU`, `Quantity`, `Total`.

use chrono::NaiveDate;

use crate::domain::{CanonicalRecord, Pharmacy};
use crate::error::SourceError;
use crate::io::ingest::RawTable;
use crate::sources::{SourceParser, parse_sku_rows};

/// Dispensing fee, two-day shipping and prep-pad supply lines.
pub const EXCLUDED_CODES: [&str; 3] = ["DISPFEE", "SHIP2DAY", "ALCOHOLPREPPAD"];

#[derive(Debug, Clone, Copy, Default)]
pub struct TphParser;

impl SourceParser for TphParser {
    fn pharmacy(&self) -> Pharmacy {
        Pharmacy::Tph
    }

    fn parse(&self, table: &RawTable, period_start: NaiveDate) -> Result<Vec<CanonicalRecord>, SourceError> {
        parse_sku_rows(table, Pharmacy::Tph, &EXCLUDED_CODES, period_start)
    }
}
