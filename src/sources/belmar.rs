//! Belmar invoice exports.
//!
//! Columns used: `Medication Name`, `Medication Strength`, `Medication Form`,
//! `Quantity`, `Invoice Amount`. There is no SKU column, so the product key is
//! the three descriptive fields joined by spaces.

use chrono::NaiveDate;

use crate::domain::{CanonicalRecord, Pharmacy};
use crate::error::SourceError;
use crate::io::ingest::RawTable;
use crate::normalize::{RecordDraft, compose_key, normalize};
use crate::sources::SourceParser;

#[derive(Debug, Clone, Copy, Default)]
pub struct BelmarParser;

impl SourceParser for BelmarParser {
    fn pharmacy(&self) -> Pharmacy {
        Pharmacy::Belmar
    }

    fn parse(&self, table: &RawTable, period_start: NaiveDate) -> Result<Vec<CanonicalRecord>, SourceError> {
        if !table.has_column("medication name") {
            return Err(SourceError::MissingColumn("Medication Name"));
        }

        let records = table
            .rows()
            .iter()
            .filter_map(|row| {
                let product_key = compose_key([
                    table.get(row, "medication name"),
                    table.get(row, "medication strength"),
                    table.get(row, "medication form"),
                ]);
                let draft = RecordDraft {
                    pharmacy: Pharmacy::Belmar,
                    product_key,
                    quantity: table.get(row, "quantity"),
                    amount: table.get(row, "invoice amount"),
                };
                normalize(draft, period_start)
            })
            .collect();

        Ok(records)
    }
}
