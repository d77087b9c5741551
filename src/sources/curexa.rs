//! Curexa order exports, usually Excel workbooks.
//!
//! Same columns as TPH (`SKU`, `Quantity`, `Total`). Excluded codes:
//! `DISPFEE`, `SHIP2DAY`.

use chrono::NaiveDate;

use crate::domain::{CanonicalRecord, Pharmacy};
use crate::error::SourceError;
use crate::io::ingest::RawTable;
use crate::sources::{SourceParser, parse_sku_rows};

pub const EXCLUDED_CODES: [&str; 2] = ["DISPFEE", "SHIP2DAY"];

#[derive(Debug, Clone, Copy, Default)]
pub struct CurexaParser;

impl SourceParser for CurexaParser {
    fn pharmacy(&self) -> Pharmacy {
        Pharmacy::Curexa
    }

    fn parse(&self, table: &RawTable, period_start: NaiveDate) -> Result<Vec<CanonicalRecord>, SourceError> {
        parse_sku_rows(table, Pharmacy::Curexa, &EXCLUDED_CODES, period_start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclusion_set_differs_from_tph() {
        let week = NaiveDate::from_ymd_opt(2026, 1, 12).unwrap();
        let table = RawTable::from_rows(
            &["SKU", "Line Item", "Quantity", "Unit Price", "Total"],
            &[
                &["DISPFEE", "Dispensing fee", "1", "5", "5"],
                &["SHIP2DAY", "Shipping", "1", "25", "25"],
                &["ALCOHOLPREPPAD", "Prep pads", "20", "0.1", "2"],
                &["BPC-157", "BPC-157 5mg", "2", "60", "$120.00"],
            ],
        );

        let records = CurexaParser.parse(&table, week).unwrap();
        let keys: Vec<&str> = records.iter().map(|r| r.product_key.as_str()).collect();
        assert_eq!(keys, vec!["ALCOHOLPREPPAD", "BPC-157"]);
        assert_eq!(records[1].amount, 120.0);
        assert!(records.iter().all(|r| r.pharmacy == Pharmacy::Curexa));
    }

    #[test]
    fn workbook_export_applies_the_exclusion_set() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata/curexa_orders.xlsx");
        let table = RawTable::from_workbook(&path).unwrap();
        let week = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();

        let records = CurexaParser.parse(&table, week).unwrap();
        let keys: Vec<&str> = records.iter().map(|r| r.product_key.as_str()).collect();
        assert_eq!(keys, vec!["BPC-157", "ALCOHOLPREPPAD", "NAD-100"]);
        assert_eq!(records[0].quantity, 2.0);
        assert_eq!(records[0].amount, 120.0);
        assert_eq!(records[1].quantity, 20.0);
        assert_eq!(records[2].amount, 136.5);
    }

    #[test]
    fn parser_is_selected_by_pharmacy() {
        assert_eq!(Pharmacy::Curexa.parser().pharmacy(), Pharmacy::Curexa);
        assert_eq!(Pharmacy::Tph.parser().pharmacy(), Pharmacy::Tph);
        assert_eq!(Pharmacy::Belmar.parser().pharmacy(), Pharmacy::Belmar);
    }
}
