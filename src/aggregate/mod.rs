//! Time-bucketed aggregation of canonical records.
//!
//! Both aggregators group by `(pharmacy, product_key, period)` and sum
//! quantity and amount. Groups live in a `BTreeMap`, so output order is
//! `(pharmacy, product_key, period)` ascending regardless of input order.

use chrono::NaiveDate;

pub mod monthly;
pub mod weekly;

pub use monthly::aggregate_by_month;
pub use weekly::aggregate_by_week;

/// Week identifier: year plus Sunday-based week of year (`2025-W48`).
pub fn week_id(date: NaiveDate) -> String {
    date.format("%Y-W%U").to_string()
}

/// Month identifier (`2025-12`).
pub fn month_id(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Running quantity/amount totals for one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Totals {
    pub quantity: f64,
    pub amount: f64,
}

impl Totals {
    pub fn add(&mut self, quantity: f64, amount: f64) {
        self.quantity += quantity;
        self.amount += amount;
    }
}
