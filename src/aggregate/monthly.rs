use std::collections::BTreeMap;

use crate::aggregate::{Totals, month_id};
use crate::domain::{CanonicalRecord, MonthlyBucket, Pharmacy};

/// Sum records per `(pharmacy, product_key, year_month)`.
///
/// A week is attributed to the month its `period_start` falls in, even when
/// the week spills into the next month.
pub fn aggregate_by_month(records: &[CanonicalRecord]) -> Vec<MonthlyBucket> {
    let mut groups: BTreeMap<(Pharmacy, &str, String), Totals> = BTreeMap::new();
    for r in records {
        groups
            .entry((r.pharmacy, r.product_key.as_str(), month_id(r.period_start)))
            .or_default()
            .add(r.quantity, r.amount);
    }

    groups
        .into_iter()
        .map(|((pharmacy, product_key, year_month), totals)| MonthlyBucket {
            pharmacy,
            product_key: product_key.to_string(),
            year_month,
            quantity: totals.quantity,
            amount: totals.amount,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(key: &str, y: i32, m: u32, d: u32, quantity: f64, amount: f64) -> CanonicalRecord {
        CanonicalRecord {
            pharmacy: Pharmacy::Curexa,
            product_key: key.to_string(),
            quantity,
            amount,
            period_start: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
        }
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(aggregate_by_month(&[]).is_empty());
    }

    #[test]
    fn weeks_roll_up_into_their_start_month() {
        let records = vec![
            rec("A", 2025, 12, 1, 1.0, 10.0),
            rec("A", 2025, 12, 29, 2.0, 20.0),
            rec("A", 2026, 1, 5, 4.0, 40.0),
            rec("B", 2025, 12, 8, 8.0, 80.0),
        ];

        let buckets = aggregate_by_month(&records);
        assert_eq!(buckets.len(), 3);

        assert_eq!(buckets[0].product_key, "A");
        assert_eq!(buckets[0].year_month, "2025-12");
        assert_eq!(buckets[0].quantity, 3.0);
        assert_eq!(buckets[0].amount, 30.0);

        assert_eq!(buckets[1].year_month, "2026-01");
        assert_eq!(buckets[1].quantity, 4.0);

        assert_eq!(buckets[2].product_key, "B");
    }
}
