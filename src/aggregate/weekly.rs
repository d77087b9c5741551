use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::aggregate::{Totals, week_id};
use crate::domain::{CanonicalRecord, Pharmacy, WeeklyBucket};

/// Sum records per `(pharmacy, product_key, week_start)`.
///
/// Emitted buckets are historical (`is_projection = false`).
pub fn aggregate_by_week(records: &[CanonicalRecord]) -> Vec<WeeklyBucket> {
    let mut groups: BTreeMap<(Pharmacy, &str, NaiveDate), Totals> = BTreeMap::new();
    for r in records {
        groups
            .entry((r.pharmacy, r.product_key.as_str(), r.period_start))
            .or_default()
            .add(r.quantity, r.amount);
    }

    groups
        .into_iter()
        .map(|((pharmacy, product_key, week_start), totals)| WeeklyBucket {
            pharmacy,
            product_key: product_key.to_string(),
            year_week: week_id(week_start),
            week_start,
            quantity: totals.quantity,
            amount: totals.amount,
            is_projection: false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rec(pharmacy: Pharmacy, key: &str, day: u32, quantity: f64, amount: f64) -> CanonicalRecord {
        CanonicalRecord {
            pharmacy,
            product_key: key.to_string(),
            quantity,
            amount,
            period_start: NaiveDate::from_ymd_opt(2025, 12, day).unwrap(),
        }
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(aggregate_by_week(&[]).is_empty());
    }

    #[test]
    fn sums_within_a_week_and_sorts_output() {
        let records = vec![
            rec(Pharmacy::Tph, "B", 8, 1.0, 10.0),
            rec(Pharmacy::Belmar, "Z", 1, 2.0, 5.0),
            rec(Pharmacy::Tph, "A", 8, 3.0, 30.0),
            rec(Pharmacy::Tph, "B", 1, 4.0, 40.0),
            rec(Pharmacy::Tph, "B", 8, 5.0, 50.0),
        ];

        let buckets = aggregate_by_week(&records);
        let keys: Vec<(Pharmacy, &str, u32)> = buckets
            .iter()
            .map(|b| (b.pharmacy, b.product_key.as_str(), chrono::Datelike::day(&b.week_start)))
            .collect();
        assert_eq!(
            keys,
            vec![
                (Pharmacy::Belmar, "Z", 1),
                (Pharmacy::Tph, "A", 8),
                (Pharmacy::Tph, "B", 1),
                (Pharmacy::Tph, "B", 8),
            ]
        );

        let b8 = &buckets[3];
        assert_eq!(b8.quantity, 6.0);
        assert_eq!(b8.amount, 60.0);
        assert_eq!(b8.year_week, "2025-W49");
        assert!(!b8.is_projection);
    }

    fn arb_record() -> impl Strategy<Value = CanonicalRecord> {
        (0usize..3, 0usize..3, 1u32..=28, 0u32..50, 0u32..500).prop_map(|(p, k, day, q, a)| {
            rec(Pharmacy::ALL[p], ["A", "B", "C"][k], day, q as f64, a as f64)
        })
    }

    fn total_for(buckets: &[WeeklyBucket], b: &WeeklyBucket) -> (f64, f64) {
        buckets
            .iter()
            .filter(|x| x.pharmacy == b.pharmacy && x.product_key == b.product_key && x.week_start == b.week_start)
            .fold((0.0, 0.0), |acc, x| (acc.0 + x.quantity, acc.1 + x.amount))
    }

    proptest! {
        #[test]
        fn union_equals_sum_of_parts(
            left in prop::collection::vec(arb_record(), 0..40),
            right in prop::collection::vec(arb_record(), 0..40),
        ) {
            let mut all = left.clone();
            all.extend(right.iter().cloned());

            let whole = aggregate_by_week(&all);
            let mut parts = aggregate_by_week(&left);
            parts.extend(aggregate_by_week(&right));

            for bucket in &whole {
                let (q, a) = total_for(&parts, bucket);
                prop_assert_eq!(bucket.quantity, q);
                prop_assert_eq!(bucket.amount, a);
            }
            let whole_q: f64 = whole.iter().map(|b| b.quantity).sum();
            let parts_q: f64 = parts.iter().map(|b| b.quantity).sum();
            prop_assert_eq!(whole_q, parts_q);
        }

        #[test]
        fn input_order_does_not_matter(records in prop::collection::vec(arb_record(), 0..40)) {
            let mut reversed = records.clone();
            reversed.reverse();
            prop_assert_eq!(aggregate_by_week(&records), aggregate_by_week(&reversed));
        }
    }
}
