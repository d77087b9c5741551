//! Forward projections for weekly product series.
//!
//! For each `(pharmacy, product_key)` series, sorted by `week_start`:
//!
//! - baseline = mean of the trailing window (at most 4 weeks)
//! - trend = OLS slope of quantity over the same window, only with ≥ 3 weeks
//! - week `i` ahead: `max(0, baseline + trend * i)`
//! - amount follows quantity at the window's average amount-per-unit
//!
//! Series with fewer than 2 weeks are not projected. Projections are
//! recomputed from scratch on every run.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use tracing::debug;

use crate::aggregate::week_id;
use crate::domain::{Pharmacy, WeeklyBucket};
use crate::math::linear_slope;

/// Trailing weeks used for the baseline and the trend.
pub const MOVING_AVERAGE_WINDOW: usize = 4;
/// Shortest series that gets projected.
pub const MIN_HISTORY: usize = 2;
/// Shortest series that gets a non-zero trend.
pub const MIN_TREND_HISTORY: usize = 3;

/// Fitted parameters for one series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesForecast {
    pub baseline_quantity: f64,
    pub baseline_amount: f64,
    /// Quantity change per week.
    pub trend: f64,
    pub last_week: NaiveDate,
}

impl SeriesForecast {
    /// Fit a series already sorted by `week_start`.
    pub fn fit(series: &[&WeeklyBucket]) -> Option<Self> {
        if series.len() < MIN_HISTORY {
            return None;
        }
        let last_week = series.last()?.week_start;

        let quantities: Vec<f64> = series.iter().map(|b| b.quantity).collect();
        let amounts: Vec<f64> = series.iter().map(|b| b.amount).collect();

        let baseline_quantity = moving_average(&quantities)?;
        let baseline_amount = moving_average(&amounts)?;

        let trend = if series.len() >= MIN_TREND_HISTORY {
            linear_slope(trailing(&quantities)).unwrap_or(0.0)
        } else {
            0.0
        };

        Some(Self {
            baseline_quantity,
            baseline_amount,
            trend,
            last_week,
        })
    }

    /// Projected quantity `step` weeks after the last observed week.
    pub fn quantity_at(&self, step: usize) -> f64 {
        (self.baseline_quantity + self.trend * step as f64).max(0.0)
    }

    /// Average amount per unit over the window; 0 when nothing was sold.
    pub fn amount_per_unit(&self) -> f64 {
        if self.baseline_quantity > 0.0 {
            self.baseline_amount / self.baseline_quantity
        } else {
            0.0
        }
    }
}

/// Mean of the last `min(MOVING_AVERAGE_WINDOW, n)` values.
pub fn moving_average(values: &[f64]) -> Option<f64> {
    let window = trailing(values);
    if window.is_empty() {
        return None;
    }
    Some(window.iter().sum::<f64>() / window.len() as f64)
}

fn trailing(values: &[f64]) -> &[f64] {
    let start = values.len().saturating_sub(MOVING_AVERAGE_WINDOW);
    &values[start..]
}

/// Project every eligible series `horizon` weeks ahead.
///
/// Input buckets already flagged as projections are ignored. Output is
/// ordered by `(pharmacy, product_key, week_start)`.
pub fn project(weekly: &[WeeklyBucket], horizon: usize) -> Vec<WeeklyBucket> {
    let mut series: BTreeMap<(Pharmacy, &str), Vec<&WeeklyBucket>> = BTreeMap::new();
    for bucket in weekly.iter().filter(|b| !b.is_projection) {
        series
            .entry((bucket.pharmacy, bucket.product_key.as_str()))
            .or_default()
            .push(bucket);
    }

    let mut out = Vec::new();
    for ((pharmacy, product_key), mut history) in series {
        history.sort_by_key(|b| b.week_start);

        let Some(forecast) = SeriesForecast::fit(&history) else {
            debug!(%pharmacy, product_key, weeks = history.len(), "insufficient history, not projected");
            continue;
        };

        let unit_amount = forecast.amount_per_unit();
        for step in 1..=horizon {
            let Some(week_start) = forecast.last_week.checked_add_days(Days::new(7 * step as u64)) else {
                break;
            };
            let quantity = forecast.quantity_at(step);
            out.push(WeeklyBucket {
                pharmacy,
                product_key: product_key.to_string(),
                year_week: week_id(week_start),
                week_start,
                quantity,
                amount: unit_amount * quantity,
                is_projection: true,
            });
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn week(offset: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 1)
            .unwrap()
            .checked_add_days(Days::new(7 * offset))
            .unwrap()
    }

    fn series(key: &str, points: &[(f64, f64)]) -> Vec<WeeklyBucket> {
        points
            .iter()
            .enumerate()
            .map(|(i, &(quantity, amount))| {
                let week_start = week(i as u64);
                WeeklyBucket {
                    pharmacy: Pharmacy::Belmar,
                    product_key: key.to_string(),
                    year_week: week_id(week_start),
                    week_start,
                    quantity,
                    amount,
                    is_projection: false,
                }
            })
            .collect()
    }

    #[test]
    fn worked_example() {
        let history = series("A", &[(10.0, 100.0), (20.0, 200.0), (30.0, 300.0)]);
        let projected = project(&history, 2);
        assert_eq!(projected.len(), 2);

        let first = &projected[0];
        assert!(first.is_projection);
        assert!((first.quantity - 30.0).abs() < 1e-9);
        assert!((first.amount - 300.0).abs() < 1e-9);
        assert_eq!(first.week_start, week(3));
        assert_eq!(first.year_week, "2025-W51");

        let second = &projected[1];
        assert!((second.quantity - 40.0).abs() < 1e-9);
        assert_eq!(second.week_start, week(4));
    }

    #[test]
    fn single_point_series_is_not_projected() {
        let history = series("A", &[(10.0, 100.0)]);
        assert!(project(&history, 8).is_empty());
    }

    #[test]
    fn two_point_series_is_flat() {
        let history = series("A", &[(10.0, 50.0), (30.0, 150.0)]);
        let projected = project(&history, 4);
        assert_eq!(projected.len(), 4);
        for p in &projected {
            assert!((p.quantity - 20.0).abs() < 1e-9);
            assert!((p.amount - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn window_uses_last_four_weeks() {
        let history = series(
            "A",
            &[(100.0, 0.0), (100.0, 0.0), (4.0, 8.0), (4.0, 8.0), (4.0, 8.0), (4.0, 8.0)],
        );
        let refs: Vec<&WeeklyBucket> = history.iter().collect();
        let forecast = SeriesForecast::fit(&refs).unwrap();
        assert!((forecast.baseline_quantity - 4.0).abs() < 1e-9);
        assert!(forecast.trend.abs() < 1e-9);
        assert!((forecast.amount_per_unit() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn zero_average_quantity_projects_zero_amount() {
        let history = series("A", &[(0.0, 40.0), (0.0, 60.0), (0.0, 10.0)]);
        let projected = project(&history, 3);
        assert_eq!(projected.len(), 3);
        assert!(projected.iter().all(|p| p.quantity == 0.0 && p.amount == 0.0));
    }

    #[test]
    fn declining_series_clamps_at_zero() {
        let history = series("A", &[(30.0, 30.0), (20.0, 20.0), (10.0, 10.0)]);
        let projected = project(&history, 4);
        // baseline 20, trend -10: 10, 0, then clamped.
        let q: Vec<f64> = projected.iter().map(|p| p.quantity).collect();
        assert!((q[0] - 10.0).abs() < 1e-9);
        assert!(q[1].abs() < 1e-9);
        assert_eq!(q[2], 0.0);
        assert_eq!(q[3], 0.0);
    }

    #[test]
    fn series_are_projected_independently() {
        let mut history = series("B", &[(1.0, 1.0), (1.0, 1.0)]);
        history.extend(series("A", &[(2.0, 2.0)]));
        history.extend(series("C", &[(5.0, 5.0), (5.0, 5.0), (5.0, 5.0)]));

        let projected = project(&history, 1);
        let keys: Vec<&str> = projected.iter().map(|p| p.product_key.as_str()).collect();
        assert_eq!(keys, vec!["B", "C"]);
    }

    #[test]
    fn existing_projections_are_ignored() {
        let mut history = series("A", &[(10.0, 10.0)]);
        let mut fake = history[0].clone();
        fake.week_start = week(1);
        fake.is_projection = true;
        history.push(fake);
        assert!(project(&history, 2).is_empty());
    }

    proptest! {
        #[test]
        fn projected_quantity_is_never_negative(
            points in prop::collection::vec((0.0f64..1000.0, 0.0f64..1000.0), 0..10),
            horizon in 0usize..12,
        ) {
            let history = series("A", &points);
            for p in project(&history, horizon) {
                prop_assert!(p.quantity >= 0.0);
                prop_assert!(p.amount >= 0.0);
            }
        }

        #[test]
        fn baseline_is_mean_of_trailing_window(values in prop::collection::vec(0.0f64..1000.0, 1..12)) {
            let n = values.len().min(MOVING_AVERAGE_WINDOW);
            let expected = values[values.len() - n..].iter().sum::<f64>() / n as f64;
            let got = moving_average(&values).unwrap();
            prop_assert!((got - expected).abs() < 1e-9);
        }
    }
}
