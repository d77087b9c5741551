//! Reporting utilities: per-pharmacy summaries and terminal output.

use std::collections::BTreeMap;

use crate::domain::{Pharmacy, PharmacySummary, TopProduct, WeeklyBucket};

pub mod format;

pub use format::*;

/// Summarize historical weekly buckets per pharmacy.
///
/// Projected buckets are ignored. `top_skus` is ordered by total quantity,
/// descending, with ties broken by product key ascending.
pub fn generate_summary(weekly: &[WeeklyBucket], top_k: usize) -> BTreeMap<Pharmacy, PharmacySummary> {
    let mut by_pharmacy: BTreeMap<Pharmacy, Vec<&WeeklyBucket>> = BTreeMap::new();
    for bucket in weekly.iter().filter(|b| !b.is_projection) {
        by_pharmacy.entry(bucket.pharmacy).or_default().push(bucket);
    }

    by_pharmacy
        .into_iter()
        .map(|(pharmacy, buckets)| (pharmacy, summarize(&buckets, top_k)))
        .collect()
}

fn summarize(buckets: &[&WeeklyBucket], top_k: usize) -> PharmacySummary {
    let mut per_product: BTreeMap<&str, f64> = BTreeMap::new();
    let mut per_week: BTreeMap<&str, f64> = BTreeMap::new();
    let mut total_quantity = 0.0;
    let mut total_revenue = 0.0;

    for b in buckets {
        *per_product.entry(b.product_key.as_str()).or_default() += b.quantity;
        *per_week.entry(b.year_week.as_str()).or_default() += b.quantity;
        total_quantity += b.quantity;
        total_revenue += b.amount;
    }

    let avg_weekly_quantity = if per_week.is_empty() {
        0.0
    } else {
        per_week.values().sum::<f64>() / per_week.len() as f64
    };

    // `per_product` iterates in key order; the stable sort keeps it for ties.
    let mut ranked: Vec<(&str, f64)> = per_product.iter().map(|(k, q)| (*k, *q)).collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let top_skus = ranked
        .into_iter()
        .take(top_k)
        .map(|(sku, quantity)| TopProduct {
            sku: sku.to_string(),
            quantity,
        })
        .collect();

    PharmacySummary {
        total_skus: per_product.len(),
        total_quantity,
        total_revenue,
        avg_weekly_quantity,
        top_skus,
    }
}
