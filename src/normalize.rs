//! Record normalization shared by every source parser.
//!
//! Parsers only decide *which* cells make up a record; the rules for turning
//! those cells into a `CanonicalRecord` live here:
//!
//! - text is trimmed and internal whitespace collapsed
//! - numbers default to `0.0` when missing, unparseable, non-finite or negative
//! - a record without a product key is never built

use chrono::NaiveDate;

use crate::domain::{CanonicalRecord, Pharmacy};

/// Parser output before coercion.
#[derive(Debug, Clone)]
pub struct RecordDraft<'a> {
    pub pharmacy: Pharmacy,
    pub product_key: Option<String>,
    pub quantity: Option<&'a str>,
    pub amount: Option<&'a str>,
}

/// Build a canonical record, or `None` when the draft has no usable key.
pub fn normalize(draft: RecordDraft<'_>, period_start: NaiveDate) -> Option<CanonicalRecord> {
    let product_key = draft.product_key.as_deref().and_then(clean_text)?;
    Some(CanonicalRecord {
        pharmacy: draft.pharmacy,
        product_key,
        quantity: coerce_amount(draft.quantity),
        amount: coerce_amount(draft.amount),
        period_start,
    })
}

/// Trim and collapse whitespace runs to a single space.
pub fn clean_text(raw: &str) -> Option<String> {
    let cleaned = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() { None } else { Some(cleaned) }
}

/// Join the non-empty cleaned parts with single spaces.
pub fn compose_key<'a>(parts: impl IntoIterator<Item = Option<&'a str>>) -> Option<String> {
    let joined = parts
        .into_iter()
        .flatten()
        .filter_map(clean_text)
        .collect::<Vec<_>>()
        .join(" ");
    if joined.is_empty() { None } else { Some(joined) }
}

/// Coerce a quantity or money cell to a non-negative number.
///
/// Accepts `$` prefixes and thousands separators (`"$1,250.00"`).
pub fn coerce_amount(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else { return 0.0 };
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
    let digits: String = trimmed.chars().filter(|c| *c != ',').collect();

    match digits.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}
