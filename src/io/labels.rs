//! Week label resolution.
//!
//! Reporting folders are named after the week they cover ("Week of 12-1",
//! "Feb 2nd") without a year. The year comes from a two-year reporting window:
//! months on or after the cutoff belong to `early_year`, the rest to
//! `late_year`. Numeric and month-name labels each have their own cutoff.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

static MONTH_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})-(\d{1,2})").expect("month-day pattern compiles"));

static MONTH_NAME_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s*(\d{1,2})")
        .expect("month-name pattern compiles")
});

/// Year window used to date month/day labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekLabelRule {
    /// Cutoff for numeric `M-D` labels.
    pub cutoff_month: u32,
    /// Cutoff for month-name labels.
    pub name_cutoff_month: u32,
    pub early_year: i32,
    pub late_year: i32,
}

impl Default for WeekLabelRule {
    /// Numeric labels from September 2025, month-name labels from March 2025.
    fn default() -> Self {
        Self {
            cutoff_month: 9,
            name_cutoff_month: 3,
            early_year: 2025,
            late_year: 2026,
        }
    }
}

impl WeekLabelRule {
    pub fn year_for_month(&self, month: u32, cutoff: u32) -> i32 {
        if month >= cutoff {
            self.early_year
        } else {
            self.late_year
        }
    }

    /// Resolve a folder label to the date it names.
    ///
    /// Numeric `M-D` labels take precedence over month names. Returns `None`
    /// for labels without a date or with an impossible calendar date.
    pub fn resolve(&self, label: &str) -> Option<NaiveDate> {
        let (month, day, cutoff) = match parse_month_day(label) {
            Some((month, day)) => (month, day, self.cutoff_month),
            None => {
                let (month, day) = parse_month_name_day(label)?;
                (month, day, self.name_cutoff_month)
            }
        };
        NaiveDate::from_ymd_opt(self.year_for_month(month, cutoff), month, day)
    }
}

fn parse_month_day(label: &str) -> Option<(u32, u32)> {
    let caps = MONTH_DAY.captures(label)?;
    let month = caps[1].parse().ok()?;
    let day = caps[2].parse().ok()?;
    Some((month, day))
}

fn parse_month_name_day(label: &str) -> Option<(u32, u32)> {
    let caps = MONTH_NAME_DAY.captures(label)?;
    let month = month_number(&caps[1])?;
    let day = caps[2].parse().ok()?;
    Some((month, day))
}

fn month_number(abbrev: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];
    let abbrev = abbrev.to_ascii_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == abbrev)
        .map(|idx| idx as u32 + 1)
}
