use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::Reading;
use crate::time::{days_between, next_month_start, year_month_key};

/// Incremental totals keyed by `"YYYY-MM"`. Contributions accumulate.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct MonthTotals {
    totals: BTreeMap<String, f64>,
}

impl MonthTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: String, amount: f64) {
        *self.totals.entry(key).or_insert(0.0) += amount;
    }

    /// Total for `"YYYY-MM"`, 0 for months nothing was allocated to.
    pub fn get(&self, key: &str) -> f64 {
        self.totals.get(key).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.totals.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn sum(&self) -> f64 {
        self.totals.values().sum()
    }

    /// Distinct years that received a contribution, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self
            .totals
            .keys()
            .filter_map(|k| k.get(..4).and_then(|y| y.parse().ok()))
            .collect();
        years.dedup();
        years
    }

    /// January..December of `year`.
    pub fn year_row(&self, year: i32) -> [f64; 12] {
        let mut row = [0.0; 12];
        for (m, slot) in row.iter_mut().enumerate() {
            *slot = self.get(&format!("{:04}-{:02}", year, m + 1));
        }
        row
    }
}

/// Spreads `amount` over the calendar months of `[start, end)`, weighted by
/// the number of days of the interval falling into each month.
///
/// Contributes nothing when `end` is not after `start`.
pub fn allocate(start: NaiveDate, end: NaiveDate, amount: f64, out: &mut MonthTotals) {
    let total_days = days_between(start, end);
    if !(total_days > 0.0) {
        return;
    }

    let mut cursor = start;
    while cursor < end {
        let Some(next) = next_month_start(cursor) else {
            break;
        };
        let seg_end = if end < next { end } else { next };

        let seg_days = days_between(cursor, seg_end);
        if seg_days > 0.0 {
            out.add(year_month_key(cursor), amount * (seg_days / total_days));
        }

        cursor = next;
    }
}

/// Month totals for a whole series, one allocation per consecutive pair.
///
/// Pairs with a non-finite delta or without forward progress in time are gaps
/// and are skipped.
pub fn month_totals(series: &[Reading]) -> MonthTotals {
    let mut totals = MonthTotals::new();
    for pair in series.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let diff = b.value - a.value;

        if !diff.is_finite() {
            debug!(from = %a.date, to = %b.date, "skipping pair with non-finite delta");
            continue;
        }
        if b.date <= a.date {
            debug!(from = %a.date, to = %b.date, "skipping pair without positive span");
            continue;
        }

        allocate(a.date, b.date, diff, &mut totals);
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::parse_date;

    const EPS: f64 = 1e-9;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn r(date: &str, value: f64) -> Reading {
        Reading::new(d(date), value)
    }

    #[test]
    fn test_single_month_gets_everything() {
        let mut totals = MonthTotals::new();
        allocate(d("2024-03-05"), d("2024-03-20"), 42.0, &mut totals);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals.get("2024-03"), 42.0);
    }

    #[test]
    fn test_split_across_two_months() {
        let mut totals = MonthTotals::new();
        allocate(d("2024-01-01"), d("2024-02-15"), 60.0, &mut totals);
        // 31 of the 45 days are in January.
        assert!((totals.get("2024-01") - 60.0 * 31.0 / 45.0).abs() < EPS);
        assert!((totals.get("2024-02") - 60.0 * 14.0 / 45.0).abs() < EPS);
    }

    #[test]
    fn test_conservation_across_year_boundary() {
        let mut totals = MonthTotals::new();
        allocate(d("2023-11-17"), d("2024-03-02"), 1234.5, &mut totals);
        assert_eq!(totals.years(), vec![2023, 2024]);
        assert!((totals.sum() - 1234.5).abs() < EPS);
        // End date is exclusive: nothing lands in March except Mar 1.
        assert!((totals.get("2024-03") - 1234.5 / 106.0).abs() < EPS);
    }

    #[test]
    fn test_non_positive_span_contributes_nothing() {
        let mut totals = MonthTotals::new();
        allocate(d("2024-03-05"), d("2024-03-05"), 10.0, &mut totals);
        allocate(d("2024-03-05"), d("2024-03-01"), 10.0, &mut totals);
        assert!(totals.is_empty());
    }

    #[test]
    fn test_contributions_accumulate() {
        let mut totals = MonthTotals::new();
        allocate(d("2024-03-01"), d("2024-03-10"), 10.0, &mut totals);
        allocate(d("2024-03-10"), d("2024-03-20"), 5.0, &mut totals);
        assert_eq!(totals.get("2024-03"), 15.0);
    }

    #[test]
    fn test_month_totals_for_series() {
        let series = vec![
            r("2024-01-01", 100.0),
            r("2024-02-15", 160.0),
            r("2024-06-01", 220.0),
        ];
        let totals = month_totals(&series);

        assert!((totals.sum() - 120.0).abs() < EPS);
        // Feb 15 -> Jun 1 spans 107 days, 31 of them in May.
        assert!((totals.get("2024-05") - 60.0 * 31.0 / 107.0).abs() < EPS);
        assert_eq!(totals.get("2024-06"), 0.0);

        let row = totals.year_row(2024);
        assert!((row[0] - 60.0 * 31.0 / 45.0).abs() < EPS);
        assert_eq!(row[11], 0.0);
    }

    #[test]
    fn test_month_totals_skips_gaps() {
        let series = vec![
            r("2024-01-01", 100.0),
            r("2024-01-10", f64::NAN),
            r("2024-01-20", 130.0),
            r("2024-01-20", 140.0),
            r("2024-01-25", 150.0),
        ];
        let totals = month_totals(&series);
        // Only the last pair survives.
        assert_eq!(totals.get("2024-01"), 10.0);
    }

    #[test]
    fn test_single_reading_has_no_totals() {
        assert!(month_totals(&[r("2024-03-10", 50.0)]).is_empty());
        assert!(month_totals(&[]).is_empty());
    }
}
