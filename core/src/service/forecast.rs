use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{finite, Reading};
use crate::service::interpolator::try_value_at;
use crate::service::normalizer::ChartPoint;
use crate::time::{days_between, days_in_month, month_end, month_start, to_reference_year};

/// Projection for the month containing the most recent reading.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ForecastResult {
    pub year: i32,
    pub month: u32,
    pub elapsed_days: u32,
    pub days_in_month: u32,
    pub month_start_value: f64,
    pub last: Reading,
    pub consumed_so_far: f64,
    pub projected_month_total: f64,
    pub projected_end_value: f64,
}

impl ForecastResult {
    pub fn month_end(&self) -> Option<NaiveDate> {
        month_end(self.last.date)
    }

    /// Dashed segment from the latest reading to the projected month end,
    /// relative to `baseline` on the reference year.
    pub fn segment(&self, baseline: f64, reference_year: i32) -> Option<[ChartPoint; 2]> {
        let from = to_reference_year(self.last.date, reference_year)?;
        let to = to_reference_year(self.month_end()?, reference_year)?;
        Some([
            ChartPoint {
                x: from,
                y: finite(self.last.value - baseline),
            },
            ChartPoint {
                x: to,
                y: finite(self.projected_end_value - baseline),
            },
        ])
    }
}

/// Cumulative value on `start`, the first day of the latest reading's month.
///
/// A reading on that very day is used as is. Otherwise the closest readings
/// before and on/after the day are interpolated; without an earlier reading
/// there is nothing to bracket with.
fn value_at_month_start(series: &[Reading], start: NaiveDate) -> Option<f64> {
    if let Some(exact) = series.iter().rev().find(|r| r.date == start) {
        return finite(exact.value);
    }

    let left = series.iter().rev().find(|r| r.date < start)?;
    let right = series.iter().find(|r| r.date >= start)?;
    try_value_at(start, left, right)
}

/// Projects the month-end cumulative value for the month of the most recent
/// reading by extrapolating the consumption since the 1st linearly.
///
/// `None` when the series is empty, the latest reading is already on the last
/// day of its month, the month-start value cannot be determined, or nothing
/// (or a negative amount) has been consumed since the 1st.
pub fn forecast(series: &[Reading]) -> Option<ForecastResult> {
    let last = *series.last()?;
    let now = last.date;

    let start = month_start(now)?;
    let days_in_month = days_in_month(now)?;
    if Some(now) == month_end(now) {
        debug!(date = %now, "latest reading closes its month, nothing to forecast");
        return None;
    }

    let Some(month_start_value) = value_at_month_start(series, start) else {
        debug!(date = %now, "no month-start value, skipping forecast");
        return None;
    };

    let elapsed_days = days_between(start, now).max(1.0);
    let consumed_so_far = last.value - month_start_value;
    if !consumed_so_far.is_finite() || consumed_so_far <= 0.0 {
        debug!(date = %now, consumed_so_far, "no consumption this month, skipping forecast");
        return None;
    }

    let projected_month_total = finite(consumed_so_far / elapsed_days * days_in_month as f64)?;
    let projected_end_value = finite(month_start_value + projected_month_total)?;

    Some(ForecastResult {
        year: now.year(),
        month: now.month(),
        elapsed_days: elapsed_days as u32,
        days_in_month,
        month_start_value,
        last,
        consumed_so_far,
        projected_month_total,
        projected_end_value,
    })
}
