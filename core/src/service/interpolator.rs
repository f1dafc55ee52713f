use chrono::NaiveDate;

use crate::model::{finite, Reading};
use crate::time::days_between;

/// Raw linear estimate, or `None` when the bracket has no positive span or
/// `target` lies before `left`. Targets after `right` extrapolate forward.
fn interpolate(target: NaiveDate, left: &Reading, right: &Reading) -> Option<f64> {
    let total_days = days_between(left.date, right.date);
    let left_days = days_between(left.date, target);
    if !(total_days > 0.0) || left_days < 0.0 {
        return None;
    }

    let rate = (right.value - left.value) / total_days;
    Some(left.value + rate * left_days)
}

/// Linear estimate at `target`; `None` on a degenerate bracket or a
/// non-finite result.
pub fn try_value_at(target: NaiveDate, left: &Reading, right: &Reading) -> Option<f64> {
    interpolate(target, left, right).and_then(finite)
}

/// Linear estimate at `target`, falling back to `left.value` on a degenerate
/// bracket. Never extrapolates backward.
pub fn value_at(target: NaiveDate, left: &Reading, right: &Reading) -> f64 {
    interpolate(target, left, right).unwrap_or(left.value)
}
