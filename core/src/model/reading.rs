use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One dated cumulative measurement.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub date: NaiveDate,
    pub value: f64,
}

impl Reading {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Readings of one category, ascending by date.
pub type Series = [Reading];

/// `Some(x)` only for finite `x`.
pub fn finite(x: f64) -> Option<f64> {
    if x.is_finite() {
        Some(x)
    } else {
        None
    }
}
