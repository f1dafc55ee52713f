use serde::{Deserialize, Serialize};

use crate::model::finite;
use crate::service::forecast::ForecastResult;
use crate::service::normalizer::{ChartPoint, YearCurve};
use crate::service::stats::GrowthStats;

/// Forecast overlay on one month bar.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct MonthForecast {
    /// 1..=12
    pub month: u32,
    pub actual_so_far: f64,
    pub projected_total: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct YearBars {
    pub year: i32,
    /// Index 0 is January.
    pub months: [f64; 12],
    pub total: f64,
    /// Change against the previous month in percent; always `None` for January.
    pub deltas: [Option<f64>; 12],
    pub forecast: Option<MonthForecast>,
}

impl YearBars {
    pub fn new(year: i32, months: [f64; 12]) -> Self {
        let mut deltas = [None; 12];
        for m in 1..12 {
            deltas[m] = percent_change(months[m - 1], months[m]);
        }
        Self {
            year,
            months,
            total: months.iter().sum(),
            deltas,
            forecast: None,
        }
    }
}

/// `None` when either side is not finite or the previous month is zero.
pub fn percent_change(prev: f64, curr: f64) -> Option<f64> {
    if !prev.is_finite() || !curr.is_finite() || prev == 0.0 {
        return None;
    }
    finite((curr - prev) / prev * 100.0)
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ForecastCurve {
    pub year: i32,
    pub points: Vec<ChartPoint>,
}

/// Everything the rendering layer needs for one dataset.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DatasetView {
    pub name: String,
    pub curves: Vec<YearCurve>,
    pub forecast_curve: Option<ForecastCurve>,
    /// Newest year first.
    pub bars: Vec<YearBars>,
    pub stats: GrowthStats,
    pub forecast: Option<ForecastResult>,
}

impl DatasetView {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_bars_totals_and_deltas() {
        let mut months = [0.0; 12];
        months[0] = 100.0;
        months[1] = 150.0;
        months[2] = 75.0;
        let bars = YearBars::new(2024, months);

        assert_eq!(bars.total, 325.0);
        assert_eq!(bars.deltas[0], None);
        assert_eq!(bars.deltas[1], Some(50.0));
        assert_eq!(bars.deltas[2], Some(-50.0));
        assert_eq!(bars.deltas[3], Some(-100.0));
        // Previous month is zero.
        assert_eq!(bars.deltas[4], None);
    }

    #[test]
    fn test_percent_change_guards() {
        assert_eq!(percent_change(f64::NAN, 1.0), None);
        assert_eq!(percent_change(1.0, f64::INFINITY), None);
        assert_eq!(percent_change(0.0, 1.0), None);
        assert_eq!(percent_change(4.0, 5.0), Some(25.0));
    }
}
