use std::collections::BTreeSet;

use chrono::Datelike;
use tracing::debug;

use crate::config::EngineConfig;
use crate::model::{Dataset, Reading};
use crate::service::allocator::{month_totals, MonthTotals};
use crate::service::dto::{DatasetView, ForecastCurve, MonthForecast, YearBars};
use crate::service::forecast::{forecast, ForecastResult};
use crate::service::normalizer::{normalize, NormalizedYears};
use crate::service::stats::growth_stats;

/// Assembles line curves, month bars, the forecast and growth stats for a
/// dataset. Everything is recomputed on each call.
pub struct DashboardUseCase<'a> {
    config: &'a EngineConfig,
}

impl<'a> DashboardUseCase<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// `None` when the dataset has no usable readings.
    pub fn build(&self, dataset: &Dataset) -> Option<DatasetView> {
        let series = dataset.series();
        if series.is_empty() {
            debug!(dataset = %dataset.name, "no readings, nothing to show");
            return None;
        }

        // The three derivations only read the series.
        let totals = month_totals(&series);
        let normalized = normalize(&series, self.config.reference_year);
        let forecast = forecast(&series);

        let forecast_curve = forecast
            .as_ref()
            .and_then(|f| self.forecast_curve(f, &normalized));
        let bars = year_bars(&series, &totals, forecast.as_ref());
        let stats = growth_stats(&series, &normalized.groups, &normalized.baselines);

        Some(DatasetView {
            name: dataset.name.clone(),
            curves: normalized.curves,
            forecast_curve,
            bars,
            stats,
            forecast,
        })
    }

    fn forecast_curve(&self, forecast: &ForecastResult, normalized: &NormalizedYears) -> Option<ForecastCurve> {
        let baseline = normalized.baseline(forecast.year)?;
        let points = forecast.segment(baseline, self.config.reference_year)?;
        Some(ForecastCurve {
            year: forecast.year,
            points: points.to_vec(),
        })
    }
}

/// One bar row per year present in the readings or the month totals, newest
/// first. The forecast month carries its projection.
pub fn year_bars(series: &[Reading], totals: &MonthTotals, forecast: Option<&ForecastResult>) -> Vec<YearBars> {
    let mut years: BTreeSet<i32> = series.iter().map(|r| r.date.year()).collect();
    years.extend(totals.years());

    years
        .into_iter()
        .rev()
        .map(|year| {
            let mut bars = YearBars::new(year, totals.year_row(year));
            if let Some(f) = forecast.filter(|f| f.year == year) {
                let index = (f.month - 1) as usize;
                bars.forecast = Some(MonthForecast {
                    month: f.month,
                    actual_so_far: bars.months[index],
                    projected_total: f.projected_month_total,
                });
            }
            bars
        })
        .collect()
}
