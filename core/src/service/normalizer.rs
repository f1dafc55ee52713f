use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{finite, Reading};
use crate::service::interpolator::{try_value_at, value_at};
use crate::time::{format_date, is_year_end, to_reference_year, year_end, year_start};

/// Readings grouped by calendar year, each group ascending by date.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct YearGroups {
    groups: BTreeMap<i32, Vec<Reading>>,
}

impl YearGroups {
    pub fn from_series(series: &[Reading]) -> Self {
        let mut groups: BTreeMap<i32, Vec<Reading>> = BTreeMap::new();
        for reading in series {
            groups.entry(reading.date.year()).or_default().push(*reading);
        }
        Self { groups }
    }

    /// Years with data, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.groups.keys().copied().collect()
    }

    pub fn get(&self, year: i32) -> Option<&[Reading]> {
        self.groups.get(&year).map(Vec::as_slice)
    }

    pub fn first(&self, year: i32) -> Option<&Reading> {
        self.groups.get(&year).and_then(|g| g.first())
    }

    pub fn last(&self, year: i32) -> Option<&Reading> {
        self.groups.get(&year).and_then(|g| g.last())
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, &[Reading])> {
        self.groups.iter().map(|(y, g)| (*y, g.as_slice()))
    }

    /// All readings, synthetic ones included, ascending.
    pub fn flatten(&self) -> Vec<Reading> {
        self.groups.values().flatten().copied().collect()
    }

    /// Closes every year that has a following year with data by adding an
    /// interpolated Dec 31 reading.
    ///
    /// A year is only closed when it has no Dec 31 reading yet and its last
    /// reading and the next year's first reading lie strictly on either side of
    /// Dec 31. The trailing year stays open. Running this twice adds nothing.
    pub fn inject_year_end_points(&mut self) {
        let years = self.years();
        for pair in years.windows(2) {
            let (year, next_year) = (pair[0], pair[1]);

            let (Some(list), Some(next_list)) = (self.groups.get(&year), self.groups.get(&next_year))
            else {
                continue;
            };
            if list.iter().any(|r| is_year_end(r.date)) {
                continue;
            }
            let (Some(last_this), Some(first_next)) = (list.last(), next_list.first()) else {
                continue;
            };
            let Some(dec31) = year_end(year) else {
                continue;
            };

            if last_this.date < dec31 && first_next.date > dec31 {
                let synthetic = Reading::new(dec31, value_at(dec31, last_this, first_next));
                debug!(year, date = %format_date(dec31), value = synthetic.value, "closing year");

                if let Some(list) = self.groups.get_mut(&year) {
                    list.push(synthetic);
                    list.sort_by_key(|r| r.date);
                }
            }
        }
    }
}

/// Per-year zero points for the overlay.
pub type YearBaselines = BTreeMap<i32, f64>;

/// Computes each year's baseline from (already closed) year groups.
///
/// The earliest year starts at its own first value. Later years start at the
/// value interpolated on Jan 1 between the previous year's last reading and
/// their own first reading, or at their first value when that bracket is
/// unusable.
pub fn compute_baselines(groups: &YearGroups) -> YearBaselines {
    let mut baselines = YearBaselines::new();
    let mut prev_last: Option<&Reading> = None;

    for (year, list) in groups.iter() {
        let Some(first) = list.first() else {
            continue;
        };

        let baseline = match (prev_last, year_start(year)) {
            (Some(prev), Some(jan1)) => try_value_at(jan1, prev, first).unwrap_or(first.value),
            _ => first.value,
        };
        baselines.insert(year, baseline);
        prev_last = list.last();
    }
    baselines
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    /// Date moved onto the reference year.
    pub x: NaiveDate,
    /// Value relative to the year's baseline; `None` is a gap.
    pub y: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct YearCurve {
    pub year: i32,
    pub points: Vec<ChartPoint>,
}

/// Projects one year's readings onto the reference year, relative to
/// `baseline`, always starting with `(Jan 1, 0)`.
pub fn project_year(year: i32, readings: &[Reading], baseline: f64, reference_year: i32) -> YearCurve {
    let mut points = Vec::with_capacity(readings.len() + 1);
    if let Some(origin) = year_start(reference_year) {
        points.push(ChartPoint { x: origin, y: Some(0.0) });
    }

    for reading in readings {
        let Some(x) = to_reference_year(reading.date, reference_year) else {
            debug!(date = %reading.date, reference_year, "date has no counterpart in reference year");
            continue;
        };
        points.push(ChartPoint {
            x,
            y: finite(reading.value - baseline),
        });
    }

    YearCurve { year, points }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NormalizedYears {
    pub groups: YearGroups,
    pub baselines: YearBaselines,
    pub curves: Vec<YearCurve>,
}

impl NormalizedYears {
    pub fn baseline(&self, year: i32) -> Option<f64> {
        self.baselines.get(&year).copied()
    }
}

/// Groups `series` by year, closes finished years, computes baselines and the
/// overlay curves.
pub fn normalize(series: &[Reading], reference_year: i32) -> NormalizedYears {
    let mut groups = YearGroups::from_series(series);
    groups.inject_year_end_points();

    let baselines = compute_baselines(&groups);
    let curves = groups
        .iter()
        .filter_map(|(year, list)| {
            let baseline = *baselines.get(&year)?;
            Some(project_year(year, list, baseline, reference_year))
        })
        .collect();

    NormalizedYears {
        groups,
        baselines,
        curves,
    }
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
    fn test_closed_year_gets_dec31() {
        let series = vec![r("2024-11-01", 100.0), r("2025-02-01", 192.0)];
        let result = normalize(&series, 2000);

        let group_2024 = result.groups.get(2024).unwrap();
        assert_eq!(group_2024.len(), 2);
        let dec31 = group_2024.last().unwrap();
        assert_eq!(dec31.date, d("2024-12-31"));
        // 60 of 92 days at 1 unit per day.
        assert!((dec31.value - 160.0).abs() < EPS);

        // 2025 interpolates Jan 1 between the synthetic point and Feb 1.
        let expected = 160.0 + (192.0 - 160.0) / 32.0;
        assert!((result.baseline(2025).unwrap() - expected).abs() < EPS);
        assert_eq!(result.baseline(2024), Some(100.0));
    }

    #[test]
    fn test_trailing_year_stays_open() {
        let series = vec![r("2024-11-01", 100.0), r("2025-02-01", 192.0)];
        let result = normalize(&series, 2000);
        assert_eq!(result.groups.get(2025).unwrap().len(), 1);
    }

    #[test]
    fn test_existing_dec31_is_kept() {
        let series = vec![
            r("2024-06-01", 10.0),
            r("2024-12-31", 50.0),
            r("2025-01-15", 60.0),
        ];
        let result = normalize(&series, 2000);
        let group = result.groups.get(2024).unwrap();
        assert_eq!(group.len(), 2);
        assert_eq!(group[1].value, 50.0);
    }

    #[test]
    fn test_next_year_starting_jan1_is_not_a_straddle() {
        // First reading of the next year on Jan 1 is still strictly after Dec 31.
        let series = vec![r("2024-12-01", 0.0), r("2025-01-01", 31.0)];
        let result = normalize(&series, 2000);
        let dec31 = result.groups.last(2024).unwrap();
        assert_eq!(dec31.date, d("2024-12-31"));
        assert!((dec31.value - 30.0).abs() < EPS);
        assert!((result.baseline(2025).unwrap() - 31.0).abs() < EPS);
    }

    #[test]
    fn test_injection_is_idempotent() {
        let series = vec![
            r("2023-03-01", 0.0),
            r("2024-11-01", 100.0),
            r("2025-02-01", 192.0),
        ];
        let mut groups = YearGroups::from_series(&series);
        groups.inject_year_end_points();
        let once = groups.clone();
        groups.inject_year_end_points();
        assert_eq!(groups, once);

        // Feeding the synthesized output back in changes nothing either.
        let again = normalize(&once.flatten(), 2000);
        assert_eq!(again.groups, once);
        for year in [2023, 2024] {
            let dec31s = again
                .groups
                .get(year)
                .unwrap()
                .iter()
                .filter(|r| is_year_end(r.date))
                .count();
            assert_eq!(dec31s, 1);
        }
    }

    #[test]
    fn test_curves_start_at_zero() {
        let series = vec![
            r("2023-05-01", 10.0),
            r("2023-09-01", 40.0),
            r("2024-02-29", 70.0),
            r("2024-08-01", 95.0),
        ];
        let result = normalize(&series, 2000);
        assert_eq!(result.curves.len(), 2);
        for curve in &result.curves {
            assert_eq!(curve.points[0], ChartPoint { x: d("2000-01-01"), y: Some(0.0) });
        }

        // The earliest year is relative to its own first value.
        let c2023 = &result.curves[0];
        assert_eq!(c2023.points[1], ChartPoint { x: d("2000-05-01"), y: Some(0.0) });
        assert_eq!(c2023.points[2], ChartPoint { x: d("2000-09-01"), y: Some(30.0) });
        // Synthetic Dec 31 shows up as a point too.
        assert_eq!(c2023.points.last().unwrap().x, d("2000-12-31"));

        let c2024 = &result.curves[1];
        assert_eq!(c2024.points[1].x, d("2000-02-29"));
    }

    #[test]
    fn test_non_finite_value_becomes_gap() {
        let series = vec![r("2024-01-05", 10.0), r("2024-02-05", f64::NAN)];
        let result = normalize(&series, 2000);
        assert_eq!(result.curves[0].points[2].y, None);
    }

    #[test]
    fn test_year_gap_bridges_to_next_year_with_data() {
        let series = vec![r("2022-12-01", 0.0), r("2024-01-31", 426.0)];
        let result = normalize(&series, 2000);
        assert_eq!(result.groups.last(2022).unwrap().date, d("2022-12-31"));
        // Jan 1 2024 lies inside the bridged span: 396 days after Dec 31 2022.
        let dec31 = result.groups.last(2022).unwrap().value;
        let rate = (426.0 - dec31) / 396.0;
        let expected = dec31 + rate * 366.0;
        assert!((result.baseline(2024).unwrap() - expected).abs() < EPS);
    }

    #[test]
    fn test_empty_series() {
        let result = normalize(&[], 2000);
        assert!(result.curves.is_empty());
        assert!(result.baselines.is_empty());
    }
}
