use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{finite, Reading};
use crate::service::normalizer::{YearBaselines, YearGroups};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct YearGrowth {
    pub year: i32,
    pub growth: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GrowthStats {
    pub years: Vec<YearGrowth>,
    pub total: Option<f64>,
}

/// Growth per year (last value in the year, synthetic Dec 31 included, minus
/// the year's baseline) and over the whole series (last minus first).
pub fn growth_stats(series: &[Reading], groups: &YearGroups, baselines: &YearBaselines) -> GrowthStats {
    let years = groups
        .years()
        .into_iter()
        .map(|year| {
            let growth = match (groups.last(year), baselines.get(&year)) {
                (Some(last), Some(baseline)) => finite(last.value - baseline),
                _ => None,
            };
            YearGrowth { year, growth }
        })
        .collect();

    let total = match (series.first(), series.last()) {
        (Some(first), Some(last)) => finite(last.value - first.value),
        _ => None,
    };

    GrowthStats { years, total }
}

fn write_rounded(f: &mut fmt::Formatter<'_>, value: Option<f64>) -> fmt::Result {
    match value {
        // Rounding small negatives gives -0.0, which would print as "-0".
        Some(v) => {
            let v = v.round();
            write!(f, "{}", if v == 0.0 { 0.0 } else { v })
        }
        None => write!(f, "n/a"),
    }
}

impl fmt::Display for GrowthStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in &self.years {
            write!(f, "{}: ", y.year)?;
            write_rounded(f, y.growth)?;
            write!(f, " | ")?;
        }
        write!(f, "Total: ")?;
        write_rounded(f, self.total)
    }
}
