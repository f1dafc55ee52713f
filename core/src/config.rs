use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::time::{year_end, year_start};

/// Leap year, so Feb 29 readings still land on the overlay axis.
pub const DEFAULT_REFERENCE_YEAR: i32 = 2000;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Calendar year every year's curve is drawn on.
    pub reference_year: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reference_year: DEFAULT_REFERENCE_YEAR,
        }
    }
}

impl EngineConfig {
    /// Fails for years chrono cannot represent from Jan 1 through Dec 31,
    /// since every curve starts at the reference year's Jan 1.
    pub fn with_reference_year(reference_year: i32) -> Result<Self> {
        if year_start(reference_year).is_none() || year_end(reference_year).is_none() {
            return Err(anyhow!("Reference year {} is out of range", reference_year));
        }
        Ok(Self { reference_year })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_year_range() {
        assert_eq!(EngineConfig::with_reference_year(2020).unwrap().reference_year, 2020);
        assert_eq!(EngineConfig::with_reference_year(1).unwrap().reference_year, 1);
        assert!(EngineConfig::with_reference_year(i32::MAX).is_err());
        assert!(EngineConfig::with_reference_year(i32::MIN).is_err());
        assert!(EngineConfig::with_reference_year(1_000_000).is_err());
    }

    #[test]
    fn test_default_is_leap_year_2000() {
        assert_eq!(EngineConfig::default().reference_year, 2000);
    }
}
