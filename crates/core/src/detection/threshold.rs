//! Day-of-year threshold climatology
//!
//! For each calendar day-of-year, pools the temperature of every year in the
//! series and takes a percentile (90th by default).
//!
//! # Percentile convention
//!
//! Linear interpolation between closest ranks: with the pooled values sorted
//! ascending as `x[0..n]`, the position is `h = (n − 1)·p/100` and the result
//! `x[⌊h⌋] + (h − ⌊h⌋)·(x[⌊h⌋+1] − x[⌊h⌋])`. This is the default of the common
//! array libraries and matters for borderline days.
//!
//! Day 366 only exists in leap years, so its pool is small (often a single
//! value, which then equals the threshold). It is not merged with day 365.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core_types::calendar::{day_of_year, MAX_DAY_OF_YEAR};
use crate::core_types::units::Celsius;
use crate::error::BaselineError;

/// Threshold of one day-of-year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayOfYearThreshold {
    /// 1-based day-of-year
    pub day_of_year: u16,
    /// Configured percentile (90th by default) of the pooled temperatures
    pub p90_temperature: Celsius,
}

/// Percentile `p` (0..=100) of `values` by linear interpolation
///
/// Returns `None` for an empty slice.
pub fn percentile_linear(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let h = (sorted.len() - 1) as f64 * (p / 100.0);
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = h - h.floor();
    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

/// Per-day-of-year thresholds for a series
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdClimatology {
    percentile: f64,
    // Index 0 is unused so day-of-year indexes directly
    thresholds: Vec<Option<Celsius>>,
}

impl ThresholdClimatology {
    /// Pool `temperature` by the day-of-year of `dates` and take `percentile`
    ///
    /// # Errors
    /// Returns an error if the columns are misaligned or `percentile` is not in (0, 100].
    pub fn compute(
        dates: &[NaiveDate],
        temperature: &[Celsius],
        percentile: f64,
    ) -> Result<Self, BaselineError> {
        if dates.len() != temperature.len() {
            return Err(BaselineError::invalid_config(
                "temperature",
                format!(
                    "{} temperatures for {} dates",
                    temperature.len(),
                    dates.len()
                ),
            ));
        }
        if !percentile.is_finite() || percentile <= 0.0 || percentile > 100.0 {
            return Err(BaselineError::invalid_config(
                "detection.percentile",
                format!("must lie in (0, 100], got {percentile}"),
            ));
        }

        let mut pools: Vec<Vec<f64>> = vec![Vec::new(); MAX_DAY_OF_YEAR + 1];
        for (date, t) in dates.iter().zip(temperature) {
            pools[day_of_year(*date)].push(**t);
        }

        if pools[MAX_DAY_OF_YEAR].len() == 1 {
            warn!("Day-of-year 366 threshold rests on a single leap-year value");
        }

        let thresholds = pools
            .iter()
            .map(|pool| percentile_linear(pool, percentile).map(Celsius::new))
            .collect();

        Ok(Self {
            percentile,
            thresholds,
        })
    }

    /// Percentile the thresholds were computed at
    pub fn percentile(&self) -> f64 {
        self.percentile
    }

    /// Threshold for a 1-based day-of-year, if any year contributed to it
    pub fn threshold(&self, day_of_year: usize) -> Option<Celsius> {
        self.thresholds.get(day_of_year).copied().flatten()
    }

    /// Threshold applying to `date`
    pub fn threshold_for(&self, date: NaiveDate) -> Option<Celsius> {
        self.threshold(day_of_year(date))
    }

    /// Table rows for every populated day-of-year, in order
    pub fn rows(&self) -> Vec<DayOfYearThreshold> {
        self.thresholds
            .iter()
            .enumerate()
            .filter_map(|(doy, t)| {
                t.map(|p90_temperature| DayOfYearThreshold {
                    day_of_year: doy as u16,
                    p90_temperature,
                })
            })
            .collect()
    }

    /// `temperature > threshold` for each day; days without a threshold are `false`
    pub fn above(&self, dates: &[NaiveDate], temperature: &[Celsius]) -> Vec<bool> {
        dates
            .iter()
            .zip(temperature)
            .map(|(date, t)| self.threshold_for(*date).is_some_and(|th| *t > th))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_percentile_linear_interpolation() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        // h = 9 * 0.9 = 8.1 -> 9 + 0.1 * (10 - 9)
        assert_relative_eq!(percentile_linear(&values, 90.0).unwrap(), 9.1, epsilon = 1e-12);
        assert_relative_eq!(percentile_linear(&values, 50.0).unwrap(), 5.5, epsilon = 1e-12);
        assert_eq!(percentile_linear(&values, 100.0), Some(10.0));
        assert_eq!(percentile_linear(&[3.5], 90.0), Some(3.5));
        assert_eq!(percentile_linear(&[], 90.0), None);
    }

    #[test]
    fn test_percentile_ignores_input_order() {
        let a = percentile_linear(&[5.0, 1.0, 4.0, 2.0, 3.0], 90.0).unwrap();
        let b = percentile_linear(&[1.0, 2.0, 3.0, 4.0, 5.0], 90.0).unwrap();
        assert_eq!(a, b);
        assert_relative_eq!(a, 4.6, epsilon = 1e-12);
    }

    #[test]
    fn test_pools_by_day_of_year() {
        // Ten years of 15 January, temperature equal to the year offset
        let dates: Vec<NaiveDate> = (2010..2020).map(|y| date(y, 1, 15)).collect();
        let temps: Vec<Celsius> = (0..10).map(|i| Celsius::new(f64::from(i))).collect();
        let clim = ThresholdClimatology::compute(&dates, &temps, 90.0).unwrap();

        assert_relative_eq!(*clim.threshold(15).unwrap(), 8.1, epsilon = 1e-12);
        assert_eq!(clim.threshold(16), None);
        assert_eq!(clim.rows().len(), 1);
        assert_eq!(clim.rows()[0].day_of_year, 15);

        let above = clim.above(&dates, &temps);
        assert_eq!(above.iter().filter(|a| **a).count(), 1);
        assert!(above[9]);
    }

    #[test]
    fn test_leap_day_pool_is_not_special_cased() {
        let dates = vec![date(2015, 12, 31), date(2016, 12, 31)];
        let temps = vec![Celsius::new(1.0), Celsius::new(2.0)];
        let clim = ThresholdClimatology::compute(&dates, &temps, 90.0).unwrap();
        assert_eq!(clim.threshold(365), Some(Celsius::new(1.0)));
        assert_eq!(clim.threshold(366), Some(Celsius::new(2.0)));
        // A value equal to its own threshold is not above it
        assert_eq!(clim.above(&dates, &temps), vec![false, false]);
    }

    #[test]
    fn test_rejects_bad_percentile() {
        let dates = vec![date(2015, 1, 1)];
        let temps = vec![Celsius::new(1.0)];
        assert!(ThresholdClimatology::compute(&dates, &temps, 0.0).is_err());
        assert!(ThresholdClimatology::compute(&dates, &temps, 101.0).is_err());
        assert!(ThresholdClimatology::compute(&dates, &[], 90.0).is_err());
    }
}
