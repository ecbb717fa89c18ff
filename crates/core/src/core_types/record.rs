//! Tables passed between pipeline stages
//!
//! Each stage consumes one of these by reference and returns a new one, so a
//! stage can be tested in isolation and earlier tables stay available for
//! comparison (e.g. temperature before and after injection).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core_types::units::{Celsius, GramsPerKilogram, JoulesPerKilogram, MillimetersPerDay};

/// Generator output: the primary variable before any heatwave injection
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureSeries {
    /// Gap-free daily dates
    pub dates: Vec<NaiveDate>,
    /// Daily mean temperature, aligned with `dates`
    pub temperature: Vec<Celsius>,
}

impl TemperatureSeries {
    /// Number of days
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the series has no days
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Injector output: temperature with known (forced) heatwave days marked
#[derive(Debug, Clone, PartialEq)]
pub struct ForcedSeries {
    /// Gap-free daily dates
    pub dates: Vec<NaiveDate>,
    /// Temperature including every applied bump
    pub temperature: Vec<Celsius>,
    /// Set on each day covered by an applied event, never cleared
    pub is_forced_heatwave: Vec<bool>,
}

impl ForcedSeries {
    /// Number of days
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the series has no days
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl From<TemperatureSeries> for ForcedSeries {
    fn from(series: TemperatureSeries) -> Self {
        let len = series.len();
        Self {
            dates: series.dates,
            temperature: series.temperature,
            is_forced_heatwave: vec![false; len],
        }
    }
}

/// One output row per simulated day
///
/// Field order is the column order of the daily CSV table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Calendar date
    pub date: NaiveDate,
    /// Daily mean temperature
    pub temperature: Celsius,
    /// Day belongs to an injected event
    pub is_forced_heatwave: bool,
    /// Humidity proxy, at least 0.1 g/kg
    pub humidity_proxy: GramsPerKilogram,
    /// Mean precipitation, non-negative
    pub precipitation_mean: MillimetersPerDay,
    /// Rare extreme precipitation, non-negative (0 on most days)
    pub precipitation_extreme: MillimetersPerDay,
    /// Convective energy, non-negative
    pub convective_energy: JoulesPerKilogram,
    /// Detected heatwave run or forced event
    pub is_heatwave: bool,
}

/// Column names of the daily table, in output order
pub const DAILY_COLUMNS: [&str; 8] = [
    "date",
    "temperature",
    "is_forced_heatwave",
    "humidity_proxy",
    "precipitation_mean",
    "precipitation_extreme",
    "convective_energy",
    "is_heatwave",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forced_series_starts_unflagged() {
        let dates: Vec<NaiveDate> = NaiveDate::from_ymd_opt(2019, 1, 1)
            .unwrap()
            .iter_days()
            .take(4)
            .collect();
        let series = TemperatureSeries {
            dates: dates.clone(),
            temperature: vec![Celsius::new(1.0); 4],
        };
        let forced = ForcedSeries::from(series);
        assert_eq!(forced.len(), 4);
        assert_eq!(forced.dates, dates);
        assert!(forced.is_forced_heatwave.iter().all(|f| !f));
    }
}
