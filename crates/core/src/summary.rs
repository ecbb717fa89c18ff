//! Tidy summary tables built from the daily records
//!
//! - episode catalogue: one row per maximal run of `is_heatwave` days
//! - monthly and annual aggregates for downstream statistical modelling

use chrono::{Datelike, NaiveDate};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core_types::record::DailyRecord;
use crate::core_types::units::{Celsius, MillimetersPerDay};
use crate::detection::runs::encode_runs;

/// One contiguous block of heatwave days in the final output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatwaveEpisode {
    /// First heatwave day
    pub start: NaiveDate,
    /// Last heatwave day (inclusive)
    pub end: NaiveDate,
    /// Number of days
    pub length_days: usize,
    /// Hottest day of the episode
    pub peak_temperature: Celsius,
    /// Mean temperature over the episode
    pub mean_temperature: Celsius,
    /// Days of the episode that belong to an injected event
    pub forced_days: usize,
}

/// Catalogue of heatwave episodes in date order
pub fn heatwave_episodes(records: &[DailyRecord]) -> Vec<HeatwaveEpisode> {
    let flags: Vec<bool> = records.iter().map(|r| r.is_heatwave).collect();
    // Runs are encoded over `is_heatwave`, so the run flag marks heatwave runs
    encode_runs(&flags)
        .into_iter()
        .filter(|run| run.all_above_threshold)
        .map(|run| {
            let days = &records[run.indices()];
            let peak = days
                .iter()
                .map(|r| r.temperature)
                .max()
                .unwrap_or_default();
            let mean = days.iter().map(|r| *r.temperature).sum::<f64>() / days.len() as f64;
            HeatwaveEpisode {
                start: days[0].date,
                end: days[days.len() - 1].date,
                length_days: days.len(),
                peak_temperature: peak,
                mean_temperature: Celsius::new(mean),
                forced_days: days.iter().filter(|r| r.is_forced_heatwave).count(),
            }
        })
        .collect()
}

/// Aggregates for one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// Calendar year
    pub year: i32,
    /// Calendar month (1-12)
    pub month: u32,
    /// Days present in the series
    pub days: usize,
    /// Mean daily temperature
    pub mean_temperature: Celsius,
    /// Hottest day
    pub max_temperature: Celsius,
    /// Sum of mean plus extreme precipitation (mm)
    pub total_precipitation: f64,
    /// Days with a non-zero extreme precipitation event
    pub extreme_precipitation_days: usize,
    /// Days flagged `is_heatwave`
    pub heatwave_days: usize,
}

/// Aggregates for one calendar year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualSummary {
    /// Calendar year
    pub year: i32,
    /// Days present in the series
    pub days: usize,
    /// Mean daily temperature
    pub mean_temperature: Celsius,
    /// Hottest day
    pub max_temperature: Celsius,
    /// Sum of mean plus extreme precipitation (mm)
    pub total_precipitation: f64,
    /// Days with a non-zero extreme precipitation event
    pub extreme_precipitation_days: usize,
    /// Days flagged `is_heatwave`
    pub heatwave_days: usize,
    /// Heatwave episodes starting in this year
    pub heatwave_episodes: usize,
}

#[derive(Debug, Default)]
struct Accumulator {
    days: usize,
    temperature_sum: f64,
    max_temperature: Option<Celsius>,
    precipitation: f64,
    extreme_days: usize,
    heatwave_days: usize,
}

impl Accumulator {
    fn push(&mut self, record: &DailyRecord) {
        self.days += 1;
        self.temperature_sum += *record.temperature;
        self.max_temperature = Some(
            self.max_temperature
                .map_or(record.temperature, |m| m.max(record.temperature)),
        );
        self.precipitation += *(record.precipitation_mean + record.precipitation_extreme);
        if record.precipitation_extreme > MillimetersPerDay::ZERO {
            self.extreme_days += 1;
        }
        if record.is_heatwave {
            self.heatwave_days += 1;
        }
    }

    fn mean_temperature(&self) -> Celsius {
        Celsius::new(self.temperature_sum / self.days.max(1) as f64)
    }
}

/// Monthly aggregates, ordered by (year, month)
pub fn monthly_summaries(records: &[DailyRecord]) -> Vec<MonthlySummary> {
    let mut groups: FxHashMap<(i32, u32), Accumulator> = FxHashMap::default();
    for record in records {
        groups
            .entry((record.date.year(), record.date.month()))
            .or_default()
            .push(record);
    }

    let mut rows: Vec<MonthlySummary> = groups
        .into_iter()
        .map(|((year, month), acc)| MonthlySummary {
            year,
            month,
            days: acc.days,
            mean_temperature: acc.mean_temperature(),
            max_temperature: acc.max_temperature.unwrap_or_default(),
            total_precipitation: acc.precipitation,
            extreme_precipitation_days: acc.extreme_days,
            heatwave_days: acc.heatwave_days,
        })
        .collect();
    rows.sort_by_key(|r| (r.year, r.month));
    rows
}

/// Annual aggregates, ordered by year
pub fn annual_summaries(records: &[DailyRecord]) -> Vec<AnnualSummary> {
    let mut groups: FxHashMap<i32, Accumulator> = FxHashMap::default();
    for record in records {
        groups.entry(record.date.year()).or_default().push(record);
    }

    let mut episodes_per_year: FxHashMap<i32, usize> = FxHashMap::default();
    for episode in heatwave_episodes(records) {
        *episodes_per_year.entry(episode.start.year()).or_default() += 1;
    }

    let mut rows: Vec<AnnualSummary> = groups
        .into_iter()
        .map(|(year, acc)| AnnualSummary {
            year,
            days: acc.days,
            mean_temperature: acc.mean_temperature(),
            max_temperature: acc.max_temperature.unwrap_or_default(),
            total_precipitation: acc.precipitation,
            extreme_precipitation_days: acc.extreme_days,
            heatwave_days: acc.heatwave_days,
            heatwave_episodes: episodes_per_year.get(&year).copied().unwrap_or(0),
        })
        .collect();
    rows.sort_by_key(|r| r.year);
    rows
}
