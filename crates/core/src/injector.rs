//! Heatwave injector
//!
//! Adds smooth multi-day warm anomalies to a temperature series and marks the
//! affected days as forced heatwaves.
//!
//! # Bump shape
//!
//! `anomaly(t) = sin(π·t) · peak`, with `t` linearly spaced from 0 to 1 over
//! the event's days. The bump is zero on the first and last day and equals the
//! peak at the midpoint, so the series stays continuous.
//!
//! # Boundary policy
//!
//! An event is applied whole or not at all. Events reaching past either end of
//! the series are dropped, never truncated.
//!
//! # Overlaps
//!
//! Events are applied in order on top of whatever the series already holds,
//! so overlapping events compound additively.

use chrono::{Datelike, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, info};

use crate::config::ScheduleConfig;
use crate::core_types::calendar::{date_from_day_of_year, event_end, DateSpan};
use crate::core_types::record::ForcedSeries;
use crate::core_types::units::CelsiusDelta;
use crate::error::BaselineError;

/// One injected warm anomaly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatwaveEvent {
    /// First day of the event
    pub start: NaiveDate,
    /// Number of days, at least 1
    pub duration_days: u32,
    /// Anomaly at the event midpoint
    pub peak_anomaly: CelsiusDelta,
}

impl HeatwaveEvent {
    /// Create an event
    pub fn new(start: NaiveDate, duration_days: u32, peak_anomaly: CelsiusDelta) -> Self {
        Self {
            start,
            duration_days,
            peak_anomaly,
        }
    }

    /// Last day of the event, if representable
    pub fn end(&self) -> Option<NaiveDate> {
        event_end(self.start, self.duration_days)
    }

    /// Check the event can be applied at all
    ///
    /// # Errors
    /// Returns [`BaselineError::InvalidConfig`] for a zero duration or a
    /// non-finite peak.
    pub fn validate(&self, prefix: &str) -> Result<(), BaselineError> {
        if self.duration_days == 0 {
            return Err(BaselineError::invalid_config(
                format!("{prefix}.duration_days"),
                "events must last at least one day",
            ));
        }
        if !self.peak_anomaly.is_finite() {
            return Err(BaselineError::invalid_config(
                format!("{prefix}.peak_anomaly"),
                format!("must be finite, got {}", *self.peak_anomaly),
            ));
        }
        Ok(())
    }

    /// Daily anomalies `sin(π·t)·peak` for `t` in `linspace(0, 1, duration)`
    pub fn bump(&self) -> Vec<CelsiusDelta> {
        half_sine_bump(self.duration_days as usize, self.peak_anomaly)
    }
}

/// Half-sine profile over `days` samples, zero at both ends, `peak` at the midpoint
///
/// A single-day profile is `t = [0]`, i.e. a zero anomaly.
pub fn half_sine_bump(days: usize, peak: CelsiusDelta) -> Vec<CelsiusDelta> {
    match days {
        0 => Vec::new(),
        1 => vec![CelsiusDelta::new(0.0)],
        n => {
            let last = (n - 1) as f64;
            (0..n)
                .map(|i| peak * (PI * (i as f64 / last)).sin())
                .collect()
        }
    }
}

/// Result of one injection pass
#[derive(Debug, Clone, PartialEq)]
pub struct Injection {
    /// Series with all applied bumps and flags
    pub series: ForcedSeries,
    /// Events applied, in application order
    pub applied: Vec<HeatwaveEvent>,
    /// Events dropped because they did not fit inside the series
    pub discarded: Vec<HeatwaveEvent>,
}

/// Apply `events` in order to a copy of `series`
///
/// Existing forced flags are kept; temperature changes accumulate.
///
/// # Errors
/// Returns an error if an event fails [`HeatwaveEvent::validate`].
pub fn inject(series: &ForcedSeries, events: &[HeatwaveEvent]) -> Result<Injection, BaselineError> {
    let mut out = series.clone();
    let mut applied = Vec::new();
    let mut discarded = Vec::new();

    let (Some(&first), Some(&last)) = (series.dates.first(), series.dates.last()) else {
        return Ok(Injection {
            series: out,
            applied,
            discarded: events.to_vec(),
        });
    };

    for (i, event) in events.iter().enumerate() {
        event.validate(&format!("events[{i}]"))?;

        let fits = event
            .end()
            .is_some_and(|end| event.start >= first && end <= last);
        if !fits {
            debug!(
                start = %event.start,
                duration_days = event.duration_days,
                "Discarding heatwave event outside the series"
            );
            discarded.push(*event);
            continue;
        }

        let offset = (event.start - first).num_days() as usize;
        for (k, anomaly) in event.bump().into_iter().enumerate() {
            out.temperature[offset + k] += anomaly;
            out.is_forced_heatwave[offset + k] = true;
        }
        applied.push(*event);
    }

    Ok(Injection {
        series: out,
        applied,
        discarded,
    })
}

/// Draw a randomized schedule for every calendar year touched by `span`
///
/// Per year: an event count from `events_per_year`; per event a start
/// day-of-year from `start_day_window`, a duration and a peak anomaly. Start
/// days that do not exist in a year (366 in a common year) are skipped.
///
/// # Errors
/// Returns an error if `schedule` fails [`ScheduleConfig::validate`]; nothing
/// is drawn in that case.
pub fn draw_schedule<R: Rng + ?Sized>(
    span: &DateSpan,
    schedule: &ScheduleConfig,
    rng: &mut R,
) -> Result<Vec<HeatwaveEvent>, BaselineError> {
    schedule.validate("injection.schedule")?;
    let mut events = Vec::new();
    for year in span.years() {
        let count = rng.random_range(schedule.events_per_year.min..=schedule.events_per_year.max);
        for _ in 0..count {
            let doy = rng.random_range(schedule.start_day_window.min..=schedule.start_day_window.max);
            let duration = rng.random_range(schedule.duration_days.min..=schedule.duration_days.max);
            let peak = if schedule.peak_anomaly.min == schedule.peak_anomaly.max {
                schedule.peak_anomaly.min
            } else {
                rng.random_range(schedule.peak_anomaly.min..=schedule.peak_anomaly.max)
            };
            if let Some(start) = date_from_day_of_year(year, doy) {
                events.push(HeatwaveEvent::new(start, duration, CelsiusDelta::new(peak)));
            } else {
                debug!(year, doy, "Scheduled start day does not exist in year");
            }
        }
    }
    info!(
        events = events.len(),
        first_year = span.start.year(),
        last_year = span.end.year(),
        "Drew heatwave schedule"
    );
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UniformRange;
    use crate::core_types::noise::{stream_rng, Stream};
    use crate::core_types::record::TemperatureSeries;
    use crate::core_types::units::Celsius;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn flat_series(first: i32, last: i32, value: f64) -> ForcedSeries {
        let dates = DateSpan::whole_years(first, last).unwrap().dates();
        let temperature = vec![Celsius::new(value); dates.len()];
        TemperatureSeries { dates, temperature }.into()
    }

    #[test]
    fn test_bump_shape() {
        let bump = half_sine_bump(7, CelsiusDelta::new(8.0));
        assert_eq!(bump.len(), 7);
        assert_relative_eq!(*bump[0], 0.0);
        assert_relative_eq!(*bump[3], 8.0);
        assert_relative_eq!(*bump[6], 0.0, epsilon = 1e-12);
        assert_relative_eq!(*bump[1], *bump[5], epsilon = 1e-12);
        assert!(bump.iter().all(|b| **b >= -1e-12 && **b <= 8.0));
    }

    #[test]
    fn test_single_day_bump_is_zero() {
        assert_eq!(half_sine_bump(1, CelsiusDelta::new(5.0)), vec![CelsiusDelta::new(0.0)]);
        assert!(half_sine_bump(0, CelsiusDelta::new(5.0)).is_empty());
    }

    #[test]
    fn test_inject_adds_bump_and_flags() {
        let series = flat_series(2015, 2015, 20.0);
        let event = HeatwaveEvent::new(date(2015, 7, 1), 7, CelsiusDelta::new(8.0));
        let result = inject(&series, &[event]).unwrap();

        assert_eq!(result.applied, vec![event]);
        assert!(result.discarded.is_empty());
        let offset = 181;
        assert_eq!(result.series.dates[offset], date(2015, 7, 1));
        assert_relative_eq!(*result.series.temperature[offset + 3], 28.0);
        let flagged: usize = result.series.is_forced_heatwave.iter().filter(|f| **f).count();
        assert_eq!(flagged, 7);
        assert!(result.series.is_forced_heatwave[offset..offset + 7].iter().all(|f| *f));
        // Input table untouched
        assert!(series.is_forced_heatwave.iter().all(|f| !f));
    }

    #[test]
    fn test_event_past_end_is_discarded_whole() {
        let series = flat_series(2019, 2019, 20.0);
        let event = HeatwaveEvent::new(date(2019, 12, 29), 10, CelsiusDelta::new(8.0));
        let result = inject(&series, &[event]).unwrap();
        assert!(result.applied.is_empty());
        assert_eq!(result.discarded, vec![event]);
        assert_eq!(result.series, series);
    }

    #[test]
    fn test_event_before_start_is_discarded() {
        let series = flat_series(2019, 2019, 20.0);
        let event = HeatwaveEvent::new(date(2018, 12, 30), 5, CelsiusDelta::new(4.0));
        let result = inject(&series, &[event]).unwrap();
        assert_eq!(result.discarded.len(), 1);
        assert_eq!(result.series, series);
    }

    #[test]
    fn test_event_ending_on_last_day_is_applied() {
        let series = flat_series(2019, 2019, 20.0);
        let event = HeatwaveEvent::new(date(2019, 12, 29), 3, CelsiusDelta::new(2.0));
        let result = inject(&series, &[event]).unwrap();
        assert_eq!(result.applied.len(), 1);
        assert!(*result.series.is_forced_heatwave.last().unwrap());
    }

    #[test]
    fn test_overlapping_events_compound() {
        let series = flat_series(2015, 2015, 20.0);
        let event = HeatwaveEvent::new(date(2015, 7, 1), 5, CelsiusDelta::new(3.0));
        let result = inject(&series, &[event, event]).unwrap();
        assert_eq!(result.applied.len(), 2);
        assert_relative_eq!(*result.series.temperature[181 + 2], 26.0);
    }

    #[test]
    fn test_flags_are_never_cleared() {
        let series = flat_series(2015, 2015, 20.0);
        let first = inject(
            &series,
            &[HeatwaveEvent::new(date(2015, 6, 1), 4, CelsiusDelta::new(3.0))],
        )
        .unwrap();
        let second = inject(
            &first.series,
            &[HeatwaveEvent::new(date(2015, 8, 1), 4, CelsiusDelta::new(3.0))],
        )
        .unwrap();
        for (before, after) in first
            .series
            .is_forced_heatwave
            .iter()
            .zip(&second.series.is_forced_heatwave)
        {
            assert!(!before || *after);
        }
        assert_eq!(second.series.is_forced_heatwave.iter().filter(|f| **f).count(), 8);
    }

    #[test]
    fn test_zero_duration_is_an_error() {
        let series = flat_series(2015, 2015, 20.0);
        let event = HeatwaveEvent::new(date(2015, 7, 1), 0, CelsiusDelta::new(3.0));
        assert!(inject(&series, &[event]).is_err());
    }

    #[test]
    fn test_schedule_respects_configured_ranges() {
        let span = DateSpan::whole_years(2010, 2019).unwrap();
        let schedule = ScheduleConfig::default();
        let events = draw_schedule(&span, &schedule, &mut stream_rng(9, Stream::Schedule)).unwrap();

        assert!(events.len() >= 10 && events.len() <= 30);
        for year in span.years() {
            let n = events.iter().filter(|e| e.start.year() == year).count();
            assert!((1..=3).contains(&n), "year {year} has {n} events");
        }
        for e in &events {
            assert!((152..=244).contains(&e.start.ordinal()));
            assert!((3..=10).contains(&e.duration_days));
            assert!((2.0..=8.0).contains(&*e.peak_anomaly));
        }

        let again = draw_schedule(&span, &schedule, &mut stream_rng(9, Stream::Schedule)).unwrap();
        assert_eq!(events, again);
    }

    #[test]
    fn test_fixed_schedule_ranges() {
        let span = DateSpan::whole_years(2012, 2012).unwrap();
        let schedule = ScheduleConfig {
            events_per_year: UniformRange::new(2, 2),
            start_day_window: UniformRange::new(200, 200),
            duration_days: UniformRange::new(5, 5),
            peak_anomaly: UniformRange::new(4.0, 4.0),
        };
        let events = draw_schedule(&span, &schedule, &mut stream_rng(1, Stream::Schedule)).unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.start == date(2012, 7, 18) && *e.peak_anomaly == 4.0));
    }

    #[test]
    fn test_missing_leap_day_start_is_skipped() {
        // 2019 has no day 366, so every drawn event is dropped
        let span = DateSpan::whole_years(2019, 2019).unwrap();
        let schedule = ScheduleConfig {
            events_per_year: UniformRange::new(2, 2),
            start_day_window: UniformRange::new(366, 366),
            duration_days: UniformRange::new(3, 3),
            peak_anomaly: UniformRange::new(4.0, 4.0),
        };
        let events = draw_schedule(&span, &schedule, &mut stream_rng(2, Stream::Schedule)).unwrap();
        assert!(events.is_empty());

        // 2020 has it, so both events start on 31 December
        let leap = DateSpan::whole_years(2020, 2020).unwrap();
        let events = draw_schedule(&leap, &schedule, &mut stream_rng(2, Stream::Schedule)).unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.start == date(2020, 12, 31)));
    }

    #[test]
    fn test_invalid_schedule_is_an_error() {
        let span = DateSpan::whole_years(2010, 2012).unwrap();
        let field_of = |schedule: ScheduleConfig| {
            match draw_schedule(&span, &schedule, &mut stream_rng(3, Stream::Schedule)) {
                Err(BaselineError::InvalidConfig { field, .. }) => field,
                other => panic!("expected InvalidConfig, got {other:?}"),
            }
        };

        let inverted = ScheduleConfig {
            events_per_year: UniformRange::new(3, 1),
            ..ScheduleConfig::default()
        };
        assert_eq!(field_of(inverted), "injection.schedule.events_per_year");

        let zero_length = ScheduleConfig {
            duration_days: UniformRange::new(0, 5),
            ..ScheduleConfig::default()
        };
        assert_eq!(field_of(zero_length), "injection.schedule.duration_days");

        let nan_peak = ScheduleConfig {
            peak_anomaly: UniformRange::new(f64::NAN, 4.0),
            ..ScheduleConfig::default()
        };
        assert_eq!(field_of(nan_peak), "injection.schedule.peak_anomaly");
    }
}
