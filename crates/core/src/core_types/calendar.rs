//! Calendar spans and day-of-year helpers
//!
//! Every table in the pipeline is indexed by a gap-free daily date sequence.
//! `DateSpan` is the single place that sequence is produced.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::BaselineError;

/// Mean length of a calendar year in days, used by the harmonic and trend terms
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Largest day-of-year ordinal (31 December in a leap year)
pub const MAX_DAY_OF_YEAR: usize = 366;

/// Inclusive calendar range `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    /// First simulated day
    pub start: NaiveDate,
    /// Last simulated day (inclusive)
    pub end: NaiveDate,
}

impl DateSpan {
    /// Create a span, rejecting `start > end`
    ///
    /// # Errors
    /// Returns [`BaselineError::EmptyDateRange`] when the span contains no days.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, BaselineError> {
        if start > end {
            return Err(BaselineError::EmptyDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Span covering whole calendar years `first_year..=last_year`
    ///
    /// # Errors
    /// Returns an error if the years are out of chrono's range or inverted.
    pub fn whole_years(first_year: i32, last_year: i32) -> Result<Self, BaselineError> {
        let start = NaiveDate::from_ymd_opt(first_year, 1, 1).ok_or_else(|| {
            BaselineError::invalid_config("start", format!("year {first_year} is out of range"))
        })?;
        let end = NaiveDate::from_ymd_opt(last_year, 12, 31).ok_or_else(|| {
            BaselineError::invalid_config("end", format!("year {last_year} is out of range"))
        })?;
        Self::new(start, end)
    }

    /// Number of days in the span (always at least 1)
    pub fn len_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    /// Whether `date` falls inside the span
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Gap-free, duplicate-free daily sequence over the span
    pub fn dates(&self) -> Vec<NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(|d| *d <= end).collect()
    }

    /// Calendar years touched by the span, in order
    pub fn years(&self) -> std::ops::RangeInclusive<i32> {
        self.start.year()..=self.end.year()
    }

    /// Position of `date` in [`DateSpan::dates`], if inside the span
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.contains(date)
            .then(|| (date - self.start).num_days() as usize)
    }
}

/// 1-based day-of-year ordinal (1..=366)
#[inline]
pub fn day_of_year(date: NaiveDate) -> usize {
    date.ordinal() as usize
}

/// Date of the given 1-based ordinal in `year`, if it exists
pub fn date_from_day_of_year(year: i32, day_of_year: u32) -> Option<NaiveDate> {
    NaiveDate::from_yo_opt(year, day_of_year)
}

/// Last day of an event of `duration_days` starting at `start`
pub fn event_end(start: NaiveDate, duration_days: u32) -> Option<NaiveDate> {
    start.checked_add_signed(Duration::days(i64::from(duration_days) - 1))
}
