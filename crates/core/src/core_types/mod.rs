//! Core types and utilities

pub mod calendar;
pub mod noise;
pub mod record;
pub mod units;

pub use calendar::{day_of_year, DateSpan, DAYS_PER_YEAR, MAX_DAY_OF_YEAR};
pub use noise::{ar1_noise, gaussian_noise, stream_rng, Stream};
pub use record::{DailyRecord, ForcedSeries, TemperatureSeries, DAILY_COLUMNS};
pub use units::{Celsius, CelsiusDelta, GramsPerKilogram, JoulesPerKilogram, MillimetersPerDay};
