//! Synthetic daily series generator
//!
//! Builds each variable as `baseline + seasonal + trend + AR(1) noise`:
//!
//! - seasonal: annual sine plus semiannual cosine harmonic of the calendar
//!   day-of-year, `A₁·sin(2π·doy/365.25 − φ₁) + A₂·cos(4π·doy/365.25 + φ₂)`
//! - trend: `rate · dayIndex / 365.25`, linear in elapsed years
//! - noise: stationary AR(1) with marginal sd σ and lag-1 correlation φ
//!
//! Temperature is produced first; the secondary variables are derived from it
//! in [`secondary`] once the heatwave flags are known.

pub mod secondary;

pub use secondary::{derive_secondary, SecondaryRngs};

use chrono::NaiveDate;
use rand::Rng;
use std::f64::consts::PI;
use tracing::debug;

use crate::config::SignalParams;
use crate::core_types::calendar::{day_of_year, DateSpan, DAYS_PER_YEAR};
use crate::core_types::noise::ar1_noise;
use crate::core_types::record::TemperatureSeries;
use crate::core_types::units::Celsius;
use crate::error::BaselineError;

/// Annual + semiannual harmonic at a 1-based day-of-year
#[inline]
pub fn seasonal_component(day_of_year: usize, params: &SignalParams) -> f64 {
    let doy = day_of_year as f64;
    params.annual_amplitude * (2.0 * PI * doy / DAYS_PER_YEAR - params.annual_phase).sin()
        + params.semiannual_amplitude * (4.0 * PI * doy / DAYS_PER_YEAR + params.semiannual_phase).cos()
}

/// Linear trend after `day_index` days
#[inline]
pub fn trend_component(day_index: usize, params: &SignalParams) -> f64 {
    params.trend_per_year * (day_index as f64 / DAYS_PER_YEAR)
}

/// Deterministic part (baseline + seasonal + trend) of a signal on each date
pub fn deterministic_signal(dates: &[NaiveDate], params: &SignalParams) -> Vec<f64> {
    dates
        .iter()
        .enumerate()
        .map(|(i, &date)| {
            params.baseline + seasonal_component(day_of_year(date), params) + trend_component(i, params)
        })
        .collect()
}

/// Full signal: deterministic part plus AR(1) noise drawn from `rng`
///
/// `prefix` is the config path of `params`, used in error messages.
///
/// # Errors
/// Returns an error if the AR(1) parameters are invalid.
pub fn generate_signal<R: Rng + ?Sized>(
    dates: &[NaiveDate],
    params: &SignalParams,
    prefix: &str,
    rng: &mut R,
) -> Result<Vec<f64>, BaselineError> {
    let noise = ar1_noise(rng, dates.len(), params.ar_coefficient, params.noise_sd, prefix)?;
    Ok(deterministic_signal(dates, params)
        .into_iter()
        .zip(noise)
        .map(|(signal, n)| signal + n)
        .collect())
}

/// Generate the primary temperature series over `span`
///
/// # Errors
/// Returns an error if `params` fail validation.
pub fn generate_temperature<R: Rng + ?Sized>(
    span: &DateSpan,
    params: &SignalParams,
    rng: &mut R,
) -> Result<TemperatureSeries, BaselineError> {
    params.validate("temperature")?;
    let dates = span.dates();
    let temperature = generate_signal(&dates, params, "temperature", rng)?
        .into_iter()
        .map(Celsius::new)
        .collect();
    debug!(
        days = dates.len(),
        start = %span.start,
        end = %span.end,
        "Generated temperature series"
    );
    Ok(TemperatureSeries { dates, temperature })
}
