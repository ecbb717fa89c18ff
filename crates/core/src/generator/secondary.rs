//! Secondary variables derived from temperature
//!
//! - humidity proxy: `intercept + slope·T + humidity signal`, floored at 0.1 g/kg
//! - convective energy: `intercept + a·T + b·q + N(0, σ)`, floored at 0 J/kg
//! - mean precipitation: its own seasonal/trend/AR(1) signal, floored at 0
//! - precipitation extremes: Bernoulli(p) gate on a uniform magnitude
//!
//! On heatwave days precipitation and humidity are suppressed and convective
//! energy is perturbed by uniform multiplicative factors. All base values are
//! drawn before the factors, from separate streams, so a day's unsuppressed
//! value does not depend on which days are heatwave days.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::config::{BaselineConfig, UniformRange};
use crate::core_types::noise::{gaussian_noise, stream_rng, Stream};
use crate::core_types::record::{DailyRecord, ForcedSeries};
use crate::core_types::units::{GramsPerKilogram, JoulesPerKilogram, MillimetersPerDay};
use crate::error::BaselineError;
use crate::generator::generate_signal;

/// Lower bound of the humidity proxy (g/kg)
pub const HUMIDITY_FLOOR: f64 = 0.1;

/// Random generators for every secondary variable
#[derive(Debug, Clone)]
pub struct SecondaryRngs<R> {
    /// Humidity signal noise
    pub humidity: R,
    /// Mean precipitation AR(1) noise
    pub precipitation: R,
    /// Convective energy noise
    pub convective: R,
    /// Extreme precipitation gate and magnitude
    pub extremes: R,
    /// Heatwave-day scaling factors
    pub effects: R,
}

impl SecondaryRngs<ChaCha8Rng> {
    /// Streams derived from a master seed
    pub fn from_seed(seed: u64) -> Self {
        Self {
            humidity: stream_rng(seed, Stream::Humidity),
            precipitation: stream_rng(seed, Stream::Precipitation),
            convective: stream_rng(seed, Stream::Convective),
            extremes: stream_rng(seed, Stream::Extremes),
            effects: stream_rng(seed, Stream::HeatwaveEffects),
        }
    }
}

#[inline]
fn draw<R: Rng + ?Sized>(rng: &mut R, range: UniformRange<f64>) -> f64 {
    if range.min == range.max {
        range.min
    } else {
        rng.random_range(range.min..=range.max)
    }
}

/// Build the daily output table from the forced series and final heatwave flags
///
/// # Errors
/// Returns an error if `is_heatwave` is not aligned with `series` or any of
/// the humidity, precipitation, convective, extreme or heatwave-effect
/// parameters are invalid. Nothing is drawn in that case.
pub fn derive_secondary<R: Rng>(
    series: &ForcedSeries,
    is_heatwave: &[bool],
    config: &BaselineConfig,
    rngs: &mut SecondaryRngs<R>,
) -> Result<Vec<DailyRecord>, BaselineError> {
    if is_heatwave.len() != series.len() {
        return Err(BaselineError::invalid_config(
            "is_heatwave",
            format!(
                "flag column has {} rows but the series has {}",
                is_heatwave.len(),
                series.len()
            ),
        ));
    }
    config.humidity.validate("humidity")?;
    config.precipitation.validate("precipitation")?;
    config.convective.validate("convective")?;
    config.extremes.validate("extremes")?;
    config.heatwave_effects.validate("heatwave_effects")?;

    let len = series.len();
    let humidity_signal = generate_signal(
        &series.dates,
        &config.humidity.signal,
        "humidity.signal",
        &mut rngs.humidity,
    )?;
    let precipitation_signal = generate_signal(
        &series.dates,
        &config.precipitation,
        "precipitation",
        &mut rngs.precipitation,
    )?;
    let convective_noise = gaussian_noise(
        &mut rngs.convective,
        len,
        config.convective.noise_sd,
        "convective",
    )?;

    let humidity = &config.humidity;
    let convective = &config.convective;
    let extremes = &config.extremes;
    let effects = &config.heatwave_effects;

    let mut records = Vec::with_capacity(len);
    let mut heatwave_days = 0usize;
    for i in 0..len {
        let t = *series.temperature[i];

        let mut q = (humidity.intercept + humidity.temperature_slope * t + humidity_signal[i])
            .max(HUMIDITY_FLOOR);
        let mut energy = (convective.intercept
            + convective.temperature_slope * t
            + convective.humidity_slope * q
            + convective_noise[i])
            .max(0.0);
        let mut precipitation = precipitation_signal[i].max(0.0);

        let extreme = if rngs.extremes.random_bool(extremes.probability) {
            draw(&mut rngs.extremes, extremes.magnitude)
        } else {
            0.0
        };

        if is_heatwave[i] {
            heatwave_days += 1;
            precipitation *= draw(&mut rngs.effects, effects.precipitation_factor);
            q = (q * draw(&mut rngs.effects, effects.humidity_factor)).max(HUMIDITY_FLOOR);
            energy *= draw(&mut rngs.effects, effects.convective_factor);
        }

        records.push(DailyRecord {
            date: series.dates[i],
            temperature: series.temperature[i],
            is_forced_heatwave: series.is_forced_heatwave[i],
            humidity_proxy: GramsPerKilogram::new(q),
            precipitation_mean: MillimetersPerDay::new(precipitation),
            precipitation_extreme: MillimetersPerDay::new(extreme),
            convective_energy: JoulesPerKilogram::new(energy),
            is_heatwave: is_heatwave[i],
        });
    }

    debug!(days = len, heatwave_days, "Derived secondary variables");
    Ok(records)
}
