//! Seeded random streams and autocorrelated noise
//!
//! Every stochastic quantity draws from its own `ChaCha8` stream derived from the
//! run's master seed, so adding draws to one variable never shifts another.
//! Generators are always passed explicitly; nothing here touches a global RNG.
//!
//! # AR(1) noise
//!
//! `n[0] ~ N(0, σ)`, `n[i] = φ·n[i−1] + √(1−φ²)·N(0, σ)`.
//! The innovation scaling keeps the marginal variance at σ² while giving a
//! lag-1 autocorrelation of φ. Stationarity needs |φ| < 1.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::error::BaselineError;

/// Independent random streams used by one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    /// Temperature AR(1) noise
    Temperature,
    /// Mean precipitation AR(1) noise
    Precipitation,
    /// Humidity proxy noise
    Humidity,
    /// Convective energy noise
    Convective,
    /// Bernoulli gate and magnitude of precipitation extremes
    Extremes,
    /// Randomized heatwave schedule
    Schedule,
    /// Heatwave-day scaling factors
    HeatwaveEffects,
}

impl Stream {
    fn id(self) -> u64 {
        match self {
            Stream::Temperature => 1,
            Stream::Precipitation => 2,
            Stream::Humidity => 3,
            Stream::Convective => 4,
            Stream::Extremes => 5,
            Stream::Schedule => 6,
            Stream::HeatwaveEffects => 7,
        }
    }
}

/// Deterministic generator for `stream` under the master `seed`
pub fn stream_rng(seed: u64, stream: Stream) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(stream.id());
    rng
}

fn normal(sd: f64, prefix: &str) -> Result<Normal<f64>, BaselineError> {
    Normal::new(0.0, sd).map_err(|e| {
        BaselineError::invalid_config(
            format!("{prefix}.noise_sd"),
            format!("invalid standard deviation {sd}: {e}"),
        )
    })
}

/// `len` independent draws from `N(0, sd)`
///
/// `prefix` names the variable in errors (`<prefix>.noise_sd`).
///
/// # Errors
/// Returns an error if `sd` is negative or not finite.
pub fn gaussian_noise<R: Rng + ?Sized>(
    rng: &mut R,
    len: usize,
    sd: f64,
    prefix: &str,
) -> Result<Vec<f64>, BaselineError> {
    let dist = normal(sd, prefix)?;
    Ok((0..len).map(|_| dist.sample(rng)).collect())
}

/// `len` samples of a stationary AR(1) process with coefficient `phi` and marginal sd `sd`
///
/// Errors name `<prefix>.ar_coefficient` or `<prefix>.noise_sd`.
///
/// # Errors
/// Returns an error if |`phi`| ≥ 1 or `sd` is invalid.
pub fn ar1_noise<R: Rng + ?Sized>(
    rng: &mut R,
    len: usize,
    phi: f64,
    sd: f64,
    prefix: &str,
) -> Result<Vec<f64>, BaselineError> {
    if !phi.is_finite() || phi.abs() >= 1.0 {
        return Err(BaselineError::invalid_config(
            format!("{prefix}.ar_coefficient"),
            format!("must satisfy |phi| < 1, got {phi}"),
        ));
    }
    let dist = normal(sd, prefix)?;
    let innovation_scale = (1.0 - phi * phi).sqrt();

    let mut noise = Vec::with_capacity(len);
    let mut previous = 0.0;
    for i in 0..len {
        let draw = dist.sample(rng);
        let value = if i == 0 {
            draw
        } else {
            phi * previous + innovation_scale * draw
        };
        noise.push(value);
        previous = value;
    }
    Ok(noise)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mean(xs: &[f64]) -> f64 {
        xs.iter().sum::<f64>() / xs.len() as f64
    }

    fn variance(xs: &[f64]) -> f64 {
        let m = mean(xs);
        xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / xs.len() as f64
    }

    fn lag1_autocorrelation(xs: &[f64]) -> f64 {
        let m = mean(xs);
        let num: f64 = xs.windows(2).map(|w| (w[0] - m) * (w[1] - m)).sum();
        let den: f64 = xs.iter().map(|x| (x - m).powi(2)).sum();
        num / den
    }

    #[test]
    fn test_streams_are_reproducible_and_independent() {
        let a: Vec<u32> = (0..8).map(|_| stream_rng(42, Stream::Temperature).random()).collect();
        let mut r1 = stream_rng(42, Stream::Temperature);
        let mut r2 = stream_rng(42, Stream::Temperature);
        let mut r3 = stream_rng(42, Stream::Precipitation);
        let x1: [u64; 4] = [r1.random(), r1.random(), r1.random(), r1.random()];
        let x2: [u64; 4] = [r2.random(), r2.random(), r2.random(), r2.random()];
        let x3: [u64; 4] = [r3.random(), r3.random(), r3.random(), r3.random()];
        assert_eq!(x1, x2);
        assert_ne!(x1, x3);
        // Fresh generators restart the stream
        assert!(a.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_ar1_preserves_marginal_variance_and_lag1_correlation() {
        let mut rng = stream_rng(7, Stream::Temperature);
        let noise = ar1_noise(&mut rng, 50_000, 0.7, 2.0, "temperature").unwrap();
        assert!((variance(&noise) - 4.0).abs() < 0.3, "variance {}", variance(&noise));
        let rho = lag1_autocorrelation(&noise);
        assert!((rho - 0.7).abs() < 0.03, "lag-1 autocorrelation {rho}");
    }

    #[test]
    fn test_ar1_with_zero_phi_is_white_noise() {
        let mut rng = stream_rng(11, Stream::Humidity);
        let noise = ar1_noise(&mut rng, 20_000, 0.0, 1.0, "humidity").unwrap();
        assert!(lag1_autocorrelation(&noise).abs() < 0.03);
    }

    #[test]
    fn test_ar1_rejects_unit_root() {
        let mut rng = stream_rng(1, Stream::Temperature);
        assert!(ar1_noise(&mut rng, 10, 1.0, 1.0, "temperature").is_err());
        assert!(ar1_noise(&mut rng, 10, -1.0, 1.0, "temperature").is_err());
        assert!(ar1_noise(&mut rng, 10, f64::NAN, 1.0, "temperature").is_err());
    }

    #[test]
    fn test_zero_sd_gives_zeros() {
        let mut rng = stream_rng(3, Stream::Convective);
        assert_eq!(gaussian_noise(&mut rng, 5, 0.0, "convective").unwrap(), vec![0.0; 5]);
        assert!(gaussian_noise(&mut rng, 5, -1.0, "convective").is_err());
    }

    #[test]
    fn test_errors_name_the_variable() {
        let mut rng = stream_rng(4, Stream::Precipitation);
        let field = |result: Result<Vec<f64>, BaselineError>| match result {
            Err(BaselineError::InvalidConfig { field, .. }) => field,
            other => panic!("expected InvalidConfig, got {other:?}"),
        };
        assert_eq!(
            field(gaussian_noise(&mut rng, 5, f64::NAN, "convective")),
            "convective.noise_sd"
        );
        assert_eq!(
            field(ar1_noise(&mut rng, 5, 1.2, 1.0, "precipitation")),
            "precipitation.ar_coefficient"
        );
        assert_eq!(
            field(ar1_noise(&mut rng, 5, 0.5, -2.0, "humidity.signal")),
            "humidity.signal.noise_sd"
        );
    }
}
