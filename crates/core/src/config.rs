//! Run configuration for the synthetic baseline pipeline
//!
//! A [`BaselineConfig`] carries every constant a run depends on: the date
//! span, the master seed, the signal parameters of each variable, the
//! heatwave schedule and the detection rule. Two runs with equal configs
//! produce identical tables.
//!
//! The defaults are a mid-latitude station with a warm-season monsoon
//! shifted rainfall peak over 2010-2019.
//!
//! # Example
//! ```
//! use heatwave_baseline_core::config::BaselineConfig;
//!
//! let mut config = BaselineConfig::default();
//! config.seed = 7;
//! config.temperature.ar_coefficient = 1.0;
//! assert!(config.validate().is_err());
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core_types::calendar::DateSpan;
use crate::error::BaselineError;
use crate::injector::HeatwaveEvent;

/// Inclusive `[min, max]` range a value is drawn uniformly from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformRange<T> {
    /// Lower bound (inclusive)
    pub min: T,
    /// Upper bound (inclusive)
    pub max: T,
}

impl<T> UniformRange<T> {
    /// Create a range
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl UniformRange<f64> {
    fn validate(&self, field: &str) -> Result<(), BaselineError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(BaselineError::invalid_config(
                field,
                format!("bounds must be finite, got [{}, {}]", self.min, self.max),
            ));
        }
        if self.min > self.max {
            return Err(BaselineError::invalid_config(
                field,
                format!("min {} is greater than max {}", self.min, self.max),
            ));
        }
        Ok(())
    }
}

impl UniformRange<u32> {
    fn validate(&self, field: &str) -> Result<(), BaselineError> {
        if self.min > self.max {
            return Err(BaselineError::invalid_config(
                field,
                format!("min {} is greater than max {}", self.min, self.max),
            ));
        }
        Ok(())
    }
}

fn check_finite(field: String, value: f64) -> Result<(), BaselineError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(BaselineError::invalid_config(field, format!("must be finite, got {value}")))
    }
}

/// Parameters of one generated signal: baseline + harmonics + trend + AR(1) noise
///
/// Seasonal term: `annual_amplitude * sin(2π·doy/365.25 − annual_phase)
/// + semiannual_amplitude * cos(4π·doy/365.25 + semiannual_phase)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalParams {
    /// Constant level in the variable's unit
    pub baseline: f64,
    /// Amplitude of the annual harmonic
    pub annual_amplitude: f64,
    /// Phase of the annual harmonic (radians, subtracted)
    pub annual_phase: f64,
    /// Amplitude of the semiannual harmonic
    pub semiannual_amplitude: f64,
    /// Phase of the semiannual harmonic (radians, added)
    pub semiannual_phase: f64,
    /// Linear trend per elapsed year
    pub trend_per_year: f64,
    /// Lag-1 autocorrelation φ of the noise, must satisfy |φ| < 1
    pub ar_coefficient: f64,
    /// Marginal standard deviation σ of the noise
    pub noise_sd: f64,
}

impl SignalParams {
    /// Daily mean air temperature (°C)
    pub fn temperature() -> Self {
        Self {
            baseline: 15.0,
            annual_amplitude: 10.0,
            annual_phase: 1.9,
            semiannual_amplitude: 1.5,
            semiannual_phase: 0.0,
            trend_per_year: 0.03,
            ar_coefficient: 0.7,
            noise_sd: 2.0,
        }
    }

    /// Mean daily precipitation (mm/day) with a late-summer monsoon peak
    pub fn precipitation() -> Self {
        Self {
            baseline: 2.5,
            annual_amplitude: 1.5,
            annual_phase: 2.4,
            semiannual_amplitude: 0.3,
            semiannual_phase: 0.5,
            trend_per_year: -0.01,
            ar_coefficient: 0.3,
            noise_sd: 1.5,
        }
    }

    /// Pure Gaussian noise with standard deviation `sd`
    pub fn white_noise(sd: f64) -> Self {
        Self {
            baseline: 0.0,
            annual_amplitude: 0.0,
            annual_phase: 0.0,
            semiannual_amplitude: 0.0,
            semiannual_phase: 0.0,
            trend_per_year: 0.0,
            ar_coefficient: 0.0,
            noise_sd: sd,
        }
    }

    /// Check stationarity and finiteness
    ///
    /// # Errors
    /// Returns [`BaselineError::InvalidConfig`] naming `prefix.<field>`.
    pub fn validate(&self, prefix: &str) -> Result<(), BaselineError> {
        let finite = [
            ("baseline", self.baseline),
            ("annual_amplitude", self.annual_amplitude),
            ("annual_phase", self.annual_phase),
            ("semiannual_amplitude", self.semiannual_amplitude),
            ("semiannual_phase", self.semiannual_phase),
            ("trend_per_year", self.trend_per_year),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(BaselineError::invalid_config(
                    format!("{prefix}.{name}"),
                    format!("must be finite, got {value}"),
                ));
            }
        }
        if !self.ar_coefficient.is_finite() || self.ar_coefficient.abs() >= 1.0 {
            return Err(BaselineError::invalid_config(
                format!("{prefix}.ar_coefficient"),
                format!(
                    "must satisfy |phi| < 1 for a stationary AR(1) process, got {}",
                    self.ar_coefficient
                ),
            ));
        }
        if !self.noise_sd.is_finite() || self.noise_sd < 0.0 {
            return Err(BaselineError::invalid_config(
                format!("{prefix}.noise_sd"),
                format!("must be finite and non-negative, got {}", self.noise_sd),
            ));
        }
        Ok(())
    }
}

/// Humidity proxy: `intercept + temperature_slope·T + signal`, floored at 0.1 g/kg
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HumidityParams {
    /// Humidity at 0 °C (g/kg)
    pub intercept: f64,
    /// Increase per °C of temperature (g/kg/°C)
    pub temperature_slope: f64,
    /// Additional seasonal/trend/noise component with its own random stream
    pub signal: SignalParams,
}

impl Default for HumidityParams {
    fn default() -> Self {
        Self {
            intercept: 2.0,
            temperature_slope: 0.35,
            signal: SignalParams::white_noise(0.8),
        }
    }
}

impl HumidityParams {
    /// Check coefficients and the additive signal
    ///
    /// # Errors
    /// Returns [`BaselineError::InvalidConfig`] naming `prefix.<field>`.
    pub fn validate(&self, prefix: &str) -> Result<(), BaselineError> {
        check_finite(format!("{prefix}.intercept"), self.intercept)?;
        check_finite(format!("{prefix}.temperature_slope"), self.temperature_slope)?;
        self.signal.validate(&format!("{prefix}.signal"))
    }
}

/// Convective energy: `intercept + temperature_slope·T + humidity_slope·q + N(0, noise_sd)`,
/// floored at 0 J/kg
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvectiveParams {
    /// Energy at 0 °C and 0 g/kg (J/kg)
    pub intercept: f64,
    /// J/kg per °C
    pub temperature_slope: f64,
    /// J/kg per g/kg of humidity
    pub humidity_slope: f64,
    /// Standard deviation of the Gaussian noise (J/kg)
    pub noise_sd: f64,
}

impl Default for ConvectiveParams {
    fn default() -> Self {
        Self {
            intercept: -800.0,
            temperature_slope: 60.0,
            humidity_slope: 40.0,
            noise_sd: 150.0,
        }
    }
}

impl ConvectiveParams {
    /// Check coefficients and the noise level
    ///
    /// # Errors
    /// Returns [`BaselineError::InvalidConfig`] naming `prefix.<field>`.
    pub fn validate(&self, prefix: &str) -> Result<(), BaselineError> {
        check_finite(format!("{prefix}.intercept"), self.intercept)?;
        check_finite(format!("{prefix}.temperature_slope"), self.temperature_slope)?;
        check_finite(format!("{prefix}.humidity_slope"), self.humidity_slope)?;
        if !self.noise_sd.is_finite() || self.noise_sd < 0.0 {
            return Err(BaselineError::invalid_config(
                format!("{prefix}.noise_sd"),
                format!("must be finite and non-negative, got {}", self.noise_sd),
            ));
        }
        Ok(())
    }
}

/// Rare-event precipitation model, independent of the mean series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtremeParams {
    /// Daily probability of an extreme event
    pub probability: f64,
    /// Event magnitude range (mm/day)
    pub magnitude: UniformRange<f64>,
}

impl Default for ExtremeParams {
    fn default() -> Self {
        Self {
            probability: 0.02,
            magnitude: UniformRange::new(20.0, 100.0),
        }
    }
}

impl ExtremeParams {
    /// Check the event probability and magnitude range
    ///
    /// # Errors
    /// Returns [`BaselineError::InvalidConfig`] naming `prefix.<field>`.
    pub fn validate(&self, prefix: &str) -> Result<(), BaselineError> {
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(BaselineError::invalid_config(
                format!("{prefix}.probability"),
                format!("must be within [0, 1], got {}", self.probability),
            ));
        }
        self.magnitude.validate(&format!("{prefix}.magnitude"))
    }
}

/// Multiplicative side effects applied on every `is_heatwave` day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatwaveEffects {
    /// Precipitation suppression factor
    pub precipitation_factor: UniformRange<f64>,
    /// Humidity suppression factor
    pub humidity_factor: UniformRange<f64>,
    /// Convective energy perturbation factor
    pub convective_factor: UniformRange<f64>,
}

impl Default for HeatwaveEffects {
    fn default() -> Self {
        Self {
            precipitation_factor: UniformRange::new(0.0, 0.5),
            humidity_factor: UniformRange::new(0.6, 0.9),
            convective_factor: UniformRange::new(0.8, 1.5),
        }
    }
}

impl HeatwaveEffects {
    /// Check every factor range is ordered and non-negative
    ///
    /// # Errors
    /// Returns [`BaselineError::InvalidConfig`] naming `prefix.<field>`.
    pub fn validate(&self, prefix: &str) -> Result<(), BaselineError> {
        for (name, range) in [
            ("precipitation_factor", self.precipitation_factor),
            ("humidity_factor", self.humidity_factor),
            ("convective_factor", self.convective_factor),
        ] {
            let field = format!("{prefix}.{name}");
            range.validate(&field)?;
            if range.min < 0.0 {
                return Err(BaselineError::invalid_config(
                    field,
                    format!("factors must be non-negative, got min {}", range.min),
                ));
            }
        }
        Ok(())
    }
}

/// Randomized heatwave schedule, drawn independently for every calendar year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Number of events per year
    pub events_per_year: UniformRange<u32>,
    /// Window of start days-of-year (1-based)
    pub start_day_window: UniformRange<u32>,
    /// Event duration in days
    pub duration_days: UniformRange<u32>,
    /// Peak anomaly at the event midpoint (°C)
    pub peak_anomaly: UniformRange<f64>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            events_per_year: UniformRange::new(1, 3),
            start_day_window: UniformRange::new(152, 244),
            duration_days: UniformRange::new(3, 10),
            peak_anomaly: UniformRange::new(2.0, 8.0),
        }
    }
}

impl ScheduleConfig {
    /// Check every range is ordered and the start window lies within a year
    ///
    /// # Errors
    /// Returns [`BaselineError::InvalidConfig`] naming `prefix.<field>`.
    pub fn validate(&self, prefix: &str) -> Result<(), BaselineError> {
        self.events_per_year.validate(&format!("{prefix}.events_per_year"))?;
        self.start_day_window.validate(&format!("{prefix}.start_day_window"))?;
        if self.start_day_window.min < 1 || self.start_day_window.max > 366 {
            return Err(BaselineError::invalid_config(
                format!("{prefix}.start_day_window"),
                format!(
                    "days of year must lie in 1..=366, got [{}, {}]",
                    self.start_day_window.min, self.start_day_window.max
                ),
            ));
        }
        self.duration_days.validate(&format!("{prefix}.duration_days"))?;
        if self.duration_days.min == 0 {
            return Err(BaselineError::invalid_config(
                format!("{prefix}.duration_days"),
                "events must last at least one day",
            ));
        }
        self.peak_anomaly.validate(&format!("{prefix}.peak_anomaly"))
    }
}

/// Which heatwaves get injected into the temperature series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectionConfig {
    /// Randomized yearly schedule, `None` disables it
    pub schedule: Option<ScheduleConfig>,
    /// Explicit events, applied after the scheduled ones
    pub events: Vec<HeatwaveEvent>,
}

impl Default for InjectionConfig {
    fn default() -> Self {
        Self {
            schedule: Some(ScheduleConfig::default()),
            events: Vec::new(),
        }
    }
}

/// Threshold climatology and run-length rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Day-of-year percentile used as the threshold (0, 100]
    pub percentile: f64,
    /// Minimum number of consecutive above-threshold days
    pub min_run_length: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            percentile: 90.0,
            min_run_length: 3,
        }
    }
}

/// Complete configuration of one baseline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineConfig {
    /// First simulated day
    pub start: NaiveDate,
    /// Last simulated day (inclusive)
    pub end: NaiveDate,
    /// Master seed; every variable gets its own stream derived from it
    pub seed: u64,
    /// Primary variable
    pub temperature: SignalParams,
    /// Mean precipitation
    pub precipitation: SignalParams,
    /// Humidity proxy
    pub humidity: HumidityParams,
    /// Convective energy
    pub convective: ConvectiveParams,
    /// Precipitation extremes
    pub extremes: ExtremeParams,
    /// Heatwave-day side effects on secondary variables
    pub heatwave_effects: HeatwaveEffects,
    /// Injected heatwaves
    pub injection: InjectionConfig,
    /// Threshold detection rule
    pub detection: DetectionConfig,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2010, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2019, 12, 31).unwrap_or_default(),
            seed: 42,
            temperature: SignalParams::temperature(),
            precipitation: SignalParams::precipitation(),
            humidity: HumidityParams::default(),
            convective: ConvectiveParams::default(),
            extremes: ExtremeParams::default(),
            heatwave_effects: HeatwaveEffects::default(),
            injection: InjectionConfig::default(),
            detection: DetectionConfig::default(),
        }
    }
}

impl BaselineConfig {
    /// Load a configuration from a JSON file; missing fields take defaults
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, BaselineError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Validated date span of the run
    ///
    /// # Errors
    /// Returns [`BaselineError::EmptyDateRange`] if `start > end`.
    pub fn span(&self) -> Result<DateSpan, BaselineError> {
        DateSpan::new(self.start, self.end)
    }

    /// Reject configurations that would silently produce NaN or degenerate output
    ///
    /// # Errors
    /// Returns the first invalid field found.
    pub fn validate(&self) -> Result<(), BaselineError> {
        self.span()?;

        self.temperature.validate("temperature")?;
        self.precipitation.validate("precipitation")?;
        self.humidity.validate("humidity")?;
        self.convective.validate("convective")?;
        self.extremes.validate("extremes")?;
        self.heatwave_effects.validate("heatwave_effects")?;

        if let Some(schedule) = &self.injection.schedule {
            schedule.validate("injection.schedule")?;
        }
        for (i, event) in self.injection.events.iter().enumerate() {
            event.validate(&format!("injection.events[{i}]"))?;
        }

        let percentile = self.detection.percentile;
        if !percentile.is_finite() || percentile <= 0.0 || percentile > 100.0 {
            return Err(BaselineError::invalid_config(
                "detection.percentile",
                format!("must lie in (0, 100], got {percentile}"),
            ));
        }
        if self.detection.min_run_length == 0 {
            return Err(BaselineError::invalid_config(
                "detection.min_run_length",
                "must be at least 1",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::units::CelsiusDelta;

    fn field_of(err: BaselineError) -> String {
        match err {
            BaselineError::InvalidConfig { field, .. } => field,
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = BaselineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.span().unwrap().len_days(), 3652);
    }

    #[test]
    fn test_rejects_non_stationary_ar_coefficient() {
        let mut config = BaselineConfig::default();
        config.temperature.ar_coefficient = 1.0;
        assert_eq!(field_of(config.validate().unwrap_err()), "temperature.ar_coefficient");

        config.temperature.ar_coefficient = -1.2;
        assert_eq!(field_of(config.validate().unwrap_err()), "temperature.ar_coefficient");

        config.temperature.ar_coefficient = 0.99;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_date_range() {
        let mut config = BaselineConfig::default();
        config.end = NaiveDate::from_ymd_opt(2009, 12, 31).unwrap();
        assert!(matches!(
            config.validate(),
            Err(BaselineError::EmptyDateRange { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_duration_and_bad_ranges() {
        let mut config = BaselineConfig::default();
        config.injection.events.push(HeatwaveEvent::new(
            NaiveDate::from_ymd_opt(2015, 7, 1).unwrap(),
            0,
            CelsiusDelta::new(5.0),
        ));
        assert_eq!(field_of(config.validate().unwrap_err()), "injection.events[0].duration_days");

        let mut config = BaselineConfig::default();
        config.extremes.magnitude = UniformRange::new(100.0, 20.0);
        assert_eq!(field_of(config.validate().unwrap_err()), "extremes.magnitude");

        let mut config = BaselineConfig::default();
        if let Some(schedule) = config.injection.schedule.as_mut() {
            schedule.start_day_window = UniformRange::new(0, 30);
        }
        assert_eq!(
            field_of(config.validate().unwrap_err()),
            "injection.schedule.start_day_window"
        );

        let mut config = BaselineConfig::default();
        config.precipitation.noise_sd = -0.5;
        assert_eq!(field_of(config.validate().unwrap_err()), "precipitation.noise_sd");

        let mut config = BaselineConfig::default();
        config.detection.min_run_length = 0;
        assert_eq!(field_of(config.validate().unwrap_err()), "detection.min_run_length");
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let json = r#"{ "seed": 9, "start": "2000-01-01", "end": "2000-12-31" }"#;
        let config: BaselineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.span().unwrap().len_days(), 366);
        assert_eq!(config.temperature, SignalParams::temperature());
        assert_eq!(config.detection.min_run_length, 3);
    }

    #[test]
    fn test_json_round_trip_with_explicit_event() {
        let mut config = BaselineConfig::default();
        config.injection.schedule = None;
        config.injection.events.push(HeatwaveEvent::new(
            NaiveDate::from_ymd_opt(2015, 7, 1).unwrap(),
            7,
            CelsiusDelta::new(8.0),
        ));
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"2015-07-01\""));
        let back: BaselineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
