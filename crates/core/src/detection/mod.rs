//! Heatwave detection
//!
//! 1. Day-of-year percentile climatology of the post-injection temperature
//! 2. `above = temperature > threshold[doy]`
//! 3. Run-length encoding of `above`; runs of `true` lasting at least
//!    `min_run_length` days are detected heatwaves
//! 4. `is_heatwave = detected ∨ is_forced_heatwave`
//!
//! The union in step 4 keeps every injected day labelled even when its bump
//! stayed under the statistical threshold.

pub mod runs;
pub mod threshold;

pub use runs::{encode_runs, heatwave_mask, RunSegment};
pub use threshold::{percentile_linear, DayOfYearThreshold, ThresholdClimatology};

use tracing::info;

use crate::config::DetectionConfig;
use crate::core_types::record::ForcedSeries;
use crate::error::BaselineError;

/// Detector output, aligned with the input series
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Thresholds the series was compared against
    pub climatology: ThresholdClimatology,
    /// Strictly above the day-of-year threshold
    pub above_threshold: Vec<bool>,
    /// Run-length encoding of `above_threshold`
    pub segments: Vec<RunSegment>,
    /// Day lies in an above-threshold run long enough to count
    pub is_detected: Vec<bool>,
    /// `is_detected ∨ is_forced_heatwave`
    pub is_heatwave: Vec<bool>,
}

impl Detection {
    /// Segments classified as heatwave runs
    pub fn heatwave_segments(&self, min_run_length: usize) -> impl Iterator<Item = &RunSegment> {
        self.segments
            .iter()
            .filter(move |s| s.is_heatwave(min_run_length))
    }
}

/// Run the threshold climatology and run-length detector over `series`
///
/// # Errors
/// Returns an error if the detection configuration is invalid.
pub fn detect(series: &ForcedSeries, config: &DetectionConfig) -> Result<Detection, BaselineError> {
    if config.min_run_length == 0 {
        return Err(BaselineError::invalid_config(
            "detection.min_run_length",
            "must be at least 1",
        ));
    }

    let climatology =
        ThresholdClimatology::compute(&series.dates, &series.temperature, config.percentile)?;
    let above_threshold = climatology.above(&series.dates, &series.temperature);
    let segments = encode_runs(&above_threshold);
    let is_detected = heatwave_mask(&segments, series.len(), config.min_run_length);
    let is_heatwave: Vec<bool> = is_detected
        .iter()
        .zip(&series.is_forced_heatwave)
        .map(|(detected, forced)| *detected || *forced)
        .collect();

    let detected_runs = segments
        .iter()
        .filter(|s| s.is_heatwave(config.min_run_length))
        .count();
    info!(
        percentile = config.percentile,
        segments = segments.len(),
        detected_runs,
        heatwave_days = is_heatwave.iter().filter(|h| **h).count(),
        "Detected heatwaves"
    );

    Ok(Detection {
        climatology,
        above_threshold,
        segments,
        is_detected,
        is_heatwave,
    })
}
