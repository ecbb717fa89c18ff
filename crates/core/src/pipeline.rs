//! End-to-end baseline run
//!
//! Stages, each consuming the previous table and returning a new one:
//!
//! 1. generate the temperature series
//! 2. inject scheduled and explicit heatwaves
//! 3. detect heatwaves against the day-of-year threshold
//! 4. derive the secondary variables with heatwave side effects
//!
//! Every stage gets its own random stream from the master seed.

use tracing::info;

use crate::config::BaselineConfig;
use crate::core_types::noise::{stream_rng, Stream};
use crate::core_types::record::{DailyRecord, ForcedSeries, TemperatureSeries};
use crate::detection::{detect, Detection};
use crate::error::BaselineError;
use crate::generator::{derive_secondary, generate_temperature, SecondaryRngs};
use crate::injector::{draw_schedule, inject, HeatwaveEvent, Injection};
use crate::summary::{annual_summaries, heatwave_episodes, monthly_summaries};
use crate::summary::{AnnualSummary, HeatwaveEpisode, MonthlySummary};

/// Every intermediate and final table of one run
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineRun {
    /// Temperature before injection
    pub base: TemperatureSeries,
    /// Events drawn from the randomized schedule, before boundary filtering
    pub scheduled: Vec<HeatwaveEvent>,
    /// Injection result (forced series, applied and discarded events)
    pub injection: Injection,
    /// Threshold climatology and run-length detection
    pub detection: Detection,
    /// Final daily table
    pub records: Vec<DailyRecord>,
}

impl BaselineRun {
    /// Series the detector ran on
    pub fn forced(&self) -> &ForcedSeries {
        &self.injection.series
    }

    /// Heatwave episode catalogue
    pub fn episodes(&self) -> Vec<HeatwaveEpisode> {
        heatwave_episodes(&self.records)
    }

    /// Monthly aggregates
    pub fn monthly(&self) -> Vec<MonthlySummary> {
        monthly_summaries(&self.records)
    }

    /// Annual aggregates
    pub fn annual(&self) -> Vec<AnnualSummary> {
        annual_summaries(&self.records)
    }
}

/// Validate `config` and run every stage
///
/// # Errors
/// Returns the first validation error; nothing is produced in that case.
pub fn run(config: &BaselineConfig) -> Result<BaselineRun, BaselineError> {
    config.validate()?;
    let span = config.span()?;
    info!(
        start = %span.start,
        end = %span.end,
        days = span.len_days(),
        seed = config.seed,
        "Starting baseline run"
    );

    let mut temperature_rng = stream_rng(config.seed, Stream::Temperature);
    let base = generate_temperature(&span, &config.temperature, &mut temperature_rng)?;

    let scheduled = match &config.injection.schedule {
        Some(schedule) => {
            let mut schedule_rng = stream_rng(config.seed, Stream::Schedule);
            draw_schedule(&span, schedule, &mut schedule_rng)?
        }
        None => Vec::new(),
    };
    let events: Vec<HeatwaveEvent> = scheduled
        .iter()
        .chain(&config.injection.events)
        .copied()
        .collect();
    let injection = inject(&ForcedSeries::from(base.clone()), &events)?;
    info!(
        applied = injection.applied.len(),
        discarded = injection.discarded.len(),
        "Injected heatwaves"
    );

    let detection = detect(&injection.series, &config.detection)?;

    let mut rngs = SecondaryRngs::from_seed(config.seed);
    let records = derive_secondary(&injection.series, &detection.is_heatwave, config, &mut rngs)?;

    info!(rows = records.len(), "Baseline run complete");
    Ok(BaselineRun {
        base,
        scheduled,
        injection,
        detection,
        records,
    })
}
