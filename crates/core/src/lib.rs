//! Heatwave Baseline Core Library
//!
//! Synthetic daily climate series and heatwave labelling for counterfactual
//! baselines in health-impact attribution studies.
//!
//! ## Pipeline
//!
//! - Seasonal + trend + AR(1) temperature generator
//! - Half-sine heatwave injection on a randomized yearly schedule
//! - Day-of-year 90th percentile threshold climatology
//! - Run-length heatwave detection, unioned with the injected days
//! - Humidity, precipitation, extremes and convective energy derived from
//!   temperature with heatwave-day side effects
//! - Tidy daily, monthly and annual CSV tables
//!
//! ```
//! use heatwave_baseline_core::{pipeline, BaselineConfig};
//!
//! let config = BaselineConfig::default();
//! let run = pipeline::run(&config).unwrap();
//! assert_eq!(run.records.len(), 3652);
//! ```

pub mod config;
pub mod core_types;
pub mod detection;
pub mod error;
pub mod generator;
pub mod injector;
pub mod output;
pub mod pipeline;
pub mod summary;

// Re-export the types most callers need
pub use config::{BaselineConfig, DetectionConfig, InjectionConfig, ScheduleConfig, SignalParams};
pub use core_types::{Celsius, CelsiusDelta, DailyRecord, DateSpan};
pub use detection::{Detection, RunSegment};
pub use error::BaselineError;
pub use injector::HeatwaveEvent;
pub use pipeline::BaselineRun;
pub use summary::{AnnualSummary, HeatwaveEpisode, MonthlySummary};
