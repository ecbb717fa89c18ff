//! Error type shared by every pipeline stage
//!
//! Configuration problems are reported before any series is generated so a run
//! either completes or produces nothing. Heatwave events that overflow the
//! series boundary are *not* errors; the injector drops them.

use chrono::NaiveDate;
use std::fmt;

/// Errors that can occur while configuring, running or writing a baseline
#[derive(Debug)]
pub enum BaselineError {
    /// A configuration value is out of its valid range
    InvalidConfig {
        /// Dotted path of the offending field (e.g. `temperature.ar_coefficient`)
        field: String,
        /// What is wrong with it
        message: String,
    },
    /// The configured start date lies after the end date
    EmptyDateRange {
        /// Configured start
        start: NaiveDate,
        /// Configured end
        end: NaiveDate,
    },
    /// Failed to read or write a file
    Io(std::io::Error),
    /// Failed to serialize a table as CSV
    Csv(csv::Error),
    /// Failed to parse a configuration file
    ConfigParse(serde_json::Error),
}

impl BaselineError {
    /// Create an [`BaselineError::InvalidConfig`] for `field`
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for BaselineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaselineError::InvalidConfig { field, message } => {
                write!(f, "Invalid configuration for '{field}': {message}")
            }
            BaselineError::EmptyDateRange { start, end } => {
                write!(f, "Empty date range: start {start} is after end {end}")
            }
            BaselineError::Io(e) => write!(f, "I/O error: {e}"),
            BaselineError::Csv(e) => write!(f, "Failed to write CSV: {e}"),
            BaselineError::ConfigParse(e) => write!(f, "Failed to parse configuration: {e}"),
        }
    }
}

impl std::error::Error for BaselineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BaselineError::Io(e) => Some(e),
            BaselineError::Csv(e) => Some(e),
            BaselineError::ConfigParse(e) => Some(e),
            BaselineError::InvalidConfig { .. } | BaselineError::EmptyDateRange { .. } => None,
        }
    }
}

impl From<std::io::Error> for BaselineError {
    fn from(e: std::io::Error) -> Self {
        BaselineError::Io(e)
    }
}

impl From<csv::Error> for BaselineError {
    fn from(e: csv::Error) -> Self {
        BaselineError::Csv(e)
    }
}

impl From<serde_json::Error> for BaselineError {
    fn from(e: serde_json::Error) -> Self {
        BaselineError::ConfigParse(e)
    }
}
