//! Delimited text output
//!
//! Tables are serialized through serde, so the column order is the field order
//! of the row type and a schema change shows up as a header change rather than
//! a silently shifted column. Each table is rendered in memory first and then
//! written in one call.

use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::core_types::record::DailyRecord;
use crate::error::BaselineError;

/// Serialize `rows` as CSV with a header row into `writer`
///
/// # Errors
/// Returns an error if a row cannot be serialized or the writer fails.
pub fn write_csv<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<(), BaselineError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Render `rows` as CSV bytes
///
/// # Errors
/// Returns an error if a row cannot be serialized.
pub fn to_csv_bytes<T: Serialize>(rows: &[T]) -> Result<Vec<u8>, BaselineError> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, rows)?;
    Ok(buffer)
}

/// Write `rows` as a CSV file at `path`
///
/// # Errors
/// Returns an error if serialization or the file write fails.
pub fn save_csv<P: AsRef<Path>, T: Serialize>(path: P, rows: &[T]) -> Result<(), BaselineError> {
    let bytes = to_csv_bytes(rows)?;
    std::fs::write(path.as_ref(), bytes)?;
    info!(path = %path.as_ref().display(), rows = rows.len(), "Wrote table");
    Ok(())
}

/// Render the daily table
///
/// # Errors
/// Returns an error if a record cannot be serialized.
pub fn daily_csv(records: &[DailyRecord]) -> Result<Vec<u8>, BaselineError> {
    to_csv_bytes(records)
}
