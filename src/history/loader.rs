//! Plain-text loader for annual return history
//!
//! Files contain one record per line in the form `<year> <percentage>`,
//! e.g. `1993 10.5`. Percentages are converted to fractions at ingestion.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::warn;

use super::ReturnSeries;
use crate::error::SimulationError;

/// Load a return history from a file.
///
/// Malformed lines are skipped with a warning; duplicate years overwrite
/// the earlier value under that year's original position.
pub fn load_returns<P: AsRef<Path>>(path: P) -> Result<ReturnSeries, SimulationError> {
    let file = File::open(path)?;
    load_returns_from_reader(BufReader::new(file))
}

/// Load a return history from any buffered reader (e.g. a string buffer).
pub fn load_returns_from_reader<R: BufRead>(reader: R) -> Result<ReturnSeries, SimulationError> {
    let mut series = ReturnSeries::new();

    for line in reader.lines() {
        let line = line?;
        match parse_record(&line) {
            Ok((year, annual_return)) => series.insert(year, annual_return),
            Err(err) => warn!("skipping history line: {}", err),
        }
    }

    Ok(series)
}

/// Parse one `<year> <percentage>` record into a `(year, fraction)` pair.
fn parse_record(line: &str) -> Result<(i32, f64), SimulationError> {
    let malformed = || SimulationError::MalformedHistoricalRecord {
        line: line.to_string(),
    };

    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 2 {
        return Err(malformed());
    }

    let year: i32 = fields[0].parse().map_err(|_| malformed())?;
    let percentage: f64 = fields[1].parse().map_err(|_| malformed())?;

    Ok((year, percentage / 100.0))
}
