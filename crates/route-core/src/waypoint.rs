//! Route input: waypoints read from a comma-separated file.
//!
//! The file carries a header row followed by `latitude, longitude, fuelLevel`
//! rows. Fields may be quoted and padded with whitespace.

use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

const COLUMNS: [&str; 3] = ["latitude", "longitude", "fuelLevel"];

/// Errors raised while loading a route file. Loading is all-or-nothing.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to open route file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Line {line}: expected 3 fields, found {found}")]
    FieldCount { line: u64, found: usize },

    #[error("Line {line}: {column} is not a number: {value:?}")]
    InvalidNumber {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("Route file contains no waypoints")]
    Empty,
}

/// A route control point as read from the input file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub latitude: f64,
    pub longitude: f64,
    pub fuel_level: f64,
}

impl Waypoint {
    pub const fn new(latitude: f64, longitude: f64, fuel_level: f64) -> Self {
        Self {
            latitude,
            longitude,
            fuel_level,
        }
    }

    fn from_record(record: &StringRecord) -> Result<Self, ParseError> {
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.len() != COLUMNS.len() {
            return Err(ParseError::FieldCount {
                line,
                found: record.len(),
            });
        }

        let mut values = [0.0f64; 3];
        for (slot, (raw, column)) in values.iter_mut().zip(record.iter().zip(COLUMNS)) {
            *slot = raw.parse().map_err(|_| ParseError::InvalidNumber {
                line,
                column,
                value: raw.to_string(),
            })?;
        }

        Ok(Self::new(values[0], values[1], values[2]))
    }
}

/// Read waypoints from any CSV source. The first row is treated as a header.
pub fn read_waypoints<R: Read>(reader: R) -> Result<Vec<Waypoint>, ParseError> {
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(b',')
        .quote(b'"')
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut waypoints = Vec::new();
    for record in csv_reader.records() {
        waypoints.push(Waypoint::from_record(&record?)?);
    }

    if waypoints.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(waypoints)
}

/// Load waypoints from a file on disk.
pub fn load_waypoints(path: &Path) -> Result<Vec<Waypoint>, ParseError> {
    let file = File::open(path)?;
    let waypoints = read_waypoints(file)?;
    tracing::debug!(path = %path.display(), count = waypoints.len(), "Loaded waypoints");
    Ok(waypoints)
}
