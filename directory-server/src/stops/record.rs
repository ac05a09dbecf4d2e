//! Stop registry parsing.
//!
//! The registry is a semicolon-delimited table with one row per physical
//! stop. Parsing is strict about shape (header columns, numeric fields) and
//! lenient about content: rows that are merely incomplete are dropped.

use serde::Deserialize;
use tracing::debug;

use crate::domain::{Coordinate, StopId};

use super::error::StopError;

/// Header columns that must be present in the registry.
const REQUIRED_COLUMNS: [&str; 5] = ["StopID", "DIVA", "StopText", "Latitude", "Longitude"];

/// One physical stop, validated.
#[derive(Debug, Clone, PartialEq)]
pub struct StopRecord {
    /// Unique stop identifier (RBL number).
    pub id: StopId,
    /// Display name, shared by all stops of one station.
    pub name: String,
    /// Stop position.
    pub location: Coordinate,
    /// Registry grouping code (DIVA).
    pub diva: String,
}

/// A registry row as it appears on the wire.
///
/// Everything except the stop id may be empty.
#[derive(Debug, Deserialize)]
struct RawStopRow {
    #[serde(rename = "StopID")]
    stop_id: StopId,
    #[serde(rename = "DIVA")]
    diva: Option<String>,
    #[serde(rename = "StopText")]
    name: Option<String>,
    #[serde(rename = "Latitude")]
    latitude: Option<f64>,
    #[serde(rename = "Longitude")]
    longitude: Option<f64>,
}

impl RawStopRow {
    /// Keep the row only if it has a name, a grouping code and both coordinates.
    fn into_record(self) -> Option<StopRecord> {
        let name = self.name.filter(|n| !n.trim().is_empty())?;
        let diva = self.diva.filter(|d| !d.trim().is_empty())?;
        let location = Coordinate::new(self.latitude?, self.longitude?)?;

        Some(StopRecord {
            id: self.stop_id,
            name,
            location,
            diva,
        })
    }
}

fn schema_error(e: csv::Error) -> StopError {
    let line = e.position().map(|p| p.line()).unwrap_or(0);
    StopError::Schema {
        line,
        message: e.to_string(),
    }
}

/// Parse a stop registry payload into validated stop records.
///
/// Fails with [`StopError::Schema`] when a required column is missing or a
/// row cannot be decoded. Incomplete rows are silently discarded.
pub fn parse_stop_registry(payload: &str) -> Result<Vec<StopRecord>, StopError> {
    let payload = payload.trim_start_matches('\u{feff}');

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .from_reader(payload.as_bytes());

    let headers = reader.headers().map_err(schema_error)?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(StopError::Schema {
                line: 1,
                message: format!("missing column {column:?}"),
            });
        }
    }

    let mut stops = Vec::new();
    let mut dropped = 0usize;

    for row in reader.deserialize::<RawStopRow>() {
        match row.map_err(schema_error)?.into_record() {
            Some(stop) => stops.push(stop),
            None => dropped += 1,
        }
    }

    debug!(kept = stops.len(), dropped, "parsed stop registry");

    Ok(stops)
}
