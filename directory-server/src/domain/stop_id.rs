//! Stop identifier type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid stop identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stop id {input:?}: must be a non-negative integer")]
pub struct InvalidStopId {
    input: String,
}

/// Numeric identifier of a single physical stop.
///
/// This is the "RBL" number used by the realtime monitor API, so the same
/// value keys both the stop registry and live departure queries.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopId(pub u32);

impl FromStr for StopId {
    type Err = InvalidStopId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(StopId).map_err(|_| InvalidStopId {
            input: s.to_string(),
        })
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse a comma-separated list such as `"4111,4118"`.
///
/// Blank entries are skipped, so trailing commas are tolerated.
pub fn parse_stop_id_list(s: &str) -> Result<Vec<StopId>, InvalidStopId> {
    s.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(str::parse)
        .collect()
}

/// Join stop ids with commas, the form the monitor API expects.
pub fn join_stop_ids(ids: &[StopId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
