//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Coordinate, StopId};
use crate::monitor::{Departure, Line, Monitor, Punctuality};
use crate::query::{StationMarker, StationSummary};

/// Departures shown per line unless the request asks otherwise.
pub const DEFAULT_MAX_DEPARTURES: usize = 4;

/// Upper bound for the `limit` parameter.
pub const MAX_DEPARTURES_LIMIT: usize = 20;

/// Query for the station list.
#[derive(Debug, Default, Deserialize)]
pub struct StationListRequest {
    /// Optional case-insensitive name filter
    pub q: Option<String>,

    /// Only the caller's favorites
    #[serde(default)]
    pub favorites: bool,
}

/// Query for raw monitors.
#[derive(Debug, Deserialize)]
pub struct MonitorRequest {
    /// Comma-separated stop ids, e.g. `4111,4118`
    #[serde(rename = "stopIds")]
    pub stop_ids: String,
}

/// Query for a station's departure board.
#[derive(Debug, Default, Deserialize)]
pub struct DeparturesRequest {
    /// Departures per line (defaults to 4)
    pub limit: Option<usize>,
}

impl DeparturesRequest {
    pub fn max_departures(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_MAX_DEPARTURES)
            .clamp(1, MAX_DEPARTURES_LIMIT)
    }
}

/// Map page data.
#[derive(Debug, Serialize)]
pub struct MapResponse {
    /// Where to center the map initially
    pub center: Coordinate,

    /// Stations with a known position
    pub stations: Vec<StationMarker>,
}

/// A station with its live departures.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationDeparturesResponse {
    pub station: StationSummary,
    pub monitors: Vec<MonitorView>,
}

/// Live departures at one stop.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorView {
    pub stop_id: Option<StopId>,
    pub location: Option<Coordinate>,
    pub lines: Vec<LineView>,
}

impl MonitorView {
    pub fn from_monitor(monitor: &Monitor, max_departures: usize) -> Self {
        Self {
            stop_id: monitor.stop_id(),
            location: monitor.location(),
            lines: monitor
                .lines
                .iter()
                .map(|line| LineView::from_line(line, max_departures))
                .collect(),
        }
    }
}

/// A line at a stop, with its next departures.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineView {
    pub line_id: Option<i64>,
    pub name: String,
    pub towards: String,
    pub departures: Vec<DepartureView>,
}

impl LineView {
    pub fn from_line(line: &Line, max_departures: usize) -> Self {
        Self {
            line_id: line.line_id,
            name: line.name.clone(),
            towards: line.towards.clone(),
            departures: line
                .departures()
                .iter()
                .take(max_departures)
                .map(DepartureView::from_departure)
                .collect(),
        }
    }
}

/// One departure, with the delay worked out.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartureView {
    /// Minutes until departure
    pub countdown: Option<u32>,

    /// Leaving now
    pub is_due: bool,

    /// Deviation from the timetable; absent without a realtime estimate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub punctuality: Option<Punctuality>,

    pub barrier_free: bool,
    pub realtime: bool,
}

impl DepartureView {
    pub fn from_departure(departure: &Departure) -> Self {
        Self {
            countdown: departure.departure_time.countdown,
            is_due: departure.is_due(),
            punctuality: departure.delay().map(|d| d.punctuality()),
            barrier_free: departure.is_barrier_free(),
            realtime: departure.is_realtime(),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const MONITOR: &str = r#"{
        "locationStop": {
            "geometry": { "coordinates": [16.3689, 48.2003] },
            "properties": { "title": "Karlsplatz", "attributes": { "rbl": 4111 } }
        },
        "lines": [{
            "name": "U4",
            "towards": "Heiligenstadt",
            "lineId": 304,
            "departures": { "departure": [
                { "departureTime": { "countdown": 0, "timePlanned": "2024-03-15T10:00:00.000+0100", "timeReal": "2024-03-15T10:01:30.000+0100" },
                  "vehicle": { "barrierFree": true, "realtimeSupported": true } },
                { "departureTime": { "countdown": 4, "timePlanned": "2024-03-15T10:05:00.000+0100", "timeReal": "2024-03-15T10:05:00.000+0100" } },
                { "departureTime": { "countdown": 9, "timePlanned": "2024-03-15T10:10:00.000+0100" } }
            ]}
        }]
    }"#;

    fn monitor() -> Monitor {
        serde_json::from_str(MONITOR).unwrap()
    }

    #[test]
    fn departure_views_carry_delay() {
        let view = MonitorView::from_monitor(&monitor(), DEFAULT_MAX_DEPARTURES);

        assert_eq!(view.stop_id, Some(StopId(4111)));
        let departures = &view.lines[0].departures;
        assert_eq!(departures.len(), 3);

        assert!(departures[0].is_due);
        assert!(departures[0].barrier_free);
        assert_eq!(departures[0].punctuality, Some(Punctuality::Late(2)));
        assert_eq!(departures[1].punctuality, Some(Punctuality::OnTime));
        assert_eq!(departures[2].punctuality, None);
    }

    #[test]
    fn departures_are_truncated() {
        let view = MonitorView::from_monitor(&monitor(), 1);
        assert_eq!(view.lines[0].departures.len(), 1);
    }

    #[test]
    fn departure_json_shape() {
        let view = MonitorView::from_monitor(&monitor(), DEFAULT_MAX_DEPARTURES);
        let json = serde_json::to_value(&view.lines[0].departures[2]).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "countdown": 9,
                "isDue": false,
                "barrierFree": false,
                "realtime": false
            })
        );
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(DeparturesRequest::default().max_departures(), 4);
        assert_eq!(DeparturesRequest { limit: Some(0) }.max_departures(), 1);
        assert_eq!(DeparturesRequest { limit: Some(500) }.max_departures(), 20);
    }
}
