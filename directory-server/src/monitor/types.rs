//! Realtime monitor API response types.
//!
//! These map the JSON envelope of the monitor endpoint. They use `Option`
//! liberally because the upstream omits fields it has no value for, and
//! they serialize back in the same shape so callers can receive monitors
//! verbatim.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::domain::{Coordinate, StopId};

use super::delay::Delay;

/// `messageCode` value signalling a successful response.
pub const SUCCESS_CODE: i64 = 1;

/// Envelope status block.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMessage {
    pub message_code: i64,
    pub value: String,
    pub server_time: Option<String>,
}

/// Data section of a successful response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitorData {
    pub monitors: Vec<Monitor>,
}

/// Live departures for one stop.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Monitor {
    pub location_stop: LocationStop,
    #[serde(default)]
    pub lines: Vec<Line>,
}

impl Monitor {
    /// Stop position, if the upstream sent a sane one.
    pub fn location(&self) -> Option<Coordinate> {
        Coordinate::from_geojson(self.location_stop.geometry.coordinates)
    }

    /// Stop id this monitor belongs to.
    pub fn stop_id(&self) -> Option<StopId> {
        self.location_stop
            .properties
            .as_ref()?
            .attributes
            .as_ref()?
            .rbl
    }
}

/// GeoJSON feature describing the stop.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocationStop {
    pub geometry: Geometry,
    pub properties: Option<StopProperties>,
}

/// GeoJSON point; coordinates are `[lon, lat]`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Geometry {
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StopProperties {
    pub name: Option<String>,
    pub title: Option<String>,
    pub attributes: Option<StopAttributes>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StopAttributes {
    pub rbl: Option<StopId>,
}

/// A route direction serving the stop.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub line_id: Option<i64>,
    pub name: String,
    pub towards: String,
    pub departures: Option<Departures>,
    pub barrier_free: Option<bool>,
    pub realtime_supported: Option<bool>,
    #[serde(rename = "trafficjam")]
    pub traffic_jam: Option<bool>,
    #[serde(rename = "type")]
    pub line_type: Option<String>,
}

impl Line {
    /// Upcoming departures; empty when the upstream sent none.
    pub fn departures(&self) -> &[Departure] {
        self.departures
            .as_ref()
            .map(|d| d.departure.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Departures {
    #[serde(default)]
    pub departure: Vec<Departure>,
}

/// One upcoming departure.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Departure {
    pub departure_time: DepartureTime,
    pub vehicle: Option<Vehicle>,
}

impl Departure {
    /// Difference between real and planned time, if both are known.
    pub fn delay(&self) -> Option<Delay> {
        let planned = self.departure_time.time_planned?;
        let real = self.departure_time.time_real?;
        Some(Delay::between(planned, real))
    }

    /// Whether the vehicle is leaving now.
    pub fn is_due(&self) -> bool {
        self.departure_time.countdown == Some(0)
    }

    pub fn is_barrier_free(&self) -> bool {
        self.vehicle
            .as_ref()
            .and_then(|v| v.barrier_free)
            .unwrap_or(false)
    }

    pub fn is_realtime(&self) -> bool {
        self.vehicle
            .as_ref()
            .and_then(|v| v.realtime_supported)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartureTime {
    /// Minutes until departure.
    pub countdown: Option<u32>,
    #[serde(default, with = "upstream_time")]
    pub time_planned: Option<DateTime<FixedOffset>>,
    #[serde(default, with = "upstream_time")]
    pub time_real: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub name: Option<String>,
    pub towards: Option<String>,
    pub barrier_free: Option<bool>,
    pub realtime_supported: Option<bool>,
    #[serde(rename = "trafficjam")]
    pub traffic_jam: Option<bool>,
}

/// Timestamps like `2024-03-15T10:04:00.000+0100`.
mod upstream_time {
    use chrono::{DateTime, FixedOffset};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

    pub fn parse(s: &str) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z")
            .or_else(|_| DateTime::parse_from_rfc3339(s))
            .ok()
    }

    pub fn serialize<S>(value: &Option<DateTime<FixedOffset>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(t) => serializer.serialize_str(&t.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(s) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        parse(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {s}")))
    }
}
