//! Realtime departure monitor client.
//!
//! Queries the Wiener Linien realtime API for a set of stops and returns
//! typed monitors. Results are never cached: every call is a fresh upstream
//! request. Delays are derived from the planned and real departure times
//! via [`Delay`].

mod client;
mod delay;
mod error;
mod types;

pub use client::{DEFAULT_MONITOR_BASE_URL, MonitorClient, MonitorConfig, parse_monitor_response};
pub use delay::{Delay, Punctuality};
pub use error::MonitorError;
pub use types::{
    Departure, DepartureTime, Departures, Geometry, Line, LocationStop, Monitor, MonitorData,
    ResponseMessage, SUCCESS_CODE, StopAttributes, StopProperties, Vehicle,
};
