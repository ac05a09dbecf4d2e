//! Station queries: the directory merged with per-user favorites.

mod error;
mod service;

pub use error::QueryError;
pub use service::{StationMarker, StationQueryService, StationSummary};
