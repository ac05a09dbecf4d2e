//! Stop registry ingestion.
//!
//! Fetches the semicolon-delimited registry of physical stops and turns it
//! into validated [`StopRecord`]s. Incomplete rows are dropped here, so the
//! directory layer only ever sees stops with a name, a grouping code and a
//! position.

mod client;
mod error;
mod record;

use std::future::Future;

pub use client::{DEFAULT_STOPS_URL, StopClient, StopClientConfig, StopFeed, StopFile};
pub use error::StopError;
pub use record::{StopRecord, parse_stop_registry};

/// Something that can produce the full list of stops.
pub trait StopSource: Send + Sync + 'static {
    /// Fetch and parse every stop in the registry.
    fn fetch(&self) -> impl Future<Output = Result<Vec<StopRecord>, StopError>> + Send;
}
