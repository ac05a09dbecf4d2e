//! Application state for the web layer.

use std::sync::Arc;

use crate::favorites::InMemoryFavoriteStore;
use crate::monitor::MonitorClient;
use crate::query::StationQueryService;
use crate::stops::StopFeed;

/// Station queries as wired up by the server.
pub type Stations = StationQueryService<StopFeed, InMemoryFavoriteStore>;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Station directory and favorites
    pub stations: Arc<Stations>,

    /// Realtime monitor client
    pub monitors: Arc<MonitorClient>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(stations: Stations, monitors: MonitorClient) -> Self {
        Self {
            stations: Arc::new(stations),
            monitors: Arc::new(monitors),
        }
    }
}
