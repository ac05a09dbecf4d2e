use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use directory_server::config::AppConfig;
use directory_server::directory::StationDirectoryCache;
use directory_server::favorites::InMemoryFavoriteStore;
use directory_server::monitor::MonitorClient;
use directory_server::query::StationQueryService;
use directory_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    // The directory is built lazily on the first station query
    let feed = config.stop_feed().expect("Failed to create stop registry client");
    let directory = StationDirectoryCache::new(feed);
    let stations = StationQueryService::new(directory, InMemoryFavoriteStore::new());

    let monitors =
        MonitorClient::new(config.monitor_config()).expect("Failed to create monitor client");

    let state = AppState::new(stations, monitors);

    // Periodically swap in a fresh directory
    if let Some(period) = config.refresh_interval {
        let stations = Arc::clone(&state.stations);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await; // First tick is immediate, skip it
            loop {
                interval.tick().await;
                match stations.directory().refresh().await {
                    Ok(count) => info!(stations = count, "refreshed station directory"),
                    Err(e) => error!(error = %e, "failed to refresh station directory"),
                }
            }
        });
    }

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listen address");
    info!(addr = %config.bind_addr, "station directory listening");

    axum::serve(listener, app).await.expect("Server error");
}
