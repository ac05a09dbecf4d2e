//! HTTP route handlers.

use std::collections::BTreeSet;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, put},
};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::directory::DirectoryError;
use crate::domain::{CENTER_OF_VIENNA, InvalidStopId, InvalidToken, UserId, parse_stop_id_list, station_name};
use crate::favorites::FavoriteError;
use crate::monitor::{Monitor, MonitorError};
use crate::query::{QueryError, StationSummary};

use super::dto::*;
use super::state::AppState;

/// Header carrying the caller's already-authenticated user id.
pub const USER_HEADER: &str = "x-user-id";

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/stations", get(list_stations))
        .route("/api/stations/:name", get(get_station))
        .route("/api/stations/:name/departures", get(station_departures))
        .route("/api/monitors", get(get_monitors))
        .route("/api/map", get(map))
        .route("/api/favorites", get(list_favorites))
        .route(
            "/api/favorites/:name",
            put(add_favorite).delete(remove_favorite),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The caller's user id, if the request carries one.
fn user_from_headers(headers: &HeaderMap) -> Option<UserId> {
    headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| UserId::new(v))
}

fn require_user(headers: &HeaderMap) -> Result<UserId, AppError> {
    user_from_headers(headers).ok_or(AppError::Unauthorized)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// All stations, optionally filtered by name or to the caller's favorites.
async fn list_stations(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(req): Query<StationListRequest>,
) -> Result<Json<Vec<StationSummary>>, AppError> {
    let user = user_from_headers(&headers);

    if req.favorites {
        let user = user.ok_or(AppError::Unauthorized)?;
        return Ok(Json(state.stations.favorite_stations(&user).await?));
    }

    let stations = match req.q.as_deref().filter(|q| !q.trim().is_empty()) {
        Some(q) => state.stations.search_stations(q, user.as_ref()).await?,
        None => state.stations.list_stations(user.as_ref()).await?,
    };

    Ok(Json(stations))
}

/// One station by its path token.
async fn get_station(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(token): Path<String>,
) -> Result<Json<StationSummary>, AppError> {
    let name = station_name::decode(&token)?;
    let user = user_from_headers(&headers);

    Ok(Json(state.stations.get_station(&name, user.as_ref()).await?))
}

/// A station together with live departures at its stops.
async fn station_departures(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(token): Path<String>,
    Query(req): Query<DeparturesRequest>,
) -> Result<Json<StationDeparturesResponse>, AppError> {
    let name = station_name::decode(&token)?;
    let user = user_from_headers(&headers);

    let station = state.stations.get_station(&name, user.as_ref()).await?;
    let monitors = state.monitors.get_monitors(&station.stop_ids).await?;

    let max_departures = req.max_departures();
    let monitors = monitors
        .iter()
        .map(|m| MonitorView::from_monitor(m, max_departures))
        .collect();

    Ok(Json(StationDeparturesResponse { station, monitors }))
}

/// Raw monitors for the given stop ids.
async fn get_monitors(
    State(state): State<AppState>,
    Query(req): Query<MonitorRequest>,
) -> Result<Json<Vec<Monitor>>, AppError> {
    let stop_ids = parse_stop_id_list(&req.stop_ids)?;
    Ok(Json(state.monitors.get_monitors(&stop_ids).await?))
}

/// Station positions for the map.
async fn map(State(state): State<AppState>) -> Result<Json<MapResponse>, AppError> {
    let stations = state.stations.station_markers().await?;
    Ok(Json(MapResponse {
        center: CENTER_OF_VIENNA,
        stations,
    }))
}

/// Names of the caller's favorites.
async fn list_favorites(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<BTreeSet<String>>, AppError> {
    let user = require_user(&headers)?;
    Ok(Json(state.stations.favorites(&user).await?))
}

async fn add_favorite(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(token): Path<String>,
) -> Result<StatusCode, AppError> {
    let user = require_user(&headers)?;
    let name = station_name::decode(&token)?;

    state.stations.add_favorite(&user, &name).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn remove_favorite(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(token): Path<String>,
) -> Result<StatusCode, AppError> {
    let user = require_user(&headers)?;
    let name = station_name::decode(&token)?;

    state.stations.remove_favorite(&user, &name).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Unauthorized,
    NotFound { message: String },
    Conflict { message: String },
    /// Live data upstream failed; the message is passed through untouched.
    BadGateway { message: String },
    Unavailable { message: String },
    Internal { message: String },
}

impl From<InvalidToken> for AppError {
    fn from(e: InvalidToken) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<InvalidStopId> for AppError {
    fn from(e: InvalidStopId) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        match e {
            QueryError::Directory(e @ DirectoryError::StationNotFound { .. }) => {
                AppError::NotFound {
                    message: e.to_string(),
                }
            }
            QueryError::Directory(e @ DirectoryError::Build(_)) => AppError::Unavailable {
                message: e.to_string(),
            },
            QueryError::Favorite(e @ FavoriteError::Duplicate { .. }) => AppError::Conflict {
                message: e.to_string(),
            },
            QueryError::Favorite(e @ FavoriteError::Backend { .. }) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<MonitorError> for AppError {
    fn from(e: MonitorError) -> Self {
        match e {
            MonitorError::Status { message, .. } => AppError::BadGateway { message },
            other => AppError::BadGateway {
                message: other.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                format!("missing {USER_HEADER} header"),
            ),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use std::sync::Arc;

    fn status_of(err: impl Into<AppError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn user_header_is_read() {
        let mut headers = HeaderMap::new();
        assert!(user_from_headers(&headers).is_none());

        headers.insert(USER_HEADER, HeaderValue::from_static("alice"));
        assert_eq!(user_from_headers(&headers).unwrap().as_str(), "alice");

        headers.insert(USER_HEADER, HeaderValue::from_static("  "));
        assert!(user_from_headers(&headers).is_none());
        assert!(matches!(require_user(&headers), Err(AppError::Unauthorized)));
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = QueryError::from(DirectoryError::StationNotFound {
            name: "Atlantis".into(),
        });
        assert_eq!(status_of(err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn duplicate_maps_to_409() {
        let err = QueryError::from(FavoriteError::Duplicate {
            user: UserId::new("alice").unwrap(),
            station: "Karlsplatz".into(),
        });
        assert_eq!(status_of(err), StatusCode::CONFLICT);
    }

    #[test]
    fn store_failure_maps_to_500() {
        let err = QueryError::from(FavoriteError::Backend {
            message: "connection reset".into(),
        });
        assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn build_failure_maps_to_503() {
        let err = QueryError::from(DirectoryError::Build(Arc::new(
            crate::stops::StopError::Fetch {
                message: "offline".into(),
            },
        )));
        assert_eq!(status_of(err), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn upstream_status_message_passes_through() {
        let err = AppError::from(MonitorError::Status {
            code: 312,
            message: "Rate limit exceeded".into(),
        });
        assert!(matches!(
            &err,
            AppError::BadGateway { message } if message == "Rate limit exceeded"
        ));
        assert_eq!(status_of(err), StatusCode::BAD_GATEWAY);

        assert_eq!(status_of(MonitorError::EmptyData), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn bad_input_maps_to_400() {
        assert_eq!(
            status_of(station_name::decode("dangling-").unwrap_err()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(parse_stop_id_list("1,x").unwrap_err()),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn missing_user_maps_to_401() {
        assert_eq!(status_of(AppError::Unauthorized), StatusCode::UNAUTHORIZED);
    }
}
