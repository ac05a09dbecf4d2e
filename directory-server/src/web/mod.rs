//! Web layer for the station directory.
//!
//! JSON endpoints for station queries, live departures and favorites.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, USER_HEADER, create_router};
pub use state::{AppState, Stations};
