//! Domain types for the station directory.
//!
//! Small validated value types shared by the ingestion, caching and query
//! layers.

mod coordinate;
pub mod station_name;
mod stop_id;
mod user;

pub use coordinate::{CENTER_OF_VIENNA, Coordinate, centroid};
pub use station_name::InvalidToken;
pub use stop_id::{InvalidStopId, StopId, join_stop_ids, parse_stop_id_list};
pub use user::UserId;
