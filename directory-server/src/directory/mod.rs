//! Station directory: stops grouped into named stations.
//!
//! Stops that share a display name form one station; each station carries
//! the centroid of its stops. The directory is built from the stop registry
//! once and then served from memory.

mod cache;
mod error;
mod station;

pub use cache::StationDirectoryCache;
pub use error::DirectoryError;
pub use station::{Station, StationDirectory};
