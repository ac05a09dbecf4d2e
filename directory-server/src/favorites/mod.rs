//! Per-user favorite stations.
//!
//! Persistence is someone else's job; this module only fixes the CRUD
//! contract and ships an in-memory store.

mod error;
mod store;

pub use error::FavoriteError;
pub use store::{FavoriteStore, InMemoryFavoriteStore};
