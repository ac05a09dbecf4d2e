//! Favorite store contract and in-memory implementation.

use std::collections::{BTreeSet, HashMap};
use std::future::Future;

use tokio::sync::RwLock;

use crate::domain::UserId;

use super::error::FavoriteError;

/// Per-user CRUD of favorite station names.
///
/// Implementations provide their own atomicity; in particular `add` must
/// reject a pair that already exists.
pub trait FavoriteStore: Send + Sync + 'static {
    /// Mark a station as favorite. Fails with [`FavoriteError::Duplicate`]
    /// if it already is.
    fn add(
        &self,
        user: &UserId,
        station: &str,
    ) -> impl Future<Output = Result<(), FavoriteError>> + Send;

    /// Unmark a station. Removing a missing favorite is not an error.
    fn remove(
        &self,
        user: &UserId,
        station: &str,
    ) -> impl Future<Output = Result<(), FavoriteError>> + Send;

    /// All favorite station names of a user; empty if none.
    fn list_names(
        &self,
        user: &UserId,
    ) -> impl Future<Output = Result<BTreeSet<String>, FavoriteError>> + Send;
}

/// Favorite store that lives in process memory.
#[derive(Debug, Default)]
pub struct InMemoryFavoriteStore {
    favorites: RwLock<HashMap<UserId, BTreeSet<String>>>,
}

impl InMemoryFavoriteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FavoriteStore for InMemoryFavoriteStore {
    async fn add(&self, user: &UserId, station: &str) -> Result<(), FavoriteError> {
        let mut guard = self.favorites.write().await;
        let names = guard.entry(user.clone()).or_default();

        if !names.insert(station.to_string()) {
            return Err(FavoriteError::Duplicate {
                user: user.clone(),
                station: station.to_string(),
            });
        }

        Ok(())
    }

    async fn remove(&self, user: &UserId, station: &str) -> Result<(), FavoriteError> {
        let mut guard = self.favorites.write().await;
        if let Some(names) = guard.get_mut(user) {
            names.remove(station);
            if names.is_empty() {
                guard.remove(user);
            }
        }
        Ok(())
    }

    async fn list_names(&self, user: &UserId) -> Result<BTreeSet<String>, FavoriteError> {
        let guard = self.favorites.read().await;
        Ok(guard.get(user).cloned().unwrap_or_default())
    }
}
