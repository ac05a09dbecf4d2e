//! Station queries annotated with favorite state.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::directory::{DirectoryError, Station, StationDirectoryCache};
use crate::domain::{Coordinate, StopId, UserId};
use crate::favorites::FavoriteStore;
use crate::stops::StopSource;

use super::error::QueryError;

/// A station as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationSummary {
    pub name: String,
    pub stop_ids: Vec<StopId>,
    /// Present only when the query was made on behalf of a user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
}

impl StationSummary {
    fn annotate(station: &Station, favorites: Option<&BTreeSet<String>>) -> Self {
        Self {
            name: station.name.clone(),
            stop_ids: station.stop_ids.clone(),
            is_favorite: favorites.map(|f| f.contains(&station.name)),
        }
    }
}

/// A station position for map display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationMarker {
    pub name: String,
    pub location: Coordinate,
}

/// Answers station queries from the cached directory and a favorite store.
pub struct StationQueryService<S, F> {
    directory: StationDirectoryCache<S>,
    favorites: F,
}

impl<S: StopSource, F: FavoriteStore> StationQueryService<S, F> {
    pub fn new(directory: StationDirectoryCache<S>, favorites: F) -> Self {
        Self {
            directory,
            favorites,
        }
    }

    /// The underlying directory cache.
    pub fn directory(&self) -> &StationDirectoryCache<S> {
        &self.directory
    }

    /// The user's favorite set, fetched once per query.
    async fn favorite_set(
        &self,
        user: Option<&UserId>,
    ) -> Result<Option<BTreeSet<String>>, QueryError> {
        match user {
            Some(user) => Ok(Some(self.favorites.list_names(user).await?)),
            None => Ok(None),
        }
    }

    /// Every station in name order.
    ///
    /// With a user, each entry says whether it is one of their favorites;
    /// without one, `is_favorite` is left out.
    pub async fn list_stations(
        &self,
        user: Option<&UserId>,
    ) -> Result<Vec<StationSummary>, QueryError> {
        self.filtered_stations(user, |_| true).await
    }

    /// Stations whose name contains `query`, ignoring case.
    pub async fn search_stations(
        &self,
        query: &str,
        user: Option<&UserId>,
    ) -> Result<Vec<StationSummary>, QueryError> {
        let needle = query.trim().to_lowercase();
        self.filtered_stations(user, |station| {
            station.name.to_lowercase().contains(&needle)
        })
        .await
    }

    async fn filtered_stations<P>(
        &self,
        user: Option<&UserId>,
        mut keep: P,
    ) -> Result<Vec<StationSummary>, QueryError>
    where
        P: FnMut(&Station) -> bool,
    {
        let directory = self.directory.get_all().await?;
        let favorites = self.favorite_set(user).await?;

        Ok(directory
            .iter()
            .filter(|station| keep(station))
            .map(|station| StationSummary::annotate(station, favorites.as_ref()))
            .collect())
    }

    /// One station by exact name.
    pub async fn get_station(
        &self,
        name: &str,
        user: Option<&UserId>,
    ) -> Result<StationSummary, QueryError> {
        let station = self.directory.get_by_name(name).await?;
        let favorites = self.favorite_set(user).await?;
        Ok(StationSummary::annotate(&station, favorites.as_ref()))
    }

    /// The user's favorites that exist in the directory, in name order.
    pub async fn favorite_stations(&self, user: &UserId) -> Result<Vec<StationSummary>, QueryError> {
        let directory = self.directory.get_all().await?;
        let favorites = self.favorites.list_names(user).await?;

        Ok(favorites
            .iter()
            .filter_map(|name| directory.get(name))
            .map(|station| StationSummary::annotate(station, Some(&favorites)))
            .collect())
    }

    /// Positions of all stations that have one.
    pub async fn station_markers(&self) -> Result<Vec<StationMarker>, QueryError> {
        let directory = self.directory.get_all().await?;

        Ok(directory
            .iter()
            .filter_map(|station| {
                station.location.map(|location| StationMarker {
                    name: station.name.clone(),
                    location,
                })
            })
            .collect())
    }

    /// Names of the user's favorites, including ones no longer in the directory.
    pub async fn favorites(&self, user: &UserId) -> Result<BTreeSet<String>, QueryError> {
        Ok(self.favorites.list_names(user).await?)
    }

    /// Add a favorite; the station must exist.
    pub async fn add_favorite(&self, user: &UserId, name: &str) -> Result<(), QueryError> {
        let directory = self.directory.get_all().await?;
        if !directory.contains(name) {
            return Err(DirectoryError::StationNotFound {
                name: name.to_string(),
            }
            .into());
        }

        Ok(self.favorites.add(user, name).await?)
    }

    /// Remove a favorite; a missing one is ignored.
    pub async fn remove_favorite(&self, user: &UserId, name: &str) -> Result<(), QueryError> {
        Ok(self.favorites.remove(user, name).await?)
    }
}
