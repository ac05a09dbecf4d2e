//! Stations and the station directory snapshot.

use std::collections::BTreeMap;

use crate::domain::{Coordinate, StopId, centroid};
use crate::stops::StopRecord;

/// A named group of stops sharing one display name.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    /// Display name; unique within a directory.
    pub name: String,
    /// Member stops, in registry order.
    pub stop_ids: Vec<StopId>,
    /// Mean position of the members that have one.
    pub location: Option<Coordinate>,
}

impl Station {
    /// Build a station from its members.
    ///
    /// Members without a position still belong to the station but do not
    /// contribute to its centroid.
    pub fn from_members<I>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = (StopId, Option<Coordinate>)>,
    {
        let (stop_ids, positions): (Vec<_>, Vec<_>) = members.into_iter().unzip();

        Self {
            name: name.into(),
            stop_ids,
            location: centroid(positions.into_iter().flatten()),
        }
    }
}

/// Immutable name → station mapping, iterated in name order.
#[derive(Debug, Clone, Default)]
pub struct StationDirectory {
    stations: BTreeMap<String, Station>,
}

impl StationDirectory {
    /// Group stop records into stations by exact (case-sensitive) name.
    pub fn build(stops: Vec<StopRecord>) -> Self {
        let mut groups: BTreeMap<String, Vec<(StopId, Option<Coordinate>)>> = BTreeMap::new();

        for stop in stops {
            groups
                .entry(stop.name)
                .or_default()
                .push((stop.id, Some(stop.location)));
        }

        let stations = groups
            .into_iter()
            .map(|(name, members)| {
                let station = Station::from_members(name.clone(), members);
                (name, station)
            })
            .collect();

        Self { stations }
    }

    /// Look up a station by its exact display name.
    pub fn get(&self, name: &str) -> Option<&Station> {
        self.stations.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.stations.contains_key(name)
    }

    /// All stations in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.stations.values()
    }

    /// Number of stations.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Total number of stops across all stations.
    pub fn stop_count(&self) -> usize {
        self.stations.values().map(|s| s.stop_ids.len()).sum()
    }
}
