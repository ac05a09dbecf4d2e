//! Geographic coordinates and centroids.

use serde::{Deserialize, Serialize};

/// A WGS84 latitude/longitude pair.
///
/// Serialized as `[lat, lon]`, the order map widgets take.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f64; 2]", from = "[f64; 2]")]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Create a coordinate, returning `None` unless both parts are finite.
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        (lat.is_finite() && lon.is_finite()).then_some(Self { lat, lon })
    }

    /// Build a coordinate from a GeoJSON `[lon, lat]` position.
    pub fn from_geojson(position: [f64; 2]) -> Option<Self> {
        Self::new(position[1], position[0])
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.lat, c.lon]
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Self { lat, lon }
    }
}

/// The centre of Vienna, used when no better map center is known.
pub const CENTER_OF_VIENNA: Coordinate = Coordinate {
    lat: 48.2082,
    lon: 16.3738,
};

/// Arithmetic mean of the given coordinates.
///
/// Returns `None` for an empty input.
pub fn centroid<I>(points: I) -> Option<Coordinate>
where
    I: IntoIterator<Item = Coordinate>,
{
    let (count, lat_sum, lon_sum) = points
        .into_iter()
        .fold((0usize, 0.0, 0.0), |(n, lat, lon), p| {
            (n + 1, lat + p.lat, lon + p.lon)
        });

    if count == 0 {
        return None;
    }

    let n = count as f64;
    Some(Coordinate {
        lat: lat_sum / n,
        lon: lon_sum / n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn centroid_of_two_points() {
        let c = centroid([
            Coordinate::new(48.0, 16.0).unwrap(),
            Coordinate::new(48.2, 16.2).unwrap(),
        ])
        .unwrap();
        assert!(approx(c.lat, 48.1));
        assert!(approx(c.lon, 16.1));
    }

    #[test]
    fn centroid_of_nothing() {
        assert!(centroid(std::iter::empty()).is_none());
    }

    #[test]
    fn rejects_non_finite() {
        assert!(Coordinate::new(f64::NAN, 16.0).is_none());
        assert!(Coordinate::new(48.0, f64::INFINITY).is_none());
    }

    #[test]
    fn geojson_order_is_lon_lat() {
        let c = Coordinate::from_geojson([16.37, 48.21]).unwrap();
        assert_eq!(c.lat, 48.21);
        assert_eq!(c.lon, 16.37);
    }

    #[test]
    fn serializes_as_lat_lon_pair() {
        let json = serde_json::to_string(&CENTER_OF_VIENNA).unwrap();
        assert_eq!(json, "[48.2082,16.3738]");
    }
}
