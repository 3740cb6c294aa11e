//! Geographic bounds and coordinate formatting.

use serde::{Deserialize, Serialize};

/// Fractional digits used when rendering corner coordinates.
pub const DEGREE_PRECISION: usize = 4;

/// Latitude/longitude envelope of an entity's observations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLonBounds {
    pub lower_lat: f64,
    pub upper_lat: f64,
    pub lower_lon: f64,
    pub upper_lon: f64,
}

impl LatLonBounds {
    /// Degenerate envelope around a single point.
    pub fn point(lat: f64, lon: f64) -> Self {
        Self {
            lower_lat: lat,
            upper_lat: lat,
            lower_lon: lon,
            upper_lon: lon,
        }
    }

    /// Envelope of a set of (lat, lon) pairs. NaN coordinates are skipped.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        points
            .into_iter()
            .filter(|(lat, lon)| !lat.is_nan() && !lon.is_nan())
            .map(|(lat, lon)| Self::point(lat, lon))
            .reduce(|acc, b| acc.union(&b))
    }

    /// Smallest envelope containing both.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            lower_lat: self.lower_lat.min(other.lower_lat),
            upper_lat: self.upper_lat.max(other.upper_lat),
            lower_lon: self.lower_lon.min(other.lower_lon),
            upper_lon: self.upper_lon.max(other.upper_lon),
        }
    }

    pub fn lower_corner(&self) -> String {
        format_corner(self.lower_lat, self.lower_lon)
    }

    pub fn upper_corner(&self) -> String {
        format_corner(self.upper_lat, self.upper_lon)
    }
}

/// Format one coordinate to the fixed corner precision.
pub fn format_degree(value: f64) -> String {
    format!("{:.*}", DEGREE_PRECISION, value)
}

/// `"lat lon"` as used by `gml:lowerCorner` / `gml:upperCorner`.
pub fn format_corner(lat: f64, lon: f64) -> String {
    format!("{} {}", format_degree(lat), format_degree(lon))
}
