//! Great-circle distance helpers.
//!
//! Distances are computed with the haversine formula on a spherical Earth and
//! rounded to whole meters per segment, so the length of a polyline is the sum
//! of its rounded legs.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A `[latitude, longitude]` pair in degrees.
///
/// Serialized as a two-element JSON array to match the wire format used by
/// clients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build coordinates from an untyped slice, rejecting anything other than
    /// exactly two finite numbers within geographic range.
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        let [latitude, longitude] = values else {
            return Err(Error::validation(format!(
                "coordinates must be a [lat, lng] pair, got {} values",
                values.len()
            )));
        };
        let coordinates = Self::new(*latitude, *longitude);
        coordinates.validate()?;
        Ok(coordinates)
    }

    /// Check that both components are finite and within range.
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(Error::validation("coordinates must be finite numbers"));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(Error::validation(format!(
                "latitude {} is outside [-90, 90]",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(Error::validation(format!(
                "longitude {} is outside [-180, 180]",
                self.longitude
            )));
        }
        Ok(())
    }

    /// Great-circle distance to another position in whole meters.
    pub fn distance_to(&self, other: &Self) -> f64 {
        distance(*self, *other)
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([latitude, longitude]: [f64; 2]) -> Self {
        Self::new(latitude, longitude)
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(value: Coordinates) -> Self {
        [value.latitude, value.longitude]
    }
}

/// Haversine distance between two positions, rounded to the nearest meter.
pub fn distance(p1: Coordinates, p2: Coordinates) -> f64 {
    let phi1 = p1.latitude.to_radians();
    let phi2 = p2.latitude.to_radians();
    let delta_phi = (p2.latitude - p1.latitude).to_radians();
    let delta_lambda = (p2.longitude - p1.longitude).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    // Rounding can push `a` past 1.0 for near-antipodal points.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    (EARTH_RADIUS_METERS * c).round()
}

/// Cumulative distance along an ordered polyline. Zero for fewer than two points.
pub fn path_distance(points: &[Coordinates]) -> f64 {
    points
        .windows(2)
        .map(|pair| distance(pair[0], pair[1]))
        .sum()
}
