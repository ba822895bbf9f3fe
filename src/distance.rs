//! Great-circle distance and latitude-window helpers

use std::cmp::Ordering;
use std::f64::consts::PI;

use crate::point::Point;
use serde::{Deserialize, Serialize};

/// Mean Earth radius used by every distance computation in this crate
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Length of one degree of latitude along a meridian
pub const KM_PER_DEGREE_LATITUDE: f64 = EARTH_RADIUS_KM * PI / 180.0;

/// Haversine great-circle distance between two points in kilometers
pub fn haversine_km(a: &Point, b: &Point) -> f64 {
    let phi1 = a.latitude().to_radians();
    let phi2 = b.latitude().to_radians();
    let delta_phi = (b.latitude() - a.latitude()).to_radians();
    let delta_lambda = (b.longitude() - a.longitude()).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Latitude span in degrees covered by `radius_km` along a meridian.
///
/// Great-circle distance is never shorter than the meridian distance
/// between the two latitudes, so any point farther than this span in
/// latitude is also farther than `radius_km`.
pub fn latitude_span_deg(radius_km: f64) -> f64 {
    // absorb rounding between the linear span and the atan2 form above
    radius_km / KM_PER_DEGREE_LATITUDE * (1.0 + 1e-9) + 1e-12
}

/// Sort records nearest-first relative to `center`
pub fn sort_by_distance<P>(center: &Point, records: &mut [(Point, P)]) {
    records.sort_by(|a, b| {
        haversine_km(center, &a.0)
            .partial_cmp(&haversine_km(center, &b.0))
            .unwrap_or(Ordering::Equal)
    });
}

/// An axis-aligned latitude/longitude window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub min_longitude: f64,
    pub max_latitude: f64,
    pub max_longitude: f64,
}

impl BoundingBox {
    /// Square window of side `size_km` centered on `center`.
    ///
    /// Latitude scales linearly; the longitude span widens with 1 / cos(latitude).
    pub fn around(center: &Point, size_km: f64) -> Self {
        let delta_lat = size_km / KM_PER_DEGREE_LATITUDE;
        let delta_lon = size_km / (KM_PER_DEGREE_LATITUDE * center.latitude().to_radians().cos());

        Self {
            min_latitude: center.latitude() - delta_lat / 2.0,
            min_longitude: center.longitude() - delta_lon / 2.0,
            max_latitude: center.latitude() + delta_lat / 2.0,
            max_longitude: center.longitude() + delta_lon / 2.0,
        }
    }

    pub fn contains(&self, point: &Point) -> bool {
        point.latitude() >= self.min_latitude
            && point.latitude() <= self.max_latitude
            && point.longitude() >= self.min_longitude
            && point.longitude() <= self.max_longitude
    }
}
