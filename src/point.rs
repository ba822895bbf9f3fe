//! Geographic point type

use crate::distance::haversine_km;
use crate::error::{GeoRouteError, Result};
use serde::{Deserialize, Serialize};

/// A position on the Earth's surface in decimal degrees.
///
/// Construction is unchecked so points can be built in const-like contexts;
/// anything that stores or routes through a point calls [`Point::validate`] first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    #[serde(alias = "lat")]
    latitude: f64,
    #[serde(alias = "lon")]
    longitude: f64,
}

impl Point {
    /// Create a point without range checks
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Create a point, rejecting NaN, infinite or out-of-range coordinates
    pub fn checked(latitude: f64, longitude: f64) -> Result<Self> {
        let point = Self::new(latitude, longitude);
        point.validate()?;
        Ok(point)
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Whether both coordinates are finite and within |lat| <= 90, |lon| <= 180
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude.abs() <= 90.0
            && self.longitude.abs() <= 180.0
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(GeoRouteError::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }

    /// Great-circle distance to another point in kilometers
    pub fn distance_km(&self, other: &Point) -> f64 {
        haversine_km(self, other)
    }

    /// Parse a point from a "lat,lon" string
    pub fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 2 {
            return Err(GeoRouteError::SerializationError(format!(
                "Expected \"lat,lon\", got: {}",
                s
            )));
        }
        let parse = |x: &str| {
            x.parse::<f64>()
                .map_err(|_| GeoRouteError::SerializationError(format!("Invalid float: {}", x)))
        };
        Self::checked(parse(parts[0])?, parse(parts[1])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_accepts_bounds() {
        assert!(Point::checked(90.0, 180.0).is_ok());
        assert!(Point::checked(-90.0, -180.0).is_ok());
        assert!(Point::checked(55.7558, 37.6176).is_ok());
    }

    #[test]
    fn test_checked_rejects_out_of_range() {
        assert!(matches!(
            Point::checked(90.5, 0.0),
            Err(GeoRouteError::InvalidCoordinate { .. })
        ));
        assert!(matches!(
            Point::checked(0.0, -180.01),
            Err(GeoRouteError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_checked_rejects_non_finite() {
        assert!(Point::checked(f64::NAN, 0.0).is_err());
        assert!(Point::checked(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_from_str() {
        let p = Point::from_str("47.2357, 39.7015").unwrap();
        assert_eq!(p.latitude(), 47.2357);
        assert_eq!(p.longitude(), 39.7015);
        assert!(Point::from_str("47.2357").is_err());
        assert!(Point::from_str("north,39.7").is_err());
        assert!(Point::from_str("91.0,0.0").is_err());
    }

    #[test]
    fn test_deserialize_short_keys() {
        let p: Point = serde_json::from_str(r#"{"lat": 1.5, "lon": 2.5}"#).unwrap();
        assert_eq!(p, Point::new(1.5, 2.5));
    }
}
