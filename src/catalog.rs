//! Place records loaded from JSON files

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geo_index::{GeoIndex, Pruning};
use crate::point::Point;

/// A named point of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lon")]
    pub longitude: f64,
    #[serde(default)]
    pub category: Option<String>,
}

impl Place {
    pub fn point(&self) -> Point {
        Point::new(self.latitude, self.longitude)
    }
}

/// Read a JSON array of places.
pub fn load_places(path: impl AsRef<Path>) -> Result<Vec<Place>> {
    let text = std::fs::read_to_string(path.as_ref())?;
    let places: Vec<Place> = serde_json::from_str(&text)?;
    log::info!("loaded {} places from {}", places.len(), path.as_ref().display());
    Ok(places)
}

/// Index places by name; fails on the first invalid coordinate.
pub fn build_index(places: &[Place], pruning: Pruning) -> Result<GeoIndex<String>> {
    GeoIndex::from_records(
        places.iter().map(|place| (place.point(), place.name.clone())),
        pruning,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeoRouteError;
    use crate::index::SpatialIndex;
    use std::io::Write;

    #[test]
    fn test_load_and_index() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"name": "Theatre Square", "lat": 47.2263, "lon": 39.7448, "category": "square"}},
                {{"name": "Embankment", "latitude": 47.2166, "longitude": 39.7110}}
            ]"#
        )
        .unwrap();

        let places = load_places(file.path()).unwrap();
        assert_eq!(places.len(), 2);
        assert_eq!(places[0].category.as_deref(), Some("square"));
        assert_eq!(places[1].category, None);

        let index = build_index(&places, Pruning::LatitudeBand).unwrap();
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            load_places(file.path()),
            Err(GeoRouteError::SerializationError(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_places("/definitely/not/here.json"),
            Err(GeoRouteError::IoError(_))
        ));
    }
}
