//! Planner configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GeoRouteError, Result};
use crate::geo_index::Pruning;
use crate::provider::TravelMode;

/// Tunables for candidate selection and indexing.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Most candidates handed to the solver; the farthest are dropped first.
    pub max_candidates: usize,
    /// Most names taken from a ranker's answer.
    pub ranker_cap: usize,
    /// Search radius around the origin when travelling on foot.
    pub walking_radius_km: f64,
    /// Search radius around the origin when driving.
    pub driving_radius_km: f64,
    /// Subtree pruning rule for radius queries.
    pub pruning: Pruning,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_candidates: 15,
            ranker_cap: 15,
            walking_radius_km: 1.0,
            driving_radius_km: 5.0,
            pruning: Pruning::LatitudeBand,
        }
    }
}

impl PlannerConfig {
    /// Load and validate a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        log::debug!("loaded planner config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_candidates == 0 {
            return Err(GeoRouteError::ConfigError(
                "max_candidates must be at least 1".to_string(),
            ));
        }
        if self.ranker_cap == 0 {
            return Err(GeoRouteError::ConfigError(
                "ranker_cap must be at least 1".to_string(),
            ));
        }
        for (key, radius) in [
            ("walking_radius_km", self.walking_radius_km),
            ("driving_radius_km", self.driving_radius_km),
        ] {
            if !(radius.is_finite() && radius > 0.0) {
                return Err(GeoRouteError::ConfigError(format!(
                    "{} must be a positive number, got {}",
                    key, radius
                )));
            }
        }
        Ok(())
    }

    /// Default search radius for a travel mode.
    pub fn radius_for(&self, mode: TravelMode) -> f64 {
        match mode {
            TravelMode::Walking => self.walking_radius_km,
            TravelMode::Driving => self.driving_radius_km,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::default();
        assert_eq!(config.max_candidates, 15);
        assert_eq!(config.radius_for(TravelMode::Walking), 1.0);
        assert_eq!(config.radius_for(TravelMode::Driving), 5.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PlannerConfig =
            serde_json::from_str(r#"{"max_candidates": 8, "pruning": "child_key"}"#).unwrap();
        assert_eq!(config.max_candidates, 8);
        assert_eq!(config.pruning, Pruning::ChildKey);
        assert_eq!(config.ranker_cap, 15);
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"walking_radius_km": 2.5}}"#).unwrap();

        let config = PlannerConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.walking_radius_km, 2.5);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"driving_radius_km": -1.0}}"#).unwrap();

        let result = PlannerConfig::from_json_file(file.path());
        assert!(matches!(result, Err(GeoRouteError::ConfigError(_))));
    }

    #[test]
    fn test_round_trip() {
        let config = PlannerConfig {
            max_candidates: 10,
            ..PlannerConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: PlannerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
