//! Collaborator interfaces: travel-cost matrices and name ranking

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::distance::haversine_km;
use crate::error::{GeoRouteError, Result};
use crate::matrix::CostMatrix;
use crate::point::Point;

/// How the route will be travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Walking,
    Driving,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Walking => "walking",
            TravelMode::Driving => "driving",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = GeoRouteError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "walking" => Ok(TravelMode::Walking),
            "driving" => Ok(TravelMode::Driving),
            other => Err(GeoRouteError::ConfigError(format!(
                "travel mode must be 'walking' or 'driving', got '{}'",
                other
            ))),
        }
    }
}

/// Source of pairwise travel costs, typically a routing service.
///
/// Given `n` ordered points it returns an n×n matrix whose row/column `i`
/// refers to `points[i]`. Transport or service failures come back as
/// [`GeoRouteError::DistanceProvider`].
pub trait DistanceProvider {
    fn cost_matrix(&self, points: &[Point], mode: TravelMode) -> Result<CostMatrix>;
}

impl<F> DistanceProvider for F
where
    F: Fn(&[Point], TravelMode) -> Result<CostMatrix>,
{
    fn cost_matrix(&self, points: &[Point], mode: TravelMode) -> Result<CostMatrix> {
        self(points, mode)
    }
}

/// Offline provider: great-circle kilometres scaled by a detour factor.
///
/// The travel mode does not change the result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HaversineProvider {
    detour_factor: f64,
}

impl HaversineProvider {
    pub fn new(detour_factor: f64) -> Result<Self> {
        if !(detour_factor.is_finite() && detour_factor > 0.0) {
            return Err(GeoRouteError::ConfigError(format!(
                "detour factor must be positive, got {}",
                detour_factor
            )));
        }
        Ok(Self { detour_factor })
    }

    pub fn detour_factor(&self) -> f64 {
        self.detour_factor
    }
}

impl Default for HaversineProvider {
    fn default() -> Self {
        Self { detour_factor: 1.0 }
    }
}

impl DistanceProvider for HaversineProvider {
    fn cost_matrix(&self, points: &[Point], _mode: TravelMode) -> Result<CostMatrix> {
        let rows: Vec<Vec<f64>> = points
            .par_iter()
            .enumerate()
            .map(|(i, from)| {
                points
                    .iter()
                    .enumerate()
                    .map(|(j, to)| {
                        if i == j {
                            f64::INFINITY
                        } else {
                            haversine_km(from, to) * self.detour_factor
                        }
                    })
                    .collect()
            })
            .collect();
        CostMatrix::from_rows(rows)
    }
}

/// Narrows a list of place names to the most interesting subset.
///
/// Failures are not fatal to planning; the pipeline falls back to the full list.
pub trait NameRanker {
    fn rank(&self, names: &[String]) -> Result<Vec<String>>;
}

impl<F> NameRanker for F
where
    F: Fn(&[String]) -> Result<Vec<String>>,
{
    fn rank(&self, names: &[String]) -> Result<Vec<String>> {
        self(names)
    }
}
