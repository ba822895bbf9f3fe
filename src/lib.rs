//! # georoute
//!
//! Picks nearby points of interest and orders them into the cheapest round trip.
//!
//! This library provides:
//! - A latitude-keyed AVL index with pruned great-circle radius search
//! - An exact branch-and-bound TSP solver with matrix-reduction bounds
//! - A planning pipeline wired to pluggable distance and ranking collaborators
//!
//! ## Example
//!
//! ```rust
//! use georoute::{GeoIndex, HaversineProvider, PlanningPipeline, Point, SpatialIndex};
//!
//! let mut index = GeoIndex::new();
//! index.insert(Point::new(47.2226, 39.7183), "Cathedral".to_string()).unwrap();
//! index.insert(Point::new(47.2166, 39.7110), "Embankment".to_string()).unwrap();
//! index.insert(Point::new(47.2263, 39.7448), "Theatre Square".to_string()).unwrap();
//!
//! let pipeline = PlanningPipeline::new(HaversineProvider::default());
//! let origin = Point::new(47.2220, 39.7200);
//! let tour = pipeline.plan_near(&index, &origin, Some(5.0)).unwrap();
//! assert_eq!(tour.stops.len(), 3);
//! ```

pub mod catalog;
pub mod config;
pub mod distance;
pub mod error;
pub mod flat_index;
pub mod geo_index;
pub mod index;
pub mod matrix;
pub mod metrics;
pub mod pipeline;
pub mod point;
pub mod provider;
pub mod solver;

pub use config::PlannerConfig;
pub use distance::{haversine_km, BoundingBox};
pub use error::{GeoRouteError, Result};
pub use flat_index::FlatIndex;
pub use geo_index::{GeoIndex, Pruning};
pub use index::SpatialIndex;
pub use matrix::CostMatrix;
pub use metrics::MetricsCollector;
pub use pipeline::{PlannedTour, PlanningPipeline};
pub use point::Point;
pub use provider::{DistanceProvider, HaversineProvider, NameRanker, TravelMode};
pub use solver::{solve_exhaustive, solve_with_deadline, RouteSolver, SolverStats, TourResult};
