//! Error types for the route planner

use std::time::Duration;

use thiserror::Error;

/// Result type alias for georoute operations
pub type Result<T> = std::result::Result<T, GeoRouteError>;

/// Error types that can occur while indexing points or planning a route
#[derive(Error, Debug)]
pub enum GeoRouteError {
    #[error("Invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("No candidates to plan a route through")]
    NoCandidates,

    #[error("Distance provider error: {0}")]
    DistanceProvider(String),

    #[error("Unsolvable instance: {reason}")]
    UnsolvableInstance { reason: String },

    #[error("Invalid cost matrix: {reason}")]
    InvalidMatrix { reason: String },

    #[error("Search cancelled")]
    Cancelled,

    #[error("Solver task failed: {0}")]
    SolverTask(String),

    #[error("Deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Config error: {0}")]
    ConfigError(String),
}

impl From<serde_json::Error> for GeoRouteError {
    fn from(err: serde_json::Error) -> Self {
        GeoRouteError::SerializationError(err.to_string())
    }
}
