//! Brute-force flat index: O(n) radius search

use std::cmp::Ordering;

use crate::distance::haversine_km;
use crate::error::Result;
use crate::index::SpatialIndex;
use crate::point::Point;

/// A flat (brute-force) index that computes distance to every stored record.
#[derive(Debug, Clone)]
pub struct FlatIndex<P> {
    records: Vec<(Point, P)>,
}

impl<P> FlatIndex<P> {
    /// Create a new empty flat index.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Iterate over all records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &(Point, P)> {
        self.records.iter()
    }
}

impl<P> Default for FlatIndex<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Clone> SpatialIndex<P> for FlatIndex<P> {
    fn insert(&mut self, point: Point, payload: P) -> Result<()> {
        point.validate()?;
        self.records.push((point, payload));
        Ok(())
    }

    fn search_radius(&self, center: &Point, radius_km: f64) -> Vec<(Point, P)> {
        self.records
            .iter()
            .filter(|(point, _)| haversine_km(center, point) <= radius_km)
            .cloned()
            .collect()
    }

    fn all_records(&self) -> Vec<(Point, P)> {
        let mut records = self.records.clone();
        // stable, so equal latitudes keep insertion order like the tree does
        records.sort_by(|a, b| {
            a.0.latitude()
                .partial_cmp(&b.0.latitude())
                .unwrap_or(Ordering::Equal)
        });
        records
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
