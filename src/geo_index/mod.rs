//! GeoIndex: latitude-keyed AVL tree with pruned radius search.

pub mod avl;

pub use avl::{AvlTree, Iter, Pruning, RadiusScan};

use crate::error::Result;
use crate::index::SpatialIndex;
use crate::point::Point;

/// A balanced spatial index over geo-tagged records.
///
/// Insertion takes `&mut self` and search takes `&self`, so sharing an index
/// across threads needs the usual external lock; concurrent read-only searches
/// through `&GeoIndex` are fine.
#[derive(Debug, Clone)]
pub struct GeoIndex<P> {
    tree: AvlTree<P>,
    pruning: Pruning,
}

impl<P> GeoIndex<P> {
    /// Create an empty index using latitude-band pruning.
    ///
    /// This is not the legacy child-key rule, which can miss records that sit
    /// at the search center; pass [`Pruning::ChildKey`] to
    /// [`with_pruning`](Self::with_pruning) to reproduce it.
    pub fn new() -> Self {
        Self::with_pruning(Pruning::default())
    }

    /// Create an empty index with an explicit pruning rule.
    pub fn with_pruning(pruning: Pruning) -> Self {
        Self {
            tree: AvlTree::new(),
            pruning,
        }
    }

    /// Build an index from records, failing on the first invalid coordinate.
    pub fn from_records(
        records: impl IntoIterator<Item = (Point, P)>,
        pruning: Pruning,
    ) -> Result<Self> {
        let mut index = Self::with_pruning(pruning);
        for (point, payload) in records {
            point.validate()?;
            index.tree.insert(point, payload);
        }
        log::debug!(
            "built geo index: {} records, height {}",
            index.tree.len(),
            index.tree.height()
        );
        Ok(index)
    }

    pub fn pruning(&self) -> Pruning {
        self.pruning
    }

    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// Diagnostic check of the ordering and AVL balance invariants.
    pub fn is_balanced(&self) -> bool {
        self.tree.is_balanced()
    }

    /// Borrowing iterator in ascending latitude order.
    pub fn iter(&self) -> Iter<'_, P> {
        self.tree.iter()
    }

    /// Radius search that borrows results and reports how many nodes were visited.
    pub fn scan_radius(&self, center: &Point, radius_km: f64) -> RadiusScan<'_, P> {
        self.tree.scan_radius(center, radius_km, self.pruning)
    }
}

impl<P> Default for GeoIndex<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Clone> SpatialIndex<P> for GeoIndex<P> {
    fn insert(&mut self, point: Point, payload: P) -> Result<()> {
        if let Err(err) = point.validate() {
            log::warn!("rejecting insert: {}", err);
            return Err(err);
        }
        self.tree.insert(point, payload);
        Ok(())
    }

    fn search_radius(&self, center: &Point, radius_km: f64) -> Vec<(Point, P)> {
        self.scan_radius(center, radius_km)
            .hits
            .into_iter()
            .map(|(point, payload)| (*point, payload.clone()))
            .collect()
    }

    fn all_records(&self) -> Vec<(Point, P)> {
        self.iter()
            .map(|(point, payload)| (*point, payload.clone()))
            .collect()
    }

    fn len(&self) -> usize {
        self.tree.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeoRouteError;

    fn moscow_landmarks() -> GeoIndex<String> {
        let mut index = GeoIndex::new();
        for (lat, lon, name) in [
            (55.7558, 37.6176, "Red Square"),
            (55.7522, 37.6156, "Kremlin"),
            (55.7587, 37.6194, "GUM"),
            (55.7610, 37.6179, "St. Basil's Cathedral"),
            (55.7539, 37.6214, "Alexander Garden"),
        ] {
            index.insert(Point::new(lat, lon), name.to_string()).unwrap();
        }
        index
    }

    #[test]
    fn test_insert_and_len() {
        let index = moscow_landmarks();
        assert_eq!(index.len(), 5);
        assert!(index.is_balanced());
    }

    #[test]
    fn test_insert_invalid_fails_closed() {
        let mut index = moscow_landmarks();
        let result = index.insert(Point::new(95.0, 37.0), "nowhere".to_string());
        assert!(matches!(result, Err(GeoRouteError::InvalidCoordinate { .. })));
        assert_eq!(index.len(), 5);
        assert!(index
            .all_records()
            .iter()
            .all(|(_, name)| name != "nowhere"));
    }

    #[test]
    fn test_search_radius() {
        let index = moscow_landmarks();
        let center = Point::new(55.7558, 37.6176);

        let near = index.search_radius(&center, 0.35);
        let mut names: Vec<String> = near.into_iter().map(|(_, n)| n).collect();
        names.sort();
        assert_eq!(names, vec!["Alexander Garden", "GUM", "Red Square"]);

        assert_eq!(index.search_radius(&center, 5.0).len(), 5);
    }

    #[test]
    fn test_search_zero_radius_finds_exact_match() {
        let index = moscow_landmarks();
        let hits = index.search_radius(&Point::new(55.7522, 37.6156), 0.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].1, "Kremlin");
    }

    #[test]
    fn test_all_records_ascending() {
        let index = moscow_landmarks();
        let records = index.all_records();
        assert_eq!(records.len(), 5);
        assert_eq!(records[0].1, "Kremlin");
        assert_eq!(records[4].1, "St. Basil's Cathedral");
    }

    #[test]
    fn test_default_pruning_finds_center_record() {
        // 2.0 at the root, 1.0 to its left, 1.5 below that
        let mut band = GeoIndex::new();
        let mut legacy = GeoIndex::with_pruning(Pruning::ChildKey);
        for (i, lat) in [2.0, 1.0, 3.0, 1.5].into_iter().enumerate() {
            band.insert(Point::new(lat, 0.0), i).unwrap();
            legacy.insert(Point::new(lat, 0.0), i).unwrap();
        }
        assert_eq!(band.pruning(), Pruning::LatitudeBand);
        assert_eq!(legacy.pruning(), Pruning::ChildKey);

        let center = Point::new(1.5, 0.0);
        assert_eq!(band.search_radius(&center, 0.1), vec![(center, 3)]);
        assert!(legacy.search_radius(&center, 0.1).is_empty());
    }

    #[test]
    fn test_from_records_rejects_invalid() {
        let records = vec![
            (Point::new(10.0, 10.0), 1),
            (Point::new(10.0, 200.0), 2),
        ];
        assert!(GeoIndex::from_records(records, Pruning::LatitudeBand).is_err());
    }
}
