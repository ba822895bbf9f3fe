//! Index trait for pluggable radius-search backends

use crate::error::Result;
use crate::point::Point;

/// A store of geo-tagged records that answers radius queries.
///
/// Payloads are opaque to the index: stored by value, cloned out on query,
/// never inspected or mutated.
pub trait SpatialIndex<P> {
    /// Add a record. Invalid coordinates are rejected and leave the index unchanged.
    fn insert(&mut self, point: Point, payload: P) -> Result<()>;

    /// All records within `radius_km` (great-circle) of `center`, in no particular order.
    fn search_radius(&self, center: &Point, radius_km: f64) -> Vec<(Point, P)>;

    /// Every record, ascending by latitude.
    fn all_records(&self) -> Vec<(Point, P)>;

    /// The number of records in this index.
    fn len(&self) -> usize;

    /// Whether the index is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
