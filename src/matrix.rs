//! Square travel-cost matrix and row/column reduction

use ndarray::{Array2, ArrayView2};

use crate::error::{GeoRouteError, Result};

/// Pairwise travel costs between `n` stops.
///
/// Off-diagonal entries are non-negative; `f64::INFINITY` marks a forbidden
/// edge. The diagonal is always infinite so a stop is never its own successor.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    costs: Array2<f64>,
}

impl CostMatrix {
    /// Wrap an n×n array, forcing the diagonal to infinity.
    pub fn from_array(mut costs: Array2<f64>) -> Result<Self> {
        let (rows, cols) = costs.dim();
        if rows != cols {
            return Err(GeoRouteError::InvalidMatrix {
                reason: format!("expected a square matrix, got {}x{}", rows, cols),
            });
        }

        for ((i, j), &cost) in costs.indexed_iter() {
            if i != j && (cost.is_nan() || cost < 0.0) {
                return Err(GeoRouteError::InvalidMatrix {
                    reason: format!("entry ({}, {}) is {}", i, j, cost),
                });
            }
        }

        costs.diag_mut().mapv_inplace(|_| f64::INFINITY);
        Ok(Self { costs })
    }

    /// Build from row vectors, e.g. a decoded JSON table.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = rows.len();
        if let Some(bad) = rows.iter().find(|row| row.len() != n) {
            return Err(GeoRouteError::InvalidMatrix {
                reason: format!("row of length {} in a {}-row matrix", bad.len(), n),
            });
        }

        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        let costs = Array2::from_shape_vec((n, n), flat).map_err(|e| {
            GeoRouteError::InvalidMatrix {
                reason: e.to_string(),
            }
        })?;
        Self::from_array(costs)
    }

    /// Build from rows where `None` (JSON `null`) means "no edge".
    pub fn from_optional_rows(rows: Vec<Vec<Option<f64>>>) -> Result<Self> {
        Self::from_rows(
            rows.into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|c| c.unwrap_or(f64::INFINITY))
                        .collect()
                })
                .collect(),
        )
    }

    /// Number of stops.
    pub fn size(&self) -> usize {
        self.costs.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn cost(&self, from: usize, to: usize) -> f64 {
        self.costs[[from, to]]
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.costs.view()
    }

    /// Multiply every entry by `factor`, e.g. 0.001 to turn metres into kilometres.
    pub fn scaled(&self, factor: f64) -> Result<Self> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(GeoRouteError::InvalidMatrix {
                reason: format!("scale factor must be positive, got {}", factor),
            });
        }
        Self::from_array(self.costs.mapv(|c| c * factor))
    }

    /// Cost of the closed tour visiting `order` and returning to its first stop.
    pub fn tour_cost(&self, order: &[usize]) -> f64 {
        if order.len() < 2 {
            return 0.0;
        }
        let legs: f64 = order.windows(2).map(|w| self.cost(w[0], w[1])).sum();
        legs + self.cost(order[order.len() - 1], order[0])
    }

    /// Total reduction of a copy of this matrix: a lower bound on any tour.
    pub fn reduction_bound(&self) -> f64 {
        let mut working = self.costs.clone();
        reduce(&mut working)
    }

    pub(crate) fn to_working_copy(&self) -> Array2<f64> {
        self.costs.clone()
    }
}

/// Subtract each row's finite minimum, then each column's, in place.
///
/// Returns the total amount subtracted. Rows or columns that are entirely
/// infinite contribute nothing.
pub fn reduce(costs: &mut Array2<f64>) -> f64 {
    let mut total = 0.0;

    for mut row in costs.rows_mut() {
        let min = row.iter().copied().fold(f64::INFINITY, f64::min);
        if min.is_finite() {
            row.mapv_inplace(|c| c - min);
            total += min;
        }
    }

    for mut column in costs.columns_mut() {
        let min = column.iter().copied().fold(f64::INFINITY, f64::min);
        if min.is_finite() {
            column.mapv_inplace(|c| c - min);
            total += min;
        }
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    const INF: f64 = f64::INFINITY;

    #[test]
    fn test_diagonal_forced_infinite() {
        let m = CostMatrix::from_rows(vec![vec![0.0, 1.0], vec![2.0, 0.0]]).unwrap();
        assert_eq!(m.cost(0, 0), INF);
        assert_eq!(m.cost(1, 1), INF);
        assert_eq!(m.cost(0, 1), 1.0);
        assert_eq!(m.size(), 2);
    }

    #[test]
    fn test_rejects_non_square() {
        let result = CostMatrix::from_rows(vec![vec![0.0, 1.0], vec![2.0]]);
        assert!(matches!(result, Err(GeoRouteError::InvalidMatrix { .. })));
    }

    #[test]
    fn test_rejects_negative_and_nan() {
        assert!(CostMatrix::from_rows(vec![vec![0.0, -1.0], vec![2.0, 0.0]]).is_err());
        assert!(CostMatrix::from_rows(vec![vec![0.0, f64::NAN], vec![2.0, 0.0]]).is_err());
    }

    #[test]
    fn test_empty_matrix() {
        let m = CostMatrix::from_rows(vec![]).unwrap();
        assert!(m.is_empty());
        assert_eq!(m.reduction_bound(), 0.0);
    }

    #[test]
    fn test_optional_rows() {
        let m = CostMatrix::from_optional_rows(vec![
            vec![None, Some(3.0)],
            vec![None, None],
        ])
        .unwrap();
        assert_eq!(m.cost(0, 1), 3.0);
        assert_eq!(m.cost(1, 0), INF);
    }

    #[test]
    fn test_reduce_rows_then_columns() {
        let mut costs = array![
            [INF, 10.0, 15.0, 20.0],
            [10.0, INF, 35.0, 25.0],
            [15.0, 35.0, INF, 30.0],
            [20.0, 25.0, 30.0, INF],
        ];
        // row minima 10, 10, 15, 20; then column minima 0, 0, 5, 10
        let total = reduce(&mut costs);
        assert_relative_eq!(total, 70.0);
        for row in costs.rows() {
            assert!(row.iter().any(|&c| c == 0.0));
        }
        for column in costs.columns() {
            assert!(column.iter().any(|&c| c == 0.0));
        }
    }

    #[test]
    fn test_reduce_skips_infinite_rows() {
        let mut costs = array![[INF, INF], [4.0, INF]];
        assert_relative_eq!(reduce(&mut costs), 4.0);
        assert_eq!(costs[[1, 0]], 0.0);
    }

    #[test]
    fn test_tour_cost() {
        let m = CostMatrix::from_rows(vec![
            vec![0.0, 1.0, 9.0],
            vec![9.0, 0.0, 2.0],
            vec![3.0, 9.0, 0.0],
        ])
        .unwrap();
        assert_relative_eq!(m.tour_cost(&[0, 1, 2]), 6.0);
        assert_relative_eq!(m.tour_cost(&[0]), 0.0);
    }

    #[test]
    fn test_scaled_metres_to_km() {
        let m = CostMatrix::from_rows(vec![vec![0.0, 1500.0], vec![2500.0, 0.0]]).unwrap();
        let km = m.scaled(0.001).unwrap();
        assert_relative_eq!(km.cost(0, 1), 1.5);
        assert_relative_eq!(km.cost(1, 0), 2.5);
        assert_eq!(km.cost(0, 0), INF);
        assert!(m.scaled(0.0).is_err());
    }
}
