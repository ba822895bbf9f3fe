//! Reference solver that enumerates every tour: O((n-1)!).
//!
//! Only practical for a handful of stops; used to cross-check the
//! branch-and-bound result.

use crate::error::{GeoRouteError, Result};
use crate::matrix::CostMatrix;

use super::TourResult;

/// Minimum-cost closed tour from stop 0 by trying every permutation of the rest.
pub fn solve_exhaustive(matrix: &CostMatrix) -> Result<TourResult> {
    let n = matrix.size();
    if n <= 1 {
        return Ok(TourResult {
            order: (0..n).collect(),
            total_cost: 0.0,
        });
    }

    let mut path = Vec::with_capacity(n);
    path.push(0);
    let mut used = vec![false; n];
    used[0] = true;
    let mut best: Option<TourResult> = None;

    extend(matrix, &mut path, &mut used, 0.0, &mut best);

    best.ok_or_else(|| GeoRouteError::UnsolvableInstance {
        reason: format!("no finite closed tour through all {} stops", n),
    })
}

fn extend(
    matrix: &CostMatrix,
    path: &mut Vec<usize>,
    used: &mut [bool],
    cost_so_far: f64,
    best: &mut Option<TourResult>,
) {
    let n = matrix.size();
    let last = path[path.len() - 1];

    if path.len() == n {
        let total = cost_so_far + matrix.cost(last, 0);
        let improves = best.as_ref().map_or(true, |b| total < b.total_cost);
        if total.is_finite() && improves {
            *best = Some(TourResult {
                order: path.clone(),
                total_cost: total,
            });
        }
        return;
    }

    for next in 1..n {
        if used[next] {
            continue;
        }
        used[next] = true;
        path.push(next);
        extend(matrix, path, used, cost_so_far + matrix.cost(last, next), best);
        path.pop();
        used[next] = false;
    }
}
