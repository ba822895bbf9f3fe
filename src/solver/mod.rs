//! Exact route solver: branch-and-bound over reduced cost matrices.
//!
//! Every search node carries its own copy of the working matrix. Moving from
//! `city` to `next` blocks row `city`, column `next` and the edge back, then
//! re-reduces; the amount removed plus the real cost paid so far is the node's
//! lower bound. Nodes are expanded cheapest-bound first and discarded once
//! their bound reaches the best complete tour seen.

pub mod deadline;
pub mod exhaustive;
pub mod frontier;

pub use deadline::solve_with_deadline;
pub use exhaustive::solve_exhaustive;

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::{GeoRouteError, Result};
use crate::matrix::{reduce, CostMatrix};

use frontier::{Frontier, SearchNode};

/// An optimal closed tour.
///
/// `order` starts at stop 0 and lists every stop once; the edge from the last
/// stop back to 0 is included in `total_cost` but not repeated in `order`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourResult {
    pub order: Vec<usize>,
    pub total_cost: f64,
}

impl TourResult {
    fn trivial(n: usize) -> Self {
        Self {
            order: (0..n).collect(),
            total_cost: 0.0,
        }
    }
}

/// Counters describing how much of the search space was explored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverStats {
    /// Nodes whose children were generated.
    pub expanded: u64,
    /// Nodes placed on the frontier, the root included.
    pub pushed: u64,
    /// Nodes dropped by the bound, at push time or pop time.
    pub pruned: u64,
    /// Times a better complete tour replaced the incumbent.
    pub incumbents: u64,
    /// Largest frontier size observed.
    pub peak_frontier: usize,
}

/// Branch-and-bound TSP solver.
///
/// Runs to completion on the calling thread. Worst case is exponential in the
/// number of stops, so callers cap the input size and wrap long solves with
/// [`solve_with_deadline`] or their own cancellation flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteSolver;

impl RouteSolver {
    pub fn new() -> Self {
        Self
    }

    /// Find the minimum-cost closed tour starting and ending at stop 0.
    pub fn solve(&self, matrix: &CostMatrix) -> Result<TourResult> {
        self.solve_with_stats(matrix).map(|(tour, _)| tour)
    }

    /// Like [`solve`](Self::solve), also returning search counters.
    pub fn solve_with_stats(&self, matrix: &CostMatrix) -> Result<(TourResult, SolverStats)> {
        let never = AtomicBool::new(false);
        self.solve_until(matrix, &never)
    }

    /// Solve, checking `cancel` before each node is taken off the frontier.
    ///
    /// Once the flag is set the search is abandoned and `Cancelled` returned;
    /// no partial tour is reported.
    pub fn solve_until(
        &self,
        matrix: &CostMatrix,
        cancel: &AtomicBool,
    ) -> Result<(TourResult, SolverStats)> {
        let n = matrix.size();
        let mut stats = SolverStats::default();

        if n <= 1 {
            return Ok((TourResult::trivial(n), stats));
        }

        let mut root = matrix.to_working_copy();
        let root_bound = reduce(&mut root);

        let mut frontier = Frontier::new();
        frontier.push(SearchNode {
            lower_bound: root_bound,
            city: 0,
            path: vec![0],
            reduced: root,
            accumulated: 0.0,
        });
        stats.pushed += 1;

        let mut best_cost = f64::INFINITY;
        let mut best_path: Option<Vec<usize>> = None;

        while let Some(node) = frontier.pop() {
            if cancel.load(Ordering::Relaxed) {
                log::debug!("search cancelled after {} expansions", stats.expanded);
                return Err(GeoRouteError::Cancelled);
            }

            if node.lower_bound >= best_cost {
                stats.pruned += 1;
                continue;
            }

            if node.path.len() == n {
                let total = node.accumulated + matrix.cost(node.city, 0);
                if total < best_cost {
                    log::debug!("new incumbent {:.3} via {:?}", total, node.path);
                    best_cost = total;
                    best_path = Some(node.path);
                    stats.incumbents += 1;
                }
                continue;
            }

            stats.expanded += 1;
            let mut visited = vec![false; n];
            for &city in &node.path {
                visited[city] = true;
            }

            for next in (0..n).filter(|&c| !visited[c]) {
                let mut child = node.reduced.clone();
                child.row_mut(node.city).mapv_inplace(|_| f64::INFINITY);
                child.column_mut(next).mapv_inplace(|_| f64::INFINITY);
                child[[next, node.city]] = f64::INFINITY;

                // edge cost comes from the original matrix, not the reduced one
                let accumulated = node.accumulated + matrix.cost(node.city, next);
                let lower_bound = accumulated + reduce(&mut child);

                if lower_bound < best_cost {
                    let mut path = node.path.clone();
                    path.push(next);
                    frontier.push(SearchNode {
                        lower_bound,
                        city: next,
                        path,
                        reduced: child,
                        accumulated,
                    });
                    stats.pushed += 1;
                } else {
                    stats.pruned += 1;
                }
            }

            stats.peak_frontier = stats.peak_frontier.max(frontier.len());
        }

        match best_path {
            Some(order) => {
                log::debug!(
                    "solved {} stops: cost {:.3}, {} expanded, {} pruned",
                    n,
                    best_cost,
                    stats.expanded,
                    stats.pruned
                );
                Ok((
                    TourResult {
                        order,
                        total_cost: best_cost,
                    },
                    stats,
                ))
            }
            None => Err(GeoRouteError::UnsolvableInstance {
                reason: format!("no finite closed tour through all {} stops", n),
            }),
        }
    }
}
