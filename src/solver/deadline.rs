//! Wall-clock deadline around the blocking solver.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{GeoRouteError, Result};
use crate::matrix::CostMatrix;

use super::{RouteSolver, SolverStats, TourResult};

/// Run the solver on tokio's blocking pool and give up after `deadline`.
///
/// On expiry the cancellation flag is raised so the worker thread stops at
/// its next frontier pop; the partial search is discarded.
pub async fn solve_with_deadline(
    matrix: CostMatrix,
    deadline: Duration,
) -> Result<(TourResult, SolverStats)> {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    let task =
        tokio::task::spawn_blocking(move || RouteSolver::new().solve_until(&matrix, &flag));

    match tokio::time::timeout(deadline, task).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(join_err)) => Err(GeoRouteError::SolverTask(join_err.to_string())),
        Err(_) => {
            cancel.store(true, Ordering::Relaxed);
            log::warn!("route solve abandoned after {:?}", deadline);
            Err(GeoRouteError::DeadlineExceeded(deadline))
        }
    }
}
