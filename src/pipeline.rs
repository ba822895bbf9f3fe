//! Planning pipeline: nearby candidates in, ordered itinerary out.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Instant;

use serde::Serialize;

use crate::config::PlannerConfig;
use crate::distance::{haversine_km, sort_by_distance};
use crate::error::{GeoRouteError, Result};
use crate::index::SpatialIndex;
use crate::metrics::MetricsCollector;
use crate::point::Point;
use crate::provider::{DistanceProvider, NameRanker, TravelMode};
use crate::solver::{RouteSolver, SolverStats};

/// A solved itinerary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedTour {
    /// Names of the places to visit, in visiting order, origin excluded.
    pub stops: Vec<String>,
    /// Index of each stop in the candidate slice passed to `plan`.
    pub order: Vec<usize>,
    /// Cost of the closed tour from the origin and back, in provider units.
    pub total_cost: f64,
    pub stats: SolverStats,
}

/// Orchestrates candidate selection, cost lookup and solving.
///
/// The distance provider and optional ranker are handed in at construction;
/// the pipeline never reaches for a global client.
pub struct PlanningPipeline<D> {
    provider: D,
    config: PlannerConfig,
    mode: TravelMode,
    ranker: Option<Box<dyn NameRanker>>,
    solver: RouteSolver,
    metrics: Mutex<MetricsCollector>,
}

impl<D: DistanceProvider> PlanningPipeline<D> {
    /// Create a pipeline with the default config, walking mode and no ranker.
    pub fn new(provider: D) -> Self {
        Self::build(provider, PlannerConfig::default())
    }

    /// Create a pipeline with a custom config; fails if `config.validate()` does.
    pub fn with_config(provider: D, config: PlannerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(provider, config))
    }

    fn build(provider: D, config: PlannerConfig) -> Self {
        Self {
            provider,
            config,
            mode: TravelMode::default(),
            ranker: None,
            solver: RouteSolver::new(),
            metrics: Mutex::new(MetricsCollector::new()),
        }
    }

    pub fn with_mode(mut self, mode: TravelMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_ranker(mut self, ranker: impl NameRanker + 'static) -> Self {
        self.ranker = Some(Box::new(ranker));
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn mode(&self) -> TravelMode {
        self.mode
    }

    /// Snapshot of the metrics gathered so far.
    pub fn metrics(&self) -> MetricsCollector {
        match self.metrics.lock() {
            Ok(metrics) => metrics.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn record(&self, update: impl FnOnce(&mut MetricsCollector)) {
        let mut metrics = match self.metrics.lock() {
            Ok(metrics) => metrics,
            Err(poisoned) => poisoned.into_inner(),
        };
        update(&mut metrics);
    }

    /// Order `candidates` into the cheapest closed tour starting at `origin`.
    ///
    /// More than `max_candidates` places are cut down to the nearest ones
    /// before the solver runs. Provider failures are returned unchanged.
    pub fn plan(&self, origin: &Point, candidates: &[(Point, String)]) -> Result<PlannedTour> {
        let started = Instant::now();
        match self.plan_inner(origin, candidates) {
            Ok(tour) => {
                self.record(|m| m.record_plan(started.elapsed(), &tour.stats));
                Ok(tour)
            }
            Err(err) => {
                self.record(|m| m.record_failure());
                Err(err)
            }
        }
    }

    fn plan_inner(&self, origin: &Point, candidates: &[(Point, String)]) -> Result<PlannedTour> {
        if candidates.is_empty() {
            return Err(GeoRouteError::NoCandidates);
        }
        origin.validate()?;
        for (point, _) in candidates {
            point.validate()?;
        }

        let selected = self.select_nearest(origin, candidates);
        if selected.is_empty() {
            return Err(GeoRouteError::NoCandidates);
        }

        let mut points = Vec::with_capacity(selected.len() + 1);
        points.push(*origin);
        points.extend(selected.iter().map(|&i| candidates[i].0));

        let matrix = self.provider.cost_matrix(&points, self.mode)?;
        if matrix.size() != points.len() {
            return Err(GeoRouteError::DistanceProvider(format!(
                "expected a {0}x{0} matrix, got {1}x{1}",
                points.len(),
                matrix.size()
            )));
        }

        let (tour, stats) = self.solver.solve_with_stats(&matrix)?;

        // stop 0 is the origin; stop k is selected[k - 1]
        let order: Vec<usize> = tour
            .order
            .iter()
            .filter(|&&stop| stop != 0)
            .map(|&stop| selected[stop - 1])
            .collect();
        let stops: Vec<String> = order.iter().map(|&i| candidates[i].1.clone()).collect();

        log::info!(
            "planned {} stops ({}) with total cost {:.3}",
            stops.len(),
            self.mode,
            tour.total_cost
        );

        Ok(PlannedTour {
            stops,
            order,
            total_cost: tour.total_cost,
            stats,
        })
    }

    /// Indices of the candidates that go to the solver, in their original order.
    fn select_nearest(&self, origin: &Point, candidates: &[(Point, String)]) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..candidates.len()).collect();
        if candidates.len() <= self.config.max_candidates {
            return indices;
        }

        indices.sort_by(|&a, &b| {
            haversine_km(origin, &candidates[a].0)
                .partial_cmp(&haversine_km(origin, &candidates[b].0))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        indices.truncate(self.config.max_candidates);
        indices.sort_unstable();

        log::info!(
            "keeping the {} nearest of {} candidates",
            indices.len(),
            candidates.len()
        );
        indices
    }

    /// Narrow candidates with the ranker, if one is configured.
    ///
    /// A ranker error, an empty answer, or an answer that names none of the
    /// candidates leaves the list untouched.
    pub fn shortlist(&self, candidates: Vec<(Point, String)>) -> Vec<(Point, String)> {
        let Some(ranker) = &self.ranker else {
            return candidates;
        };
        if candidates.is_empty() {
            return candidates;
        }

        let names: Vec<String> = candidates.iter().map(|(_, name)| name.clone()).collect();
        let ranked = match ranker.rank(&names) {
            Ok(ranked) => ranked,
            Err(err) => {
                log::warn!(
                    "name ranker failed, keeping all {} candidates: {}",
                    candidates.len(),
                    err
                );
                self.record(|m| m.record_ranker_fallback());
                return candidates;
            }
        };

        let keep: HashSet<&str> = ranked
            .iter()
            .take(self.config.ranker_cap)
            .map(|name| name.trim())
            .collect();
        let narrowed: Vec<(Point, String)> = candidates
            .iter()
            .filter(|(_, name)| keep.contains(name.as_str()))
            .cloned()
            .collect();

        if narrowed.is_empty() {
            log::warn!(
                "name ranker matched no candidates, keeping all {}",
                candidates.len()
            );
            self.record(|m| m.record_ranker_fallback());
            return candidates;
        }

        log::debug!("ranker kept {} of {} candidates", narrowed.len(), candidates.len());
        narrowed
    }

    /// Full request: find places near `origin`, shortlist them, and plan.
    ///
    /// `radius_km` defaults to the configured radius for the travel mode.
    pub fn plan_near<I: SpatialIndex<String>>(
        &self,
        index: &I,
        origin: &Point,
        radius_km: Option<f64>,
    ) -> Result<PlannedTour> {
        origin.validate()?;
        let radius = radius_km.unwrap_or_else(|| self.config.radius_for(self.mode));

        let mut nearby = index.search_radius(origin, radius);
        sort_by_distance(origin, &mut nearby);
        log::info!("{} places within {:.2} km of origin", nearby.len(), radius);

        let shortlisted = self.shortlist(nearby);
        self.plan(origin, &shortlisted)
    }
}
