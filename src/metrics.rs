//! Planning metrics: latency, search effort, ranker fallbacks.

use std::time::Duration;

use crate::solver::SolverStats;

/// Collects runtime metrics for one planning pipeline.
#[derive(Debug, Clone)]
pub struct MetricsCollector {
    plan_latencies_us: Vec<f64>,
    total_plans: u64,
    failed_plans: u64,
    nodes_expanded: u64,
    nodes_pruned: u64,
    ranker_fallbacks: u64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            plan_latencies_us: Vec::new(),
            total_plans: 0,
            failed_plans: 0,
            nodes_expanded: 0,
            nodes_pruned: 0,
            ranker_fallbacks: 0,
        }
    }

    /// Record a successful plan with its duration and solver counters.
    pub fn record_plan(&mut self, duration: Duration, stats: &SolverStats) {
        self.total_plans += 1;
        self.plan_latencies_us.push(duration.as_micros() as f64);
        self.nodes_expanded += stats.expanded;
        self.nodes_pruned += stats.pruned;
    }

    pub fn record_failure(&mut self) {
        self.failed_plans += 1;
    }

    pub fn record_ranker_fallback(&mut self) {
        self.ranker_fallbacks += 1;
    }

    pub fn total_plans(&self) -> u64 {
        self.total_plans
    }

    pub fn failed_plans(&self) -> u64 {
        self.failed_plans
    }

    pub fn nodes_expanded(&self) -> u64 {
        self.nodes_expanded
    }

    pub fn nodes_pruned(&self) -> u64 {
        self.nodes_pruned
    }

    pub fn ranker_fallbacks(&self) -> u64 {
        self.ranker_fallbacks
    }

    /// Average plan latency in microseconds.
    pub fn avg_plan_latency_us(&self) -> f64 {
        if self.plan_latencies_us.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.plan_latencies_us.iter().sum();
        sum / self.plan_latencies_us.len() as f64
    }

    /// Get a percentile of plan latency (e.g., 50.0, 95.0, 99.0).
    pub fn percentile_plan_latency_us(&self, percentile: f64) -> f64 {
        if self.plan_latencies_us.is_empty() {
            return 0.0;
        }

        let mut sorted = self.plan_latencies_us.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let index = ((percentile / 100.0) * (sorted.len() - 1) as f64).round() as usize;
        sorted[index.min(sorted.len() - 1)]
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
