//! Best-result tracking and the final reduction across workers

use serde::Serialize;
use shared::{BenchmarkResult, InstanceConfig};

use super::outcome::WorkerOutcome;

/// The highest-scoring result of a whole run
///
/// Only [`select_best`] builds one, and it exposes no mutators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GlobalBest {
    result: BenchmarkResult,
    worker: usize,
}

impl GlobalBest {
    pub fn result(&self) -> &BenchmarkResult {
        &self.result
    }

    pub fn score(&self) -> f64 {
        self.result.score
    }

    pub fn config(&self) -> &InstanceConfig {
        &self.result.config
    }

    /// Worker that produced the winning result
    pub fn worker(&self) -> usize {
        self.worker
    }
}

/// Keep the higher of the current best and a new result
///
/// Only a strictly greater score replaces the current best, so a worker's
/// best is non-decreasing and ties keep the earlier result.
pub fn keep_best(current: Option<BenchmarkResult>, candidate: BenchmarkResult) -> Option<BenchmarkResult> {
    match current {
        Some(best) if best.score >= candidate.score => Some(best),
        _ => Some(candidate),
    }
}

/// Reduce worker outcomes to the global best
///
/// Maximum score wins; ties go to the outcome seen first. `None` when no
/// worker produced a result.
pub fn select_best(outcomes: &[WorkerOutcome]) -> Option<GlobalBest> {
    outcomes
        .iter()
        .filter_map(|outcome| outcome.best.map(|result| GlobalBest { result, worker: outcome.worker }))
        .fold(None, |best: Option<GlobalBest>, candidate| match best {
            Some(current) if current.result.score >= candidate.result.score => Some(current),
            _ => Some(candidate),
        })
}
