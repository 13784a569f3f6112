//! What a worker reports back to the coordinator

use serde::{Deserialize, Serialize};
use shared::{BenchmarkResult, InstanceConfig};

use crate::error::{ExecutionError, FailureKind};

/// Result of one configuration attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Scored { score: f64 },
    Failed { kind: FailureKind, message: String },
}

/// One configuration a worker attempted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub worker: usize,
    pub config: InstanceConfig,
    pub outcome: AttemptOutcome,
    /// Teardown failure, reported without affecting `outcome`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleanup_error: Option<String>,
}

impl AttemptRecord {
    pub fn scored(worker: usize, result: &BenchmarkResult) -> Self {
        Self {
            worker,
            config: result.config,
            outcome: AttemptOutcome::Scored { score: result.score },
            cleanup_error: None,
        }
    }

    pub fn failed(worker: usize, config: InstanceConfig, error: &ExecutionError) -> Self {
        Self {
            worker,
            config,
            outcome: AttemptOutcome::Failed {
                kind: error.kind(),
                message: error.to_string(),
            },
            cleanup_error: None,
        }
    }

    pub fn with_cleanup_error(mut self, error: Option<&ExecutionError>) -> Self {
        self.cleanup_error = error.map(ToString::to_string);
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, AttemptOutcome::Scored { .. })
    }
}

/// The single message each worker emits when it finishes
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerOutcome {
    pub worker: usize,
    /// Best result this worker observed, `None` if every attempt failed
    pub best: Option<BenchmarkResult>,
    pub attempts: Vec<AttemptRecord>,
}

impl WorkerOutcome {
    pub fn none(worker: usize) -> Self {
        Self {
            worker,
            best: None,
            attempts: Vec::new(),
        }
    }
}
