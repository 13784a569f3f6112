//! Machine-readable summary of a benchmark run

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared::BenchmarkResult;

use crate::core::{AttemptRecord, WorkerOutcome};
use crate::error::BenchResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub workers: usize,
    /// Every configuration attempted, grouped by worker
    pub attempts: Vec<AttemptRecord>,
    pub best: Option<BenchmarkResult>,
}

impl RunReport {
    pub fn new(
        run_id: impl Into<String>,
        started_at: DateTime<Utc>,
        workers: usize,
        outcomes: &[WorkerOutcome],
        best: Option<BenchmarkResult>,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            started_at,
            finished_at: Utc::now(),
            workers,
            attempts: outcomes.iter().flat_map(|o| o.attempts.iter().cloned()).collect(),
            best,
        }
    }

    pub fn succeeded(&self) -> usize {
        self.attempts.iter().filter(|a| a.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.attempts.len() - self.succeeded()
    }

    /// Attempts whose cluster teardown did not complete
    pub fn leaked_clusters(&self) -> usize {
        self.attempts.iter().filter(|a| a.cleanup_error.is_some()).count()
    }

    /// Write the report as pretty-printed JSON
    pub async fn write_json(&self, path: &Path) -> BenchResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}
