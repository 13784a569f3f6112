//! Run configuration and candidate loading
//!
//! Everything a run needs is carried in [`BenchConfig`] and passed explicitly
//! into the executor, orchestrator and promoter.

use std::path::Path;
use std::time::Duration;

use shared::InstanceConfig;
use uuid::Uuid;

use crate::error::{BenchError, BenchResult};

/// Upper bound on each collaborator call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseTimeouts {
    pub provision: Duration,
    pub deploy: Duration,
    /// Applies to each resolve attempt separately
    pub resolve: Duration,
    /// Applies to each sample separately
    pub sample: Duration,
    pub deprovision: Duration,
}

impl Default for PhaseTimeouts {
    fn default() -> Self {
        Self {
            provision: Duration::from_secs(20 * 60),
            deploy: Duration::from_secs(5 * 60),
            resolve: Duration::from_secs(60),
            sample: Duration::from_secs(2 * 60),
            deprovision: Duration::from_secs(20 * 60),
        }
    }
}

/// Resource names derived from worker index and run id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Naming {
    pub cluster_prefix: String,
    pub deployment_prefix: String,
    pub production_cluster: String,
    pub production_deployment: String,
    /// Short id unique to this run
    pub run_id: String,
}

impl Naming {
    pub fn cluster_name(&self, worker: usize) -> String {
        format!("{}-w{}-{}", self.cluster_prefix, worker, self.run_id)
    }

    pub fn deployment_name(&self, worker: usize) -> String {
        format!("{}-w{}-{}", self.deployment_prefix, worker, self.run_id)
    }
}

impl Default for Naming {
    fn default() -> Self {
        Self {
            cluster_prefix: "bench".to_string(),
            deployment_prefix: "bench-pod".to_string(),
            production_cluster: "bench-deploy-prod".to_string(),
            production_deployment: "bench-deploy".to_string(),
            run_id: new_run_id(),
        }
    }
}

/// First 8 hex digits of a v4 UUID
pub fn new_run_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Configuration for one benchmark-and-promote run
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Image benchmarked on every candidate and promoted at the end
    pub image: String,
    /// Metric samples averaged per configuration
    pub samples: u32,
    pub sample_interval: Duration,
    pub warm_up: Duration,
    /// Extra resolve attempts after the first one
    pub resolve_retries: u32,
    pub resolve_backoff: Duration,
    pub timeouts: PhaseTimeouts,
    /// Overall limit for the benchmark phase
    pub deadline: Option<Duration>,
    pub naming: Naming,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            image: String::new(),
            samples: 3,
            sample_interval: Duration::from_secs(10),
            warm_up: Duration::from_secs(3 * 60),
            resolve_retries: 5,
            resolve_backoff: Duration::from_secs(2),
            timeouts: PhaseTimeouts::default(),
            deadline: None,
            naming: Naming::default(),
        }
    }
}

impl BenchConfig {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            ..Self::default()
        }
    }

    /// Configure number of samples (fluent API)
    pub fn with_samples(mut self, samples: u32) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_sample_interval(mut self, interval: Duration) -> Self {
        self.sample_interval = interval;
        self
    }

    pub fn with_warm_up(mut self, warm_up: Duration) -> Self {
        self.warm_up = warm_up;
        self
    }

    /// Configure resolve retry budget and base backoff (fluent API)
    pub fn with_resolve_retries(mut self, retries: u32, backoff: Duration) -> Self {
        self.resolve_retries = retries;
        self.resolve_backoff = backoff;
        self
    }

    pub fn with_timeouts(mut self, timeouts: PhaseTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_naming(mut self, naming: Naming) -> Self {
        self.naming = naming;
        self
    }

    pub fn validate(&self) -> BenchResult<()> {
        if self.image.trim().is_empty() {
            return Err(BenchError::config("image reference must not be empty"));
        }
        if self.samples == 0 {
            return Err(BenchError::config("at least one metric sample per configuration is required"));
        }
        if self.naming.cluster_prefix.is_empty() || self.naming.deployment_prefix.is_empty() {
            return Err(BenchError::config("cluster and deployment prefixes must not be empty"));
        }
        if self.naming.production_cluster.is_empty() || self.naming.production_deployment.is_empty() {
            return Err(BenchError::config("production cluster and deployment names must not be empty"));
        }
        Ok(())
    }
}

/// Built-in candidate grid: three core counts at two memory sizes
pub fn default_candidates() -> Vec<InstanceConfig> {
    const GRID: [(u32, u32, f64); 6] = [
        (2, 8192, 0.066),
        (4, 8192, 0.109),
        (8, 8192, 0.196),
        (2, 12288, 0.066),
        (4, 12288, 0.109),
        (8, 12288, 0.196),
    ];

    GRID.iter()
        .filter_map(|&(cores, memory_mb, cost)| InstanceConfig::new(cores, memory_mb, cost).ok())
        .collect()
}

/// Load a JSON array of candidate configurations
///
/// Each entry is validated while deserializing; an empty list is rejected.
pub async fn load_candidates(path: &Path) -> BenchResult<Vec<InstanceConfig>> {
    let contents = tokio::fs::read_to_string(path).await?;
    let candidates: Vec<InstanceConfig> = serde_json::from_str(&contents)?;

    if candidates.is_empty() {
        return Err(BenchError::config(format!(
            "candidate file {} contains no configurations",
            path.display()
        )));
    }

    Ok(candidates)
}
