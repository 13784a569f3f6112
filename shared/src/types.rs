//! Core value types used throughout the benchmark run

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{SharedError, SharedResult};

/// A candidate compute shape to benchmark
///
/// Fields are private so every instance has passed validation: cores and
/// memory are non-zero and the hourly cost is a finite positive number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawInstanceConfig")]
pub struct InstanceConfig {
    cores: u32,
    memory_mb: u32,
    hourly_cost: f64,
}

/// Unvalidated wire form of an instance configuration
#[derive(Deserialize)]
struct RawInstanceConfig {
    cores: u32,
    memory_mb: u32,
    hourly_cost: f64,
}

impl InstanceConfig {
    pub fn new(cores: u32, memory_mb: u32, hourly_cost: f64) -> SharedResult<Self> {
        if cores == 0 {
            return Err(SharedError::invalid("cores", cores));
        }
        if memory_mb == 0 {
            return Err(SharedError::invalid("memory_mb", memory_mb));
        }
        if !hourly_cost.is_finite() || hourly_cost <= 0.0 {
            return Err(SharedError::invalid("hourly_cost", hourly_cost));
        }

        Ok(Self {
            cores,
            memory_mb,
            hourly_cost,
        })
    }

    pub fn cores(&self) -> u32 {
        self.cores
    }

    pub fn memory_mb(&self) -> u32 {
        self.memory_mb
    }

    pub fn hourly_cost(&self) -> f64 {
        self.hourly_cost
    }

    /// Custom machine type understood by the cloud control plane
    pub fn machine_spec(&self) -> String {
        format!("custom-{}-{}", self.cores, self.memory_mb)
    }
}

impl TryFrom<RawInstanceConfig> for InstanceConfig {
    type Error = SharedError;

    fn try_from(raw: RawInstanceConfig) -> Result<Self, Self::Error> {
        InstanceConfig::new(raw.cores, raw.memory_mb, raw.hourly_cost)
    }
}

impl fmt::Display for InstanceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cores / {} MB @ ${}/h",
            self.cores, self.memory_mb, self.hourly_cost
        )
    }
}

/// Score obtained by one successfully benchmarked configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub score: f64,
    pub config: InstanceConfig,
}

impl BenchmarkResult {
    pub fn new(score: f64, config: InstanceConfig) -> Self {
        Self { score, config }
    }
}

/// Resource utilisation observed for one running workload instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceSample {
    /// CPU usage in millicores
    pub cpu: f64,
    /// Memory usage, unit suffix stripped
    pub memory: f64,
}

impl ResourceSample {
    pub fn new(cpu: f64, memory: f64) -> Self {
        Self { cpu, memory }
    }

    /// Mean of several samples, `None` when there is nothing to average
    pub fn average(samples: &[ResourceSample]) -> Option<ResourceSample> {
        if samples.is_empty() {
            return None;
        }

        let count = samples.len() as f64;
        let (cpu, memory) = samples
            .iter()
            .fold((0.0, 0.0), |(cpu, memory), s| (cpu + s.cpu, memory + s.memory));

        Some(ResourceSample {
            cpu: cpu / count,
            memory: memory / count,
        })
    }
}

/// Logging identity of a component inside a benchmark run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorId {
    /// Fills the queue, joins the workers and reduces their outcomes
    Coordinator,
    /// Benchmark worker identified by its index in the pool
    Worker(usize),
    /// Final production provisioning
    Promoter,
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorId::Coordinator => write!(f, "coordinator"),
            ActorId::Worker(id) => write!(f, "worker_{id}"),
            ActorId::Promoter => write!(f, "promoter"),
        }
    }
}
