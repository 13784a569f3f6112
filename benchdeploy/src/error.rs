//! Error taxonomy for benchmark runs
//!
//! Three layers, from the outside in:
//! - [`BenchError`]: orchestration-level and fatal, terminates the run
//! - [`ExecutionError`]: one configuration failed, the worker moves on
//! - [`ServiceError`]: what an external collaborator reported

use serde::{Deserialize, Serialize};
use shared::SharedError;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Lifecycle phase of a single configuration benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Provision,
    Deploy,
    Resolve,
    WarmUp,
    Sample,
    Deprovision,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Provision => "provision",
            Phase::Deploy => "deploy",
            Phase::Resolve => "resolve",
            Phase::WarmUp => "warm-up",
            Phase::Sample => "sample",
            Phase::Deprovision => "deprovision",
        };
        f.write_str(name)
    }
}

/// Per-configuration failure classification used in logs and reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    ProvisionFailed,
    DeployFailed,
    InstanceNotFound,
    SampleFailed,
    DeprovisionFailed,
    Cancelled,
}

/// Failure reported by an external collaborator
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with {status}: {stderr}")]
    NonZeroExit {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("timed out after {after:?}")]
    TimedOut { after: Duration },

    #[error("could not parse {what}: {message}")]
    Parse { what: &'static str, message: String },

    #[error("no running instance matches `{name}`")]
    NotFound { name: String },

    #[error("no kubectl context found for cluster `{cluster}`")]
    ContextNotFound { cluster: String },
}

impl ServiceError {
    pub fn parse(what: &'static str, message: impl Into<String>) -> Self {
        ServiceError::Parse {
            what,
            message: message.into(),
        }
    }
}

/// A single configuration could not be benchmarked
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("provisioning cluster `{cluster}` failed: {source}")]
    ProvisionFailed {
        cluster: String,
        #[source]
        source: ServiceError,
    },

    #[error("deploying `{deployment}` failed: {source}")]
    DeployFailed {
        deployment: String,
        #[source]
        source: ServiceError,
    },

    #[error("no runtime instance found for `{deployment}` after {attempts} attempt(s): {source}")]
    InstanceNotFound {
        deployment: String,
        attempts: u32,
        #[source]
        source: ServiceError,
    },

    #[error("sampling `{runtime_name}` failed: {source}")]
    SampleFailed {
        runtime_name: String,
        #[source]
        source: ServiceError,
    },

    #[error("deprovisioning cluster `{cluster}` failed: {source}")]
    DeprovisionFailed {
        cluster: String,
        #[source]
        source: ServiceError,
    },

    #[error("cancelled during {phase}")]
    Cancelled { phase: Phase },
}

impl ExecutionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ExecutionError::ProvisionFailed { .. } => FailureKind::ProvisionFailed,
            ExecutionError::DeployFailed { .. } => FailureKind::DeployFailed,
            ExecutionError::InstanceNotFound { .. } => FailureKind::InstanceNotFound,
            ExecutionError::SampleFailed { .. } => FailureKind::SampleFailed,
            ExecutionError::DeprovisionFailed { .. } => FailureKind::DeprovisionFailed,
            ExecutionError::Cancelled { .. } => FailureKind::Cancelled,
        }
    }

    /// True when the underlying collaborator call hit its phase timeout
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            ExecutionError::ProvisionFailed { source: ServiceError::TimedOut { .. }, .. }
                | ExecutionError::DeployFailed { source: ServiceError::TimedOut { .. }, .. }
                | ExecutionError::InstanceNotFound { source: ServiceError::TimedOut { .. }, .. }
                | ExecutionError::SampleFailed { source: ServiceError::TimedOut { .. }, .. }
                | ExecutionError::DeprovisionFailed { source: ServiceError::TimedOut { .. }, .. }
        )
    }
}

/// Returned when enqueueing onto a closed candidate queue
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("candidate queue is closed")]
pub struct QueueClosed;

/// Orchestration-level errors; these terminate the run
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("No viable result: all {attempted} configuration(s) failed to benchmark")]
    NoViableResult { attempted: usize },

    #[error("Promotion failed: {0}")]
    PromotionFailed(#[source] ExecutionError),

    #[error("Configuration error: {field}")]
    Configuration { field: String },

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl BenchError {
    pub fn config(field: impl Into<String>) -> Self {
        BenchError::Configuration { field: field.into() }
    }
}

pub type BenchResult<T> = Result<T, BenchError>;
pub type ServiceResult<T> = Result<T, ServiceError>;
