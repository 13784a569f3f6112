//! Benchmark-and-promote library for picking the most cost-efficient cluster shape
//!
//! A pool of workers drains a queue of candidate machine shapes, benchmarking
//! each on a throwaway cluster. The highest utilisation-per-cost score across
//! all workers is then promoted to a production cluster.

pub mod config;
pub mod core;
pub mod error;
pub mod executor;
pub mod orchestrator;
pub mod promoter;
pub mod report;
pub mod services;
pub mod shutdown;
pub mod traits;
pub mod worker;

// Re-export commonly used types
pub use config::{default_candidates, load_candidates, BenchConfig, Naming, PhaseTimeouts};
pub use core::{AttemptOutcome, AttemptRecord, CandidateQueue, GlobalBest, WorkerOutcome};
pub use error::{BenchError, BenchResult, ExecutionError, FailureKind, Phase, ServiceError, ServiceResult};
pub use executor::{Lifecycle, LifecycleExecutor};
pub use orchestrator::Orchestrator;
pub use promoter::{Promoter, Promotion};
pub use report::RunReport;
pub use shutdown::{shutdown_channel, ShutdownSignal, ShutdownTrigger};
pub use traits::{Benchmark, ClusterProvisioner, MetricsProvider, WorkloadDeployer};
