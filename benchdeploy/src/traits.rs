//! Trait definitions with mockall annotations for testing
//!
//! The benchmark core talks to the cloud control plane, the container
//! orchestrator and the metrics source only through these traits. Real
//! implementations live in [`crate::services`]; tests inject mocks or fakes.

use shared::{InstanceConfig, ResourceSample};

use crate::error::ServiceResult;
use crate::executor::Lifecycle;
use crate::shutdown::ShutdownSignal;

/// Cluster lifecycle on the cloud control plane
#[mockall::automock]
#[async_trait::async_trait]
pub trait ClusterProvisioner: Send + Sync {
    /// Create a single-node cluster and block until the control plane reports completion
    ///
    /// # Parameters
    /// - `name`: Cluster name, unique per worker and run
    /// - `machine_spec`: Machine type string, e.g. `custom-4-8192`
    async fn create(&self, name: &str, machine_spec: &str) -> ServiceResult<()>;

    /// Tear down a cluster created by [`ClusterProvisioner::create`]
    async fn delete(&self, name: &str) -> ServiceResult<()>;
}

/// Workload deployment onto a provisioned cluster
#[mockall::automock]
#[async_trait::async_trait]
pub trait WorkloadDeployer: Send + Sync {
    /// Deploy `image` as `deployment_name` on `cluster`
    async fn deploy(&self, cluster: &str, deployment_name: &str, image: &str) -> ServiceResult<()>;

    /// Discover the runtime name the platform assigned to a deployment
    ///
    /// # Returns
    /// The first running instance whose name contains `logical_name`, or
    /// `ServiceError::NotFound` when none is visible yet
    async fn resolve_runtime_name(&self, cluster: &str, logical_name: &str) -> ServiceResult<String>;
}

/// Resource utilisation source
#[mockall::automock]
#[async_trait::async_trait]
pub trait MetricsProvider: Send + Sync {
    /// Current CPU and memory usage of a running instance
    async fn sample(&self, cluster: &str, runtime_name: &str) -> ServiceResult<ResourceSample>;
}

/// One full lifecycle run for a configuration, as seen by a worker
#[mockall::automock]
#[async_trait::async_trait]
pub trait Benchmark: Send + Sync {
    async fn run_lifecycle(&self, worker: usize, config: &InstanceConfig, shutdown: &ShutdownSignal) -> Lifecycle;
}
