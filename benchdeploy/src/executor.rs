//! Single-configuration lifecycle
//!
//! provision → deploy → resolve runtime name → warm up → sample → score,
//! followed by a deprovision that runs whenever provisioning was attempted.
//! Every collaborator call is bounded by its phase timeout and every wait
//! observes the shutdown signal.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, timeout};

use shared::{actor_debug, actor_info, actor_warn, ActorId, BenchmarkResult, InstanceConfig, ResourceSample};

use crate::config::BenchConfig;
use crate::core::retry::backoff_delay;
use crate::core::score;
use crate::error::{ExecutionError, Phase, ServiceError, ServiceResult};
use crate::shutdown::ShutdownSignal;
use crate::traits::{Benchmark, ClusterProvisioner, MetricsProvider, WorkloadDeployer};

/// What one lifecycle run produced
///
/// `cleanup` reports a failed teardown separately so it never replaces the
/// score or the earlier failure held in `result`.
#[derive(Debug)]
pub struct Lifecycle {
    pub result: Result<BenchmarkResult, ExecutionError>,
    pub cleanup: Option<ExecutionError>,
}

impl Lifecycle {
    pub fn scored(result: BenchmarkResult) -> Self {
        Self {
            result: Ok(result),
            cleanup: None,
        }
    }

    pub fn failed(error: ExecutionError) -> Self {
        Self {
            result: Err(error),
            cleanup: None,
        }
    }
}

/// Run a collaborator call under a phase timeout, racing the shutdown signal
///
/// The outer error is cancellation; the inner result is the call's own
/// outcome, with an elapsed timeout reported as [`ServiceError::TimedOut`].
pub(crate) async fn guarded<T, F>(
    shutdown: &ShutdownSignal,
    phase: Phase,
    limit: Duration,
    call: F,
) -> Result<ServiceResult<T>, ExecutionError>
where
    F: Future<Output = ServiceResult<T>>,
{
    tokio::select! {
        biased;
        _ = shutdown.triggered() => Err(ExecutionError::Cancelled { phase }),
        outcome = timeout(limit, call) => Ok(outcome.unwrap_or(Err(ServiceError::TimedOut { after: limit }))),
    }
}

/// Sleep that ends early with `Cancelled` when shutdown fires
async fn pause(shutdown: &ShutdownSignal, phase: Phase, duration: Duration) -> Result<(), ExecutionError> {
    tokio::select! {
        biased;
        _ = shutdown.triggered() => Err(ExecutionError::Cancelled { phase }),
        _ = sleep(duration) => Ok(()),
    }
}

/// Drives one configuration through its full lifecycle against injected services
pub struct LifecycleExecutor<P, D, M>
where
    P: ClusterProvisioner + ?Sized,
    D: WorkloadDeployer + ?Sized,
    M: MetricsProvider + ?Sized,
{
    provisioner: Arc<P>,
    deployer: Arc<D>,
    metrics: Arc<M>,
    config: BenchConfig,
}

impl<P, D, M> LifecycleExecutor<P, D, M>
where
    P: ClusterProvisioner + ?Sized,
    D: WorkloadDeployer + ?Sized,
    M: MetricsProvider + ?Sized,
{
    pub fn new(provisioner: Arc<P>, deployer: Arc<D>, metrics: Arc<M>, config: BenchConfig) -> Self {
        Self {
            provisioner,
            deployer,
            metrics,
            config,
        }
    }

    /// Benchmark `config` on a cluster owned by `worker`
    ///
    /// Nothing is created when shutdown has already fired. Otherwise the
    /// cluster is deprovisioned whatever the outcome, including a failed or
    /// timed-out provision that may have left resources behind.
    pub async fn run(&self, worker: usize, config: &InstanceConfig, shutdown: &ShutdownSignal) -> Lifecycle {
        let actor = ActorId::Worker(worker);
        if shutdown.is_triggered() {
            return Lifecycle::failed(ExecutionError::Cancelled { phase: Phase::Provision });
        }

        let cluster = self.config.naming.cluster_name(worker);
        let deployment = self.config.naming.deployment_name(worker);

        let result = self.benchmark(&actor, &cluster, &deployment, config, shutdown).await;
        let cleanup = self.deprovision(&actor, &cluster).await.err();

        if let Some(error) = &cleanup {
            actor_warn!(actor, "⚠️ Cluster {} may still exist: {}", cluster, error);
        }

        Lifecycle { result, cleanup }
    }

    async fn benchmark(
        &self,
        actor: &ActorId,
        cluster: &str,
        deployment: &str,
        config: &InstanceConfig,
        shutdown: &ShutdownSignal,
    ) -> Result<BenchmarkResult, ExecutionError> {
        let timeouts = &self.config.timeouts;
        let machine_spec = config.machine_spec();

        actor_info!(actor, "☁️ Provisioning cluster {} ({})", cluster, machine_spec);
        guarded(
            shutdown,
            Phase::Provision,
            timeouts.provision,
            self.provisioner.create(cluster, &machine_spec),
        )
        .await?
        .map_err(|source| ExecutionError::ProvisionFailed {
            cluster: cluster.to_string(),
            source,
        })?;

        actor_info!(actor, "📦 Deploying {} as {}", self.config.image, deployment);
        guarded(
            shutdown,
            Phase::Deploy,
            timeouts.deploy,
            self.deployer.deploy(cluster, deployment, &self.config.image),
        )
        .await?
        .map_err(|source| ExecutionError::DeployFailed {
            deployment: deployment.to_string(),
            source,
        })?;

        let runtime_name = self.resolve(actor, cluster, deployment, shutdown).await?;
        actor_debug!(actor, "Deployment {} is running as {}", deployment, runtime_name);

        actor_info!(actor, "⏳ Warming up for {:?}", self.config.warm_up);
        pause(shutdown, Phase::WarmUp, self.config.warm_up).await?;

        let average = self.collect_samples(actor, cluster, &runtime_name, shutdown).await?;
        let result = BenchmarkResult::new(score(&average, config), *config);

        actor_info!(
            actor,
            "📊 {} scored {:.2} (cpu {:.1}, memory {:.1})",
            config,
            result.score,
            average.cpu,
            average.memory
        );
        Ok(result)
    }

    /// Look up the platform-assigned instance name, retrying with exponential backoff
    async fn resolve(
        &self,
        actor: &ActorId,
        cluster: &str,
        deployment: &str,
        shutdown: &ShutdownSignal,
    ) -> Result<String, ExecutionError> {
        let max_attempts = self.config.resolve_retries.saturating_add(1);
        let mut attempt = 0u32;

        loop {
            let outcome = guarded(
                shutdown,
                Phase::Resolve,
                self.config.timeouts.resolve,
                self.deployer.resolve_runtime_name(cluster, deployment),
            )
            .await?;
            attempt += 1;

            match outcome {
                Ok(name) => return Ok(name),
                Err(source) if attempt >= max_attempts => {
                    return Err(ExecutionError::InstanceNotFound {
                        deployment: deployment.to_string(),
                        attempts: attempt,
                        source,
                    });
                }
                Err(source) => {
                    let delay = backoff_delay(self.config.resolve_backoff, attempt - 1);
                    actor_debug!(
                        actor,
                        "Runtime name for {} unavailable ({}), attempt {}/{}, retrying in {:?}",
                        deployment,
                        source,
                        attempt,
                        max_attempts,
                        delay
                    );
                    pause(shutdown, Phase::Resolve, delay).await?;
                }
            }
        }
    }

    /// Take the configured number of samples and average them
    async fn collect_samples(
        &self,
        actor: &ActorId,
        cluster: &str,
        runtime_name: &str,
        shutdown: &ShutdownSignal,
    ) -> Result<ResourceSample, ExecutionError> {
        let sample_failed = |source| ExecutionError::SampleFailed {
            runtime_name: runtime_name.to_string(),
            source,
        };

        let mut samples = Vec::with_capacity(self.config.samples as usize);
        for index in 0..self.config.samples {
            if index > 0 {
                pause(shutdown, Phase::Sample, self.config.sample_interval).await?;
            }

            let sample = guarded(
                shutdown,
                Phase::Sample,
                self.config.timeouts.sample,
                self.metrics.sample(cluster, runtime_name),
            )
            .await?
            .map_err(sample_failed)?;

            actor_debug!(
                actor,
                "Sample {}/{} of {}: cpu {}, memory {}",
                index + 1,
                self.config.samples,
                runtime_name,
                sample.cpu,
                sample.memory
            );
            samples.push(sample);
        }

        ResourceSample::average(&samples)
            .ok_or_else(|| sample_failed(ServiceError::parse("metrics", "no samples were collected")))
    }

    /// Tear the cluster down; not cancellable, but bounded by its timeout
    async fn deprovision(&self, actor: &ActorId, cluster: &str) -> Result<(), ExecutionError> {
        let limit = self.config.timeouts.deprovision;
        actor_info!(actor, "🧹 Deprovisioning cluster {}", cluster);

        let outcome = timeout(limit, self.provisioner.delete(cluster))
            .await
            .unwrap_or(Err(ServiceError::TimedOut { after: limit }));

        outcome.map_err(|source| ExecutionError::DeprovisionFailed {
            cluster: cluster.to_string(),
            source,
        })
    }
}

#[async_trait::async_trait]
impl<P, D, M> Benchmark for LifecycleExecutor<P, D, M>
where
    P: ClusterProvisioner + ?Sized,
    D: WorkloadDeployer + ?Sized,
    M: MetricsProvider + ?Sized,
{
    async fn run_lifecycle(&self, worker: usize, config: &InstanceConfig, shutdown: &ShutdownSignal) -> Lifecycle {
        self.run(worker, config, shutdown).await
    }
}
