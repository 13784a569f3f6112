//! Promotion of the winning configuration to production

use std::sync::Arc;

use serde::Serialize;

use shared::{actor_error, actor_info, logging, ActorId, InstanceConfig};

use crate::config::BenchConfig;
use crate::core::GlobalBest;
use crate::error::{BenchError, BenchResult, ExecutionError, Phase};
use crate::executor::guarded;
use crate::shutdown::ShutdownSignal;
use crate::traits::{ClusterProvisioner, WorkloadDeployer};

/// What runs in production after a successful promotion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Promotion {
    pub cluster: String,
    pub deployment: String,
    pub config: InstanceConfig,
}

/// Provisions the production cluster for the global best and deploys onto it
pub struct Promoter<P, D>
where
    P: ClusterProvisioner + ?Sized,
    D: WorkloadDeployer + ?Sized,
{
    provisioner: Arc<P>,
    deployer: Arc<D>,
    config: BenchConfig,
}

impl<P, D> Promoter<P, D>
where
    P: ClusterProvisioner + ?Sized,
    D: WorkloadDeployer + ?Sized,
{
    pub fn new(provisioner: Arc<P>, deployer: Arc<D>, config: BenchConfig) -> Self {
        Self {
            provisioner,
            deployer,
            config,
        }
    }

    /// Provision a production cluster sized to `best` and deploy `image` onto it
    ///
    /// A cluster whose deploy failed is left running; the error names it.
    pub async fn promote(&self, best: &GlobalBest, image: &str, shutdown: &ShutdownSignal) -> BenchResult<Promotion> {
        let actor = ActorId::Promoter;
        let naming = &self.config.naming;
        let cluster = naming.production_cluster.as_str();
        let deployment = naming.production_deployment.as_str();
        let machine_spec = best.config().machine_spec();

        logging::log_startup(
            &actor,
            &format!("promotion of {} (score {:.2})", best.config(), best.score()),
        );

        if shutdown.is_triggered() {
            return Err(promotion_failed(&actor, ExecutionError::Cancelled { phase: Phase::Provision }));
        }

        actor_info!(actor, "☁️ Provisioning production cluster {} ({})", cluster, machine_spec);
        guarded(
            shutdown,
            Phase::Provision,
            self.config.timeouts.provision,
            self.provisioner.create(cluster, &machine_spec),
        )
        .await
        .and_then(|outcome| {
            outcome.map_err(|source| ExecutionError::ProvisionFailed {
                cluster: cluster.to_string(),
                source,
            })
        })
        .map_err(|e| promotion_failed(&actor, e))?;

        actor_info!(actor, "📦 Deploying {} as {} on {}", image, deployment, cluster);
        guarded(
            shutdown,
            Phase::Deploy,
            self.config.timeouts.deploy,
            self.deployer.deploy(cluster, deployment, image),
        )
        .await
        .and_then(|outcome| {
            outcome.map_err(|source| ExecutionError::DeployFailed {
                deployment: deployment.to_string(),
                source,
            })
        })
        .map_err(|e| {
            actor_error!(actor, "Production cluster {} was left in place", cluster);
            promotion_failed(&actor, e)
        })?;

        logging::log_success(&actor, &format!("{} is running on {}", deployment, cluster));
        Ok(Promotion {
            cluster: cluster.to_string(),
            deployment: deployment.to_string(),
            config: *best.config(),
        })
    }
}

fn promotion_failed(actor: &ActorId, error: ExecutionError) -> BenchError {
    logging::log_error(actor, "Promotion", &error);
    BenchError::PromotionFailed(error)
}
