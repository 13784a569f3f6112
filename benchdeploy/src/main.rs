//! Main entry point for the bench-deploy binary
//!
//! Wires the `gcloud`/`kubectl` services into the executor, runs the
//! benchmark phase and promotes the winner.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;

use benchdeploy::services::{GcloudProvisioner, KubectlClient};
use benchdeploy::{
    default_candidates, load_candidates, shutdown_channel, BenchConfig, BenchResult, LifecycleExecutor, Naming,
    Orchestrator, Promoter,
};
use shared::{actor_info, logging, ActorId};

/// Benchmark candidate cluster shapes and promote the most cost-efficient one
#[derive(Parser, Debug)]
#[command(name = "bench-deploy", version)]
#[command(about = "Benchmarks a container image on candidate machine shapes and deploys it on the best one")]
pub struct Args {
    /// Container image to benchmark and promote
    #[arg(short, long, env = "BENCH_DEPLOY_IMAGE")]
    pub image: String,

    /// Metric samples averaged per configuration
    #[arg(short = 'r', long, env = "BENCH_DEPLOY_ITERATIONS", default_value = "3")]
    pub iterations: u32,

    /// Number of concurrent benchmark workers
    #[arg(short, long, env = "BENCH_DEPLOY_WORKERS", default_value = "3")]
    pub workers: usize,

    /// JSON file with candidate configurations (defaults to the built-in grid)
    #[arg(long, env = "BENCH_DEPLOY_CANDIDATES")]
    pub candidates: Option<PathBuf>,

    #[arg(long, env = "BENCH_DEPLOY_WARM_UP_SECS", default_value = "180")]
    pub warm_up_secs: u64,

    #[arg(long, env = "BENCH_DEPLOY_SAMPLE_INTERVAL_SECS", default_value = "10")]
    pub sample_interval_secs: u64,

    /// Extra attempts when looking up the deployed pod
    #[arg(long, env = "BENCH_DEPLOY_RESOLVE_RETRIES", default_value = "5")]
    pub resolve_retries: u32,

    #[arg(long, env = "BENCH_DEPLOY_RESOLVE_BACKOFF_MS", default_value = "2000")]
    pub resolve_backoff_ms: u64,

    /// Overall limit for the benchmark phase; partial results are kept
    #[arg(long, env = "BENCH_DEPLOY_DEADLINE_SECS")]
    pub deadline_secs: Option<u64>,

    #[arg(long, env = "BENCH_DEPLOY_ZONE")]
    pub zone: Option<String>,

    #[arg(long, env = "BENCH_DEPLOY_PROJECT")]
    pub project: Option<String>,

    #[arg(long, env = "BENCH_DEPLOY_CLUSTER_PREFIX", default_value = "bench")]
    pub cluster_prefix: String,

    #[arg(long, env = "BENCH_DEPLOY_DEPLOYMENT_PREFIX", default_value = "bench-pod")]
    pub deployment_prefix: String,

    #[arg(long, env = "BENCH_DEPLOY_PRODUCTION_CLUSTER", default_value = "bench-deploy-prod")]
    pub production_cluster: String,

    #[arg(long, env = "BENCH_DEPLOY_PRODUCTION_DEPLOYMENT", default_value = "bench-deploy")]
    pub production_deployment: String,

    /// Write a JSON report of every attempt to this path
    #[arg(long, env = "BENCH_DEPLOY_REPORT")]
    pub report: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "BENCH_DEPLOY_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Benchmark only, skip promotion
    #[arg(long)]
    pub dry_run: bool,
}

impl Args {
    fn bench_config(&self) -> BenchConfig {
        BenchConfig::new(self.image.clone())
            .with_samples(self.iterations)
            .with_sample_interval(Duration::from_secs(self.sample_interval_secs))
            .with_warm_up(Duration::from_secs(self.warm_up_secs))
            .with_resolve_retries(self.resolve_retries, Duration::from_millis(self.resolve_backoff_ms))
            .with_deadline(self.deadline_secs.map(Duration::from_secs))
            .with_naming(Naming {
                cluster_prefix: self.cluster_prefix.clone(),
                deployment_prefix: self.deployment_prefix.clone(),
                production_cluster: self.production_cluster.clone(),
                production_deployment: self.production_deployment.clone(),
                ..Naming::default()
            })
    }
}

#[tokio::main]
async fn main() -> BenchResult<()> {
    // .env values only fill variables that are not already set
    let _ = dotenv::dotenv();
    let args = Args::parse();

    logging::init_tracing(Some(&args.log_level));
    let actor = ActorId::Coordinator;

    let result = run(args).await;
    if let Err(e) = &result {
        logging::log_error(&actor, "bench-deploy", e);
    }
    result
}

async fn run(args: Args) -> BenchResult<()> {
    let actor = ActorId::Coordinator;
    let config = args.bench_config();
    config.validate()?;

    let candidates = match &args.candidates {
        Some(path) => load_candidates(path).await?,
        None => default_candidates(),
    };
    actor_info!(
        actor,
        "Run {}: {} candidate(s), {} worker(s), image {}",
        config.naming.run_id,
        candidates.len(),
        args.workers,
        config.image
    );

    let provisioner = Arc::new(
        GcloudProvisioner::new()
            .with_zone(args.zone.clone())
            .with_project(args.project.clone()),
    );
    let kubectl = Arc::new(KubectlClient::new());

    let executor = LifecycleExecutor::new(provisioner.clone(), kubectl.clone(), kubectl.clone(), config.clone());
    let orchestrator = Orchestrator::new(Arc::new(executor), config.clone());

    // Ctrl+C cancels the benchmark phase and any promotion step in flight
    let benchmark_shutdown = orchestrator.shutdown_handle();
    let (promotion_shutdown, promotion_signal) = shutdown_channel();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                logging::log_shutdown(&ActorId::Coordinator, "Received Ctrl+C signal");
                benchmark_shutdown.trigger();
                promotion_shutdown.trigger();
            }
            Err(err) => {
                logging::log_error(&ActorId::Coordinator, "Signal handling", &err);
            }
        }
    });

    let outcome = orchestrator.orchestrate(candidates, args.workers).await;

    if let (Some(path), Some(report)) = (&args.report, orchestrator.report().await) {
        report.write_json(path).await?;
        actor_info!(actor, "📝 Report written to {}", path.display());
    }

    let best = outcome?;
    if args.dry_run {
        logging::log_success(
            &actor,
            &format!("Dry run: {} would be promoted (score {:.2})", best.config(), best.score()),
        );
        return Ok(());
    }

    let promoter = Promoter::new(provisioner, kubectl, config);
    let promotion = promoter.promote(&best, &args.image, &promotion_signal).await?;

    logging::log_success(
        &actor,
        &format!(
            "{} deployed on {} ({})",
            promotion.deployment, promotion.cluster, promotion.config
        ),
    );
    Ok(())
}
