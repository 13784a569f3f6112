//! Benchmark worker loop
//!
//! A worker drains the shared candidate queue one configuration at a time,
//! keeps its own best result and reports exactly once when the queue is
//! empty or shutdown fires.

use std::sync::Arc;

use tokio::sync::mpsc;

use shared::{actor_debug, actor_info, actor_warn, logging, ActorId};

use crate::core::{keep_best, AttemptRecord, CandidateQueue, WorkerOutcome};
use crate::shutdown::ShutdownSignal;
use crate::traits::Benchmark;

/// Run one worker to completion
///
/// Per-configuration failures are recorded and skipped. The outcome is sent
/// once at the end; a closed channel is logged, never retried.
pub async fn run_worker<B>(
    id: usize,
    queue: Arc<CandidateQueue>,
    benchmark: Arc<B>,
    outcomes: mpsc::Sender<WorkerOutcome>,
    shutdown: ShutdownSignal,
) where
    B: Benchmark + ?Sized,
{
    let actor = ActorId::Worker(id);
    logging::log_startup(&actor, "benchmark worker");

    let mut outcome = WorkerOutcome::none(id);

    loop {
        if shutdown.is_triggered() {
            actor_info!(actor, "Shutdown requested, leaving {} configuration(s) queued", queue.len());
            break;
        }
        let Some(config) = queue.try_dequeue() else {
            actor_debug!(actor, "Candidate queue drained");
            break;
        };

        logging::log_progress(&actor, "🔬 Benchmarking", &config.to_string());
        let lifecycle = benchmark.run_lifecycle(id, &config, &shutdown).await;

        let record = match lifecycle.result {
            Ok(result) => {
                let previous = outcome.best;
                outcome.best = keep_best(previous, result);
                if outcome.best != previous {
                    actor_info!(actor, "🏆 New personal best: {} with score {:.2}", config, result.score);
                }
                AttemptRecord::scored(id, &result)
            }
            Err(error) => {
                actor_warn!(actor, "❌ {} failed ({:?}): {}", config, error.kind(), error);
                AttemptRecord::failed(id, config, &error)
            }
        };
        outcome.attempts.push(record.with_cleanup_error(lifecycle.cleanup.as_ref()));
    }

    let summary = match &outcome.best {
        Some(best) => format!("{} attempt(s), best score {:.2}", outcome.attempts.len(), best.score),
        None => format!("{} attempt(s), no successful result", outcome.attempts.len()),
    };
    logging::log_shutdown(&actor, &summary);

    if outcomes.send(outcome).await.is_err() {
        logging::log_error(&actor, "Reporting outcome", &"coordinator channel closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExecutionError, FailureKind, Phase, ServiceError};
    use crate::executor::Lifecycle;
    use crate::shutdown::shutdown_channel;
    use crate::traits::MockBenchmark;
    use shared::{BenchmarkResult, InstanceConfig};

    fn shape(cores: u32) -> InstanceConfig {
        InstanceConfig::new(cores, 8192, 0.1).unwrap()
    }

    async fn run_single(queue: CandidateQueue, benchmark: MockBenchmark, shutdown: ShutdownSignal) -> WorkerOutcome {
        let (tx, mut rx) = mpsc::channel(1);
        run_worker(0, Arc::new(queue), Arc::new(benchmark), tx, shutdown).await;
        let outcome = rx.recv().await.unwrap();
        assert!(rx.recv().await.is_none(), "worker must report exactly once");
        outcome
    }

    #[tokio::test]
    async fn test_best_is_max_over_attempts() {
        let scores = [(2, 4.0), (4, 9.0), (8, 6.5)];
        let queue = CandidateQueue::from_configs(scores.iter().map(|(cores, _)| shape(*cores)));

        let mut benchmark = MockBenchmark::new();
        benchmark.expect_run_lifecycle().times(3).returning(move |_, config, _| {
            let score = scores
                .iter()
                .find(|(cores, _)| *cores == config.cores())
                .map(|(_, score)| *score)
                .unwrap();
            Lifecycle::scored(BenchmarkResult::new(score, *config))
        });

        let outcome = run_single(queue, benchmark, ShutdownSignal::never()).await;
        let best = outcome.best.unwrap();
        assert_eq!(best.score, 9.0);
        assert_eq!(best.config.cores(), 4);
        assert_eq!(outcome.attempts.len(), 3);
        assert!(outcome.attempts.iter().all(|a| a.is_success()));
    }

    #[tokio::test]
    async fn test_equal_score_keeps_earlier_configuration() {
        let queue = CandidateQueue::from_configs([shape(2), shape(4)]);

        let mut benchmark = MockBenchmark::new();
        benchmark
            .expect_run_lifecycle()
            .times(2)
            .returning(|_, config, _| Lifecycle::scored(BenchmarkResult::new(5.0, *config)));

        let outcome = run_single(queue, benchmark, ShutdownSignal::never()).await;
        assert_eq!(outcome.best.unwrap().config.cores(), 2);
        assert_eq!(outcome.attempts.len(), 2);
    }

    #[tokio::test]
    async fn test_failure_is_recorded_and_worker_continues() {
        let queue = CandidateQueue::from_configs([shape(2), shape(4)]);

        let mut benchmark = MockBenchmark::new();
        benchmark.expect_run_lifecycle().times(2).returning(|_, config, _| {
            if config.cores() == 2 {
                Lifecycle::failed(ExecutionError::DeployFailed {
                    deployment: "bench-pod-w0-run0".to_string(),
                    source: ServiceError::NotFound {
                        name: "image".to_string(),
                    },
                })
            } else {
                Lifecycle {
                    result: Ok(BenchmarkResult::new(3.5, *config)),
                    cleanup: Some(ExecutionError::DeprovisionFailed {
                        cluster: "bench-w0-run0".to_string(),
                        source: ServiceError::TimedOut {
                            after: std::time::Duration::from_secs(1),
                        },
                    }),
                }
            }
        });

        let outcome = run_single(queue, benchmark, ShutdownSignal::never()).await;
        assert_eq!(outcome.best.unwrap().score, 3.5);
        assert_eq!(outcome.attempts.len(), 2);

        let failed = outcome.attempts.iter().find(|a| !a.is_success()).unwrap();
        assert!(matches!(
            &failed.outcome,
            crate::core::AttemptOutcome::Failed { kind: FailureKind::DeployFailed, .. }
        ));

        let scored = outcome.attempts.iter().find(|a| a.is_success()).unwrap();
        assert!(scored.cleanup_error.as_deref().unwrap().contains("bench-w0-run0"));
    }

    #[tokio::test]
    async fn test_empty_queue_reports_none() {
        let mut benchmark = MockBenchmark::new();
        benchmark.expect_run_lifecycle().never();

        let outcome = run_single(CandidateQueue::from_configs([]), benchmark, ShutdownSignal::never()).await;
        assert_eq!(outcome, WorkerOutcome::none(0));
    }

    #[tokio::test]
    async fn test_shutdown_stops_dequeueing() {
        let queue = Arc::new(CandidateQueue::from_configs([shape(2), shape(4), shape(8)]));
        let (trigger, signal) = shutdown_channel();

        let mut benchmark = MockBenchmark::new();
        benchmark.expect_run_lifecycle().times(1).returning(move |_, config, _| {
            trigger.trigger();
            Lifecycle::scored(BenchmarkResult::new(1.0, *config))
        });

        let (tx, mut rx) = mpsc::channel(1);
        run_worker(0, queue.clone(), Arc::new(benchmark), tx, signal).await;

        let outcome = rx.recv().await.unwrap();
        assert_eq!(outcome.attempts.len(), 1);
        assert_eq!(queue.len(), 2);
    }

    #[tokio::test]
    async fn test_cancelled_attempt_is_recorded() {
        let queue = CandidateQueue::from_configs([shape(2)]);
        let mut benchmark = MockBenchmark::new();
        benchmark
            .expect_run_lifecycle()
            .returning(|_, _, _| Lifecycle::failed(ExecutionError::Cancelled { phase: Phase::Sample }));

        let outcome = run_single(queue, benchmark, ShutdownSignal::never()).await;
        assert!(outcome.best.is_none());
        assert!(matches!(
            &outcome.attempts[0].outcome,
            crate::core::AttemptOutcome::Failed { kind: FailureKind::Cancelled, .. }
        ));
    }
}
