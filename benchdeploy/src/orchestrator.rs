//! Benchmark coordinator
//!
//! Fills the candidate queue, runs a fixed pool of workers against it, waits
//! for every worker to report and reduces their outcomes to one global best.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{mpsc, Mutex};
use tokio::time::sleep;

use shared::{actor_debug, actor_info, actor_warn, logging, ActorId, InstanceConfig};

use crate::config::BenchConfig;
use crate::core::{select_best, CandidateQueue, GlobalBest, WorkerOutcome};
use crate::error::{BenchError, BenchResult};
use crate::report::RunReport;
use crate::shutdown::{shutdown_channel, ShutdownTrigger};
use crate::traits::Benchmark;
use crate::worker::run_worker;

/// Runs one benchmark phase over a set of candidates
pub struct Orchestrator<B>
where
    B: Benchmark + ?Sized + 'static,
{
    benchmark: Arc<B>,
    config: BenchConfig,

    /// Fired by the deadline or an external interrupt
    shutdown: ShutdownTrigger,

    /// Report of the completed run
    report: Mutex<Option<RunReport>>,

    started: AtomicBool,
}

impl<B> Orchestrator<B>
where
    B: Benchmark + ?Sized + 'static,
{
    pub fn new(benchmark: Arc<B>, config: BenchConfig) -> Self {
        let (shutdown, _) = shutdown_channel();
        Self {
            benchmark,
            config,
            shutdown,
            report: Mutex::new(None),
            started: AtomicBool::new(false),
        }
    }

    /// Handle that cancels the run when triggered
    pub fn shutdown_handle(&self) -> ShutdownTrigger {
        self.shutdown.clone()
    }

    /// Attempt log of the finished run, `None` until `orchestrate` returns
    pub async fn report(&self) -> Option<RunReport> {
        self.report.lock().await.clone()
    }

    /// Benchmark every candidate with `worker_count` concurrent workers
    ///
    /// Returns only after every worker has finished and reported, including
    /// when the deadline or an interrupt cut the run short. In that case the
    /// best of whatever completed is still returned.
    ///
    /// # Errors
    /// - `Configuration` for a zero worker count or a second invocation
    /// - `NoViableResult` when no configuration produced a score
    pub async fn orchestrate(&self, candidates: Vec<InstanceConfig>, worker_count: usize) -> BenchResult<GlobalBest> {
        let actor = ActorId::Coordinator;

        if worker_count == 0 {
            return Err(BenchError::config("worker count must be at least 1"));
        }
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(BenchError::config("orchestrate may only be called once per orchestrator"));
        }

        let started_at = Utc::now();
        let candidate_count = candidates.len();
        logging::log_startup(
            &actor,
            &format!(
                "benchmark run {} with {} worker(s) over {} candidate(s)",
                self.config.naming.run_id, worker_count, candidate_count
            ),
        );

        let queue = Arc::new(CandidateQueue::from_configs(candidates));
        let (tx, mut rx) = mpsc::channel::<WorkerOutcome>(worker_count);

        let deadline = self.config.deadline.map(|limit| {
            let trigger = self.shutdown.clone();
            tokio::spawn(async move {
                sleep(limit).await;
                actor_warn!(ActorId::Coordinator, "⏰ Deadline of {:?} reached, cancelling workers", limit);
                trigger.trigger();
            })
        });

        let handles: Vec<_> = (0..worker_count)
            .map(|id| {
                tokio::spawn(run_worker(
                    id,
                    queue.clone(),
                    self.benchmark.clone(),
                    tx.clone(),
                    self.shutdown.signal(),
                ))
            })
            .collect();
        drop(tx);

        for (id, handle) in handles.into_iter().enumerate() {
            if let Err(e) = handle.await {
                logging::log_error(&actor, &format!("Worker {id}"), &e);
            }
        }
        if let Some(deadline) = deadline {
            deadline.abort();
        }

        let mut outcomes = Vec::with_capacity(worker_count);
        while let Some(outcome) = rx.recv().await {
            actor_debug!(
                actor,
                "Worker {} reported {} attempt(s)",
                outcome.worker,
                outcome.attempts.len()
            );
            outcomes.push(outcome);
        }
        // channel order is completion order; reduce in worker order
        outcomes.sort_by_key(|outcome| outcome.worker);

        let best = select_best(&outcomes);
        let report = RunReport::new(
            self.config.naming.run_id.clone(),
            started_at,
            worker_count,
            &outcomes,
            best.map(|b| *b.result()),
        );
        let attempted = report.attempts.len();
        actor_info!(
            actor,
            "📋 {} of {} candidate(s) attempted: {} scored, {} failed",
            attempted,
            candidate_count,
            report.succeeded(),
            report.failed()
        );
        if report.leaked_clusters() > 0 {
            actor_warn!(
                actor,
                "⚠️ {} cluster(s) could not be deprovisioned; check the report",
                report.leaked_clusters()
            );
        }
        *self.report.lock().await = Some(report);

        match best {
            Some(best) => {
                logging::log_success(
                    &actor,
                    &format!(
                        "Best configuration {} with score {:.2} (worker {})",
                        best.config(),
                        best.score(),
                        best.worker()
                    ),
                );
                Ok(best)
            }
            None => Err(BenchError::NoViableResult { attempted }),
        }
    }
}
