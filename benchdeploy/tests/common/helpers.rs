//! Test helpers for wiring the fake cloud into the real executor

use std::sync::Arc;
use std::time::Duration;

use benchdeploy::{BenchConfig, LifecycleExecutor, Naming, Orchestrator, PhaseTimeouts, Promoter};

use super::fake_cloud::FakeCloud;
use super::fixtures::TestFixtures;

pub type FakeExecutor = LifecycleExecutor<FakeCloud, FakeCloud, FakeCloud>;

pub struct TestHelpers;

impl TestHelpers {
    /// One sample, no warm-up, millisecond backoff
    pub fn fast_config() -> BenchConfig {
        BenchConfig::new(TestFixtures::IMAGE)
            .with_samples(1)
            .with_sample_interval(Duration::ZERO)
            .with_warm_up(Duration::ZERO)
            .with_resolve_retries(3, Duration::from_millis(1))
            .with_naming(Naming {
                run_id: TestFixtures::RUN_ID.to_string(),
                ..Naming::default()
            })
    }

    /// Realistic waits and timeouts, for paused-clock tests
    pub fn timed_config() -> BenchConfig {
        Self::fast_config()
            .with_samples(3)
            .with_sample_interval(Duration::from_secs(10))
            .with_warm_up(Duration::from_secs(180))
            .with_timeouts(PhaseTimeouts::default())
    }

    pub fn orchestrator(cloud: &Arc<FakeCloud>, config: BenchConfig) -> Orchestrator<FakeExecutor> {
        let executor = LifecycleExecutor::new(cloud.clone(), cloud.clone(), cloud.clone(), config.clone());
        Orchestrator::new(Arc::new(executor), config)
    }

    pub fn promoter(cloud: &Arc<FakeCloud>, config: BenchConfig) -> Promoter<FakeCloud, FakeCloud> {
        Promoter::new(cloud.clone(), cloud.clone(), config)
    }
}
