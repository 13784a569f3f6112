//! Test fixtures and data for benchmark tests
//!
//! This module provides consistent test data and fixtures used across all test suites.

use shared::{InstanceConfig, ResourceSample};

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const IMAGE: &'static str = "gcr.io/demo/app:1";
    pub const RUN_ID: &'static str = "test0001";

    /// 4 cores / 8 GB, the expected winner of the reference scenario
    pub fn shape_a() -> InstanceConfig {
        InstanceConfig::new(4, 8192, 0.109).unwrap()
    }

    /// 2 cores / 12 GB
    pub fn shape_b() -> InstanceConfig {
        InstanceConfig::new(2, 12288, 0.066).unwrap()
    }

    /// `120m` CPU, `45%` memory
    pub fn sample_a() -> ResourceSample {
        ResourceSample::new(120.0, 45.0)
    }

    /// `80m` CPU, `30%` memory
    pub fn sample_b() -> ResourceSample {
        ResourceSample::new(80.0, 30.0)
    }

    /// Expected score of `shape_a` under `sample_a`
    pub fn score_a() -> f64 {
        120.0 * 45.0 * 4.0 * 8192.0 / 0.109
    }

    /// Expected score of `shape_b` under `sample_b`
    pub fn score_b() -> f64 {
        80.0 * 30.0 * 2.0 * 12288.0 / 0.066
    }

    /// Distinct shapes, one per core count in `1..=count`
    pub fn numbered_shapes(count: u32) -> Vec<InstanceConfig> {
        (1..=count)
            .map(|cores| InstanceConfig::new(cores, 1024, 0.01 * f64::from(cores)).unwrap())
            .collect()
    }
}

/// Relative float comparison for scores built from large products
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}
