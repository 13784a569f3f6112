//! Utilisation-per-cost scoring
//!
//! `score = normalize(cpu) * normalize(mem) * cores * memory_mb / hourly_cost`
//!
//! Higher is better: more utilised capacity per unit of hourly cost.

use shared::{InstanceConfig, ResourceSample};

/// Clamp a non-positive utilisation term to `1`
///
/// An instance that reports zero usage is still working; scoring it as zero
/// would make the whole product worthless.
pub fn normalize(value: f64) -> f64 {
    if value > 0.0 {
        value
    } else {
        1.0
    }
}

pub fn score(sample: &ResourceSample, config: &InstanceConfig) -> f64 {
    normalize(sample.cpu)
        * normalize(sample.memory)
        * f64::from(config.cores())
        * f64::from(config.memory_mb())
        / config.hourly_cost()
}
