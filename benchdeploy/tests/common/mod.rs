//! Common test utilities and infrastructure
//!
//! Shared fixtures, the scripted fake cloud and wiring helpers used across
//! the integration test suites.

#![allow(dead_code)]

pub mod fake_cloud;
pub mod fixtures;
pub mod helpers;

pub use fake_cloud::{FakeCloud, ShapeScript};
pub use fixtures::{approx_eq, TestFixtures};
pub use helpers::TestHelpers;
