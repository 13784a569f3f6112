//! Shared types for the bench-deploy workspace
//!
//! Contains the value types that flow between the benchmark workers, the
//! coordinator and the promoter, plus the logging facility every component
//! uses to tag its output.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;
