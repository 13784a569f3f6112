//! Candidate queue, scoring, tool-output parsing and best-result reduction
//!
//! Nothing here talks to a cluster; the executor and services feed these
//! functions plain values.

pub mod outcome;
pub mod parse;
pub mod queue;
pub mod retry;
pub mod score;
pub mod selection;

pub use outcome::{AttemptOutcome, AttemptRecord, WorkerOutcome};
pub use queue::CandidateQueue;
pub use score::{normalize, score};
pub use selection::{keep_best, select_best, GlobalBest};
