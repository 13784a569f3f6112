//! Candidate queue shared by all benchmark workers
//!
//! A single internally-locked FIFO. The lock is held only for the push or
//! pop itself, never across a lifecycle run.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use shared::InstanceConfig;

use crate::error::QueueClosed;

/// Fixed set of configurations awaiting a worker
pub struct CandidateQueue {
    state: Mutex<QueueState>,
}

struct QueueState {
    pending: VecDeque<InstanceConfig>,
    closed: bool,
}

impl CandidateQueue {
    /// Create an empty, open queue
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                pending: VecDeque::new(),
                closed: false,
            }),
        }
    }

    /// Load every configuration and close the queue for further writes
    pub fn from_configs<I>(configs: I) -> Self
    where
        I: IntoIterator<Item = InstanceConfig>,
    {
        let queue = Self {
            state: Mutex::new(QueueState {
                pending: configs.into_iter().collect(),
                closed: false,
            }),
        };
        queue.close();
        queue
    }

    pub fn enqueue(&self, config: InstanceConfig) -> Result<(), QueueClosed> {
        let mut state = self.lock();
        if state.closed {
            return Err(QueueClosed);
        }
        state.pending.push_back(config);
        Ok(())
    }

    /// Reject all further enqueues; this cannot be undone
    pub fn close(&self) {
        self.lock().closed = true;
    }

    /// Take the next configuration, or `None` without blocking when empty
    pub fn try_dequeue(&self) -> Option<InstanceConfig> {
        self.lock().pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().pending.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    // A panic while holding the lock cannot leave the deque half-modified,
    // so the poisoned state is still consistent.
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CandidateQueue {
    fn default() -> Self {
        Self::new()
    }
}
