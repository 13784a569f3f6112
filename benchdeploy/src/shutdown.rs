//! Cancellation signal shared by the coordinator and its workers
//!
//! Backed by a `watch` channel so the flag is level-triggered: a worker that
//! starts listening after the trigger fired still observes it.

use std::sync::Arc;
use tokio::sync::watch;

/// Sending half; fires the signal for every clone of the paired receiver
#[derive(Debug, Clone)]
pub struct ShutdownTrigger {
    tx: Arc<watch::Sender<bool>>,
}

/// Receiving half handed to workers and lifecycle phases
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

/// Create a connected trigger/signal pair
pub fn shutdown_channel() -> (ShutdownTrigger, ShutdownSignal) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx: Arc::new(tx) }, ShutdownSignal { rx })
}

impl ShutdownTrigger {
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }
}

impl ShutdownSignal {
    /// A signal that never fires
    pub fn never() -> Self {
        let (_, signal) = shutdown_channel();
        signal
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once the trigger fires
    ///
    /// Pends forever when every trigger was dropped without firing.
    pub async fn triggered(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|fired| *fired).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
