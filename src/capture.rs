//! Start/stop lifecycle shared by the continuously-polling sensor workers.
//!
//! `Idle -> Running -> Stopping -> Idle`. Both the camera-poll and the
//! voice-listen workers are driven through this state machine so shutdown
//! can never race a callback into a torn-down orchestrator: `stop()`
//! cancels the worker's token and awaits its join handle before returning.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Lifecycle states for a sensor worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No worker running.
    Idle,
    /// Worker loop active.
    Running,
    /// Stop requested; waiting for the worker to exit.
    Stopping,
}

/// Owns one background sensor worker and its cancellation token.
#[derive(Debug)]
pub struct CaptureLifecycle {
    name: &'static str,
    state: LifecycleState,
    cancel: Option<CancellationToken>,
    handle: Option<JoinHandle<()>>,
}

impl CaptureLifecycle {
    /// Create an idle lifecycle. `name` is used in log lines only.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: LifecycleState::Idle,
            cancel: None,
            handle: None,
        }
    }

    /// Launch the worker: `Idle -> Running`.
    ///
    /// `spawn` receives a fresh cancellation token and must return the
    /// worker's join handle. Calling `start` while already running is a
    /// no-op.
    pub fn start<F>(&mut self, spawn: F)
    where
        F: FnOnce(CancellationToken) -> JoinHandle<()>,
    {
        if self.state == LifecycleState::Running {
            debug!("{} already running; start ignored", self.name);
            return;
        }
        let token = CancellationToken::new();
        self.handle = Some(spawn(token.clone()));
        self.cancel = Some(token);
        self.state = LifecycleState::Running;
        info!("{} started", self.name);
    }

    /// Signal the worker to exit and wait until it has: `Running -> Stopping -> Idle`.
    ///
    /// Idempotent. When this returns the worker task has been joined, so
    /// no further events from it can reach the pipeline.
    pub async fn stop(&mut self) {
        if self.state == LifecycleState::Idle {
            return;
        }
        self.state = LifecycleState::Stopping;
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
        self.state = LifecycleState::Idle;
        info!("{} stopped", self.name);
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Whether the worker is currently running.
    pub fn is_running(&self) -> bool {
        self.state == LifecycleState::Running
    }
}
