use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::models::error::CameraError;
use crate::models::state::RunState;
use crate::traits::camera_delegate::CameraSessionDelegate;
use crate::traits::hardware_session::HardwareSession;

/// Drives the `Stopped ⇄ Running` state of a hardware session.
#[derive(Debug, Default)]
pub struct SessionLifecycle {
    desired_active: AtomicBool,
    restarts: AtomicU64,
}

impl SessionLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn desired_active(&self) -> bool {
        self.desired_active.load(Ordering::Acquire)
    }

    /// How often the session was restarted after a runtime error.
    pub fn restarts(&self) -> u64 {
        self.restarts.load(Ordering::Relaxed)
    }

    /// Starts or stops `session` to match `is_active`.
    ///
    /// Returns the new state when a transition happened, `None` when the
    /// session already was in the desired state.
    pub fn reconcile(&self, session: &dyn HardwareSession, is_active: bool) -> Option<RunState> {
        self.desired_active.store(is_active, Ordering::Release);
        let is_running = session.is_running();

        match (is_active, is_running) {
            (true, false) => {
                log::info!("Starting capture session...");
                session.start_running();
                log::info!("Started capture session");
                Some(RunState::Running)
            }
            (false, true) => {
                log::info!("Stopping capture session...");
                session.stop_running();
                log::info!("Stopped capture session");
                Some(RunState::Stopped)
            }
            _ => None,
        }
    }

    /// Reports an out-of-band hardware error and re-issues a start when the
    /// session is supposed to be running. Restarts are immediate and not rate
    /// limited. Returns `Running` when the session had actually stopped.
    pub fn handle_runtime_error(
        &self,
        session: &dyn HardwareSession,
        error: &CameraError,
        delegate: &dyn CameraSessionDelegate,
    ) -> Option<RunState> {
        log::error!("Capture session runtime error: {}", error);
        delegate.on_error(error);

        if !self.desired_active() {
            return None;
        }
        log::info!("Restarting capture session after runtime error...");
        self.restarts.fetch_add(1, Ordering::Relaxed);
        let was_running = session.is_running();
        session.start_running();
        (!was_running).then_some(RunState::Running)
    }
}
