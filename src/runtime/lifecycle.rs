use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    Running = 0,
    Unmounting = 1,
    Unmounted = 2,
}

impl Phase {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Phase::Running,
            1 => Phase::Unmounting,
            _ => Phase::Unmounted,
        }
    }
}

/// Tracks the mount lifecycle and wakes anything waiting on teardown.
pub(crate) struct Lifecycle {
    phase: Arc<AtomicU8>,
    notify: Arc<Notify>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            phase: Arc::new(AtomicU8::new(Phase::Running as u8)),
            notify: Arc::new(Notify::new()),
        }
    }

    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::SeqCst))
    }

    pub fn is_running(&self) -> bool {
        self.phase() == Phase::Running
    }

    /// Move `Running → Unmounting`. Returns true only for the first caller.
    pub fn begin_unmount(&self) -> bool {
        let first = self
            .phase
            .compare_exchange(
                Phase::Running as u8,
                Phase::Unmounting as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok();
        if first {
            self.notify.notify_waiters();
        }
        first
    }

    pub fn complete(&self) {
        self.phase.store(Phase::Unmounted as u8, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn handle(&self) -> LifecycleHandle {
        LifecycleHandle {
            phase: Arc::clone(&self.phase),
            notify: Arc::clone(&self.notify),
        }
    }
}

/// Lightweight handle for waiting on teardown from spawned tasks.
#[derive(Clone)]
pub(crate) struct LifecycleHandle {
    phase: Arc<AtomicU8>,
    notify: Arc<Notify>,
}

impl LifecycleHandle {
    fn reached(&self, phase: Phase) -> bool {
        self.phase.load(Ordering::SeqCst) >= phase as u8
    }

    /// Resolves once unmount has started.
    pub async fn unmounting(&self) {
        self.wait_for(Phase::Unmounting).await;
    }

    /// Resolves once the final subscriptions have been released.
    pub async fn unmounted(&self) {
        self.wait_for(Phase::Unmounted).await;
    }

    async fn wait_for(&self, phase: Phase) {
        loop {
            // Register with Notify before checking the phase so a transition
            // between the check and the await is not missed.
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.reached(phase) {
                return;
            }
            notified.await;
        }
    }
}
