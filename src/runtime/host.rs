//! Host scheduling primitives.
//!
//! The runtime needs two things from its host: a way to run a callback
//! "after the current synchronous work" (the deferred flush) and a way to
//! run effect futures to completion independently of the cycle.

use futures_core::future::BoxFuture;
use tokio::runtime::Handle;

use super::error::MountError;

/// Deferred callback queued by the scheduler.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

pub trait Host: Send + Sync + 'static {
    /// Run `task` after the caller's synchronous work completes.
    fn defer(&self, task: Task);

    /// Run `future` to completion on its own task.
    fn spawn(&self, future: BoxFuture<'static, ()>);
}

/// Host backed by a tokio runtime.
///
/// On a current-thread runtime a deferred flush runs only once the code that
/// dispatched yields, so every dispatch made in one synchronous stretch lands
/// in the same batch.
#[derive(Clone)]
pub struct TokioHost {
    handle: Handle,
}

impl TokioHost {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Bind to the tokio runtime the caller is running on.
    pub fn current() -> Result<Self, MountError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|err| MountError::NoHost(err.to_string()))
    }
}

impl Host for TokioHost {
    fn defer(&self, task: Task) {
        self.handle.spawn(async move { task() });
    }

    fn spawn(&self, future: BoxFuture<'static, ()>) {
        self.handle.spawn(future);
    }
}
