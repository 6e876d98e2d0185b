//! Subscription manager.
//!
//! On every state change the whole active set is released (in install
//! order) and the static factory list is re-evaluated against the new
//! state. Nothing is diffed.

use std::sync::Arc;

use super::dispatch::Dispatch;
use super::error::SubscriptionError;
use super::isolate::isolate;

/// Teardown for one installed subscription.
pub struct Cleanup {
    release: Box<dyn FnOnce() -> Result<(), SubscriptionError> + Send>,
}

impl Cleanup {
    pub fn new<F>(release: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            release: Box::new(move || {
                release();
                Ok(())
            }),
        }
    }

    /// Cleanup that can report failure.
    pub fn fallible<F>(release: F) -> Self
    where
        F: FnOnce() -> Result<(), SubscriptionError> + Send + 'static,
    {
        Self {
            release: Box::new(release),
        }
    }

    /// Abort a tokio task on release.
    pub fn abort(task: tokio::task::JoinHandle<()>) -> Self {
        Self::new(move || task.abort())
    }

    fn run(self) -> Result<(), SubscriptionError> {
        isolate(self.release).unwrap_or_else(|panic| Err(SubscriptionError::Panicked(panic)))
    }
}

/// Factory for a state-conditioned external listener.
///
/// Returns `Ok(None)` when the current state needs no listener.
pub trait Subscription<S, A>: Send + Sync + 'static {
    fn subscribe(&self, state: &Arc<S>, dispatch: &Dispatch<A>) -> Result<Option<Cleanup>, SubscriptionError>;

    /// Label used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<S, A, F> Subscription<S, A> for F
where
    F: Fn(&Arc<S>, &Dispatch<A>) -> Result<Option<Cleanup>, SubscriptionError> + Send + Sync + 'static,
{
    fn subscribe(&self, state: &Arc<S>, dispatch: &Dispatch<A>) -> Result<Option<Cleanup>, SubscriptionError> {
        self(state, dispatch)
    }
}

/// Cleanups for the currently installed subscriptions, in install order.
pub(crate) struct ActiveSubscriptions {
    cleanups: Vec<(usize, Cleanup)>,
}

impl ActiveSubscriptions {
    pub fn new() -> Self {
        Self {
            cleanups: Vec::new(),
        }
    }

    /// Run every cleanup in install order. A failing cleanup is logged and
    /// does not stop the rest. Returns the number of failures.
    pub fn release(&mut self) -> usize {
        let mut failures = 0;
        for (index, cleanup) in self.cleanups.drain(..) {
            if let Err(err) = cleanup.run() {
                failures += 1;
                tracing::warn!(subscription = index, error = %err, "Subscription cleanup failed");
            }
        }
        failures
    }

    /// Evaluate every factory against `state`. A failing factory is logged
    /// and contributes no cleanup. Returns the number of failures.
    pub fn install<S: 'static, A: 'static>(
        &mut self,
        factories: &[Arc<dyn Subscription<S, A>>],
        state: &Arc<S>,
        dispatch: &Dispatch<A>,
    ) -> usize {
        let mut failures = 0;
        for (index, factory) in factories.iter().enumerate() {
            let outcome = isolate(|| factory.subscribe(state, dispatch))
                .unwrap_or_else(|panic| Err(SubscriptionError::Panicked(panic)));
            match outcome {
                Ok(Some(cleanup)) => self.cleanups.push((index, cleanup)),
                Ok(None) => {}
                Err(err) => {
                    failures += 1;
                    tracing::warn!(
                        subscription = index,
                        name = factory.name(),
                        error = %err,
                        "Subscription setup failed"
                    );
                }
            }
        }
        failures
    }

    pub fn len(&self) -> usize {
        self.cleanups.len()
    }
}
