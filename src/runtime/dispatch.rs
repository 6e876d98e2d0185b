//! Dispatcher handle handed to views, effects and subscriptions.

use std::sync::{Arc, Weak};

/// Event callback produced by views (button clicks and the like).
pub type Callback = Arc<dyn Fn() + Send + Sync>;

/// Text input callback produced by views.
pub type InputCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Receiving side of a [`Dispatch`]. Implemented by the runtime.
pub(crate) trait ActionSink<A>: Send + Sync {
    fn accept(&self, action: A);
}

/// Cheap, cloneable handle that feeds actions into a runtime.
///
/// Holds only a weak reference: a dispatch outliving its runtime (a stray
/// timer, a late effect) turns into a no-op instead of keeping the runtime
/// alive. Dispatching never blocks and never panics.
pub struct Dispatch<A> {
    sink: Option<Weak<dyn ActionSink<A>>>,
}

impl<A> Clone for Dispatch<A> {
    fn clone(&self) -> Self {
        Self {
            sink: self.sink.clone(),
        }
    }
}

impl<A> Dispatch<A> {
    pub(crate) fn new(sink: Weak<dyn ActionSink<A>>) -> Self {
        Self { sink: Some(sink) }
    }

    /// A handle connected to nothing. Useful for calling `view` directly.
    pub fn detached() -> Self {
        Self { sink: None }
    }

    pub fn dispatch(&self, action: A) {
        match self.sink.as_ref().and_then(Weak::upgrade) {
            Some(sink) => sink.accept(action),
            None => tracing::trace!("Dispatch dropped (runtime gone)"),
        }
    }

    /// Whether the runtime behind this handle still exists.
    pub fn is_connected(&self) -> bool {
        self.sink
            .as_ref()
            .is_some_and(|sink| sink.strong_count() > 0)
    }
}

impl<A: Send + 'static> Dispatch<A> {
    /// Callback that dispatches the action built by `make` on every call.
    pub fn callback<F>(&self, make: F) -> Callback
    where
        F: Fn() -> A + Send + Sync + 'static,
    {
        let dispatch = self.clone();
        Arc::new(move || dispatch.dispatch(make()))
    }

    /// Input callback that dispatches the action built from the new text.
    pub fn input_callback<F>(&self, make: F) -> InputCallback
    where
        F: Fn(String) -> A + Send + Sync + 'static,
    {
        let dispatch = self.clone();
        Arc::new(move |text| dispatch.dispatch(make(text)))
    }
}
