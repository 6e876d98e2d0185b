use std::sync::Arc;

/// Result of `init` or `update`: the next state plus at most one effect.
///
/// "No effect" is `None`, never a sentinel value that could collide with a
/// real effect.
#[derive(Debug)]
pub struct Transition<S, E> {
    pub state: Arc<S>,
    pub effect: Option<E>,
}

impl<S, E> Transition<S, E> {
    /// Keep the current state. The runtime sees the same `Arc` and skips
    /// render and subscription rebuild.
    pub fn unchanged(state: &Arc<S>) -> Self {
        Self {
            state: Arc::clone(state),
            effect: None,
        }
    }

    /// Move to a freshly allocated state.
    pub fn to(state: S) -> Self {
        Self {
            state: Arc::new(state),
            effect: None,
        }
    }

    /// Move to an already shared state (e.g. restoring a previous snapshot).
    pub fn to_shared(state: Arc<S>) -> Self {
        Self {
            state,
            effect: None,
        }
    }

    pub fn with_effect(mut self, effect: E) -> Self {
        self.effect = Some(effect);
        self
    }

    /// Whether this transition keeps `previous` by identity.
    pub fn is_unchanged_from(&self, previous: &Arc<S>) -> bool {
        Arc::ptr_eq(&self.state, previous)
    }
}
