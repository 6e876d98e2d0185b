//! Reducer driver: folds a captured batch of actions through `update`.

use std::collections::VecDeque;
use std::sync::Arc;

use super::queue::EffectQueue;
use crate::program::Program;

pub(crate) struct BatchOutcome {
    pub applied: usize,
    /// Batch-level comparison: the final state is a different allocation
    /// than the pre-batch state. Intermediate states are not consulted.
    pub changed: bool,
}

/// Apply `batch` in arrival order. Each action sees the state left by the
/// previous one; produced effects are queued in the same order.
///
/// `update` is not guarded: a panic here is a broken program and unwinds
/// out of the cycle.
pub(crate) fn apply_batch<P: Program>(
    program: &P,
    state: &mut Arc<P::State>,
    effects: &mut EffectQueue<P::Effect>,
    batch: VecDeque<P::Action>,
) -> BatchOutcome {
    let before = Arc::clone(state);
    let applied = batch.len();

    for action in batch {
        let transition = program.update(action, state);
        if !transition.is_unchanged_from(state) {
            *state = transition.state;
        }
        effects.push(transition.effect);
    }

    BatchOutcome {
        applied,
        changed: !Arc::ptr_eq(&before, state),
    }
}
