//! Action and effect queues.
//!
//! Both are drained by swapping in an empty buffer, so anything enqueued
//! while a batch is being processed lands in the next batch.

use std::collections::VecDeque;
use std::mem;

use parking_lot::Mutex;

/// FIFO of dispatched actions, shared between dispatchers and the cycle.
pub(crate) struct ActionQueue<A> {
    inner: Mutex<VecDeque<A>>,
}

impl<A> ActionQueue<A> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
        }
    }

    pub fn push(&self, action: A) {
        self.inner.lock().push_back(action);
    }

    /// Capture the current batch, leaving an empty queue behind.
    pub fn take(&self) -> VecDeque<A> {
        mem::take(&mut *self.inner.lock())
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn clear(&self) -> usize {
        let mut queue = self.inner.lock();
        let dropped = queue.len();
        queue.clear();
        dropped
    }
}

/// FIFO of effects produced by the current batch. Owned by the cycle.
pub(crate) struct EffectQueue<E> {
    items: Vec<E>,
}

impl<E> EffectQueue<E> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Enqueue a produced effect; `None` means "no effect" and is skipped.
    pub fn push(&mut self, effect: Option<E>) {
        if let Some(effect) = effect {
            self.items.push(effect);
        }
    }

    pub fn take(&mut self) -> Vec<E> {
        mem::take(&mut self.items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}
