use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Point-in-time counters for one runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    pub cycles: u64,
    pub actions: u64,
    pub renders: u64,
    pub render_failures: u64,
    pub subscription_failures: u64,
    pub effects_launched: u64,
    pub effect_failures: u64,
    pub effects_cancelled: u64,
}

#[derive(Default)]
struct Counters {
    cycles: AtomicU64,
    actions: AtomicU64,
    renders: AtomicU64,
    render_failures: AtomicU64,
    subscription_failures: AtomicU64,
    effects_launched: AtomicU64,
    effect_failures: AtomicU64,
    effects_cancelled: AtomicU64,
}

/// Shared counters; cloned into effect tasks so they can report back.
#[derive(Clone, Default)]
pub(crate) struct Stats {
    inner: Arc<Counters>,
}

impl Stats {
    pub fn cycle(&self) -> u64 {
        self.inner.cycles.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn actions(&self, count: usize) {
        self.inner
            .actions
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn render(&self) {
        self.inner.renders.fetch_add(1, Ordering::Relaxed);
    }

    pub fn render_failure(&self) {
        self.inner.render_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn subscription_failures(&self, count: usize) {
        self.inner
            .subscription_failures
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn effect_launched(&self) {
        self.inner.effects_launched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn effect_failure(&self) {
        self.inner.effect_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn effect_cancelled(&self) {
        self.inner.effects_cancelled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CycleStats {
        let c = &self.inner;
        CycleStats {
            cycles: c.cycles.load(Ordering::Relaxed),
            actions: c.actions.load(Ordering::Relaxed),
            renders: c.renders.load(Ordering::Relaxed),
            render_failures: c.render_failures.load(Ordering::Relaxed),
            subscription_failures: c.subscription_failures.load(Ordering::Relaxed),
            effects_launched: c.effects_launched.load(Ordering::Relaxed),
            effect_failures: c.effect_failures.load(Ordering::Relaxed),
            effects_cancelled: c.effects_cancelled.load(Ordering::Relaxed),
        }
    }
}
