//! Flush coalescing and the re-entrancy guard.
//!
//! ```text
//! Idle ──dispatch──→ FlushRequested ──cycle starts──→ Flushing
//!   ↑                      ↑                              │
//!   └──────────────────────┴──────── cycle body done ─────┘
//! ```
//!
//! `Flushing` is never re-entered. A deferred run that finds a cycle already
//! in progress drops its request. The running cycle re-arms on exit if work
//! is still queued. On a multi-thread host that cycle can exit between the
//! rejected run's failed claim and its cleared request, so the rejected run
//! re-checks afterwards and re-arms if no cycle is running and work remains.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

pub(crate) struct Scheduler {
    flush_requested: AtomicBool,
    flush_in_progress: AtomicBool,
    halted: AtomicBool,
    /// Back-to-back cycles re-armed by work queued during a cycle.
    streak: AtomicU32,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            flush_requested: AtomicBool::new(false),
            flush_in_progress: AtomicBool::new(false),
            halted: AtomicBool::new(false),
            streak: AtomicU32::new(0),
        }
    }

    /// Mark a flush as requested. Returns true when the caller must arm the
    /// deferred run (i.e. no run was pending yet).
    pub fn request(&self) -> bool {
        !self.flush_requested.swap(true, Ordering::SeqCst)
    }

    /// Enter `Flushing`. Returns false if a cycle is already running or the
    /// scheduler is halted. The pending request is cleared either way, so a
    /// rejected caller must look for stranded work once this returns.
    pub fn try_begin(&self) -> bool {
        if self.is_halted() {
            return false;
        }
        let claimed = self.claim();
        self.flush_requested.store(false, Ordering::SeqCst);
        claimed
    }

    /// Take exclusive ownership of the cycle-owned core, halted or not.
    /// Used by teardown; the flag is left set so no cycle follows.
    pub fn claim(&self) -> bool {
        self.flush_in_progress
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn finish(&self) {
        self.flush_in_progress.store(false, Ordering::SeqCst);
    }

    pub fn is_flushing(&self) -> bool {
        self.flush_in_progress.load(Ordering::SeqCst)
    }

    /// Stop for good after a fatal transition failure.
    pub fn halt(&self) {
        self.halted.store(true, Ordering::SeqCst);
        self.flush_in_progress.store(false, Ordering::SeqCst);
    }

    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::SeqCst)
    }

    /// Record a cycle that re-armed itself; returns the new streak length.
    pub fn extend_streak(&self) -> u32 {
        self.streak.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn reset_streak(&self) {
        self.streak.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_collapse_until_cycle_begins() {
        let scheduler = Scheduler::new();
        assert!(scheduler.request());
        assert!(!scheduler.request());
        assert!(!scheduler.request());
        assert!(scheduler.try_begin());
        assert!(scheduler.request());
    }

    #[test]
    fn flushing_is_not_reentered() {
        let scheduler = Scheduler::new();
        assert!(scheduler.try_begin());
        assert!(scheduler.is_flushing());
        assert!(!scheduler.try_begin());
        scheduler.finish();
        assert!(scheduler.try_begin());
    }

    #[test]
    fn rejected_run_releases_its_request() {
        let scheduler = Scheduler::new();
        assert!(scheduler.try_begin());
        assert!(scheduler.request());
        assert!(!scheduler.try_begin());
        // The running cycle can arm a fresh run on exit.
        assert!(scheduler.request());
    }

    #[test]
    fn cycle_exiting_inside_a_rejected_run_leaves_no_request() {
        let scheduler = Scheduler::new();
        assert!(scheduler.try_begin());
        assert!(scheduler.request());
        // The running cycle exits while the rejected run is between its
        // failed claim and clearing the request.
        assert!(!scheduler.claim());
        scheduler.finish();
        assert!(!scheduler.request(), "exit re-arm coalesces into the dying request");
        scheduler.flush_requested.store(false, Ordering::SeqCst);
        // What the rejected run observes when it re-checks.
        assert!(!scheduler.is_flushing());
        assert!(scheduler.request());
    }

    #[test]
    fn halt_blocks_every_later_cycle() {
        let scheduler = Scheduler::new();
        assert!(scheduler.try_begin());
        scheduler.halt();
        assert!(!scheduler.is_flushing());
        assert!(!scheduler.try_begin());
        assert!(scheduler.is_halted());
        assert!(scheduler.claim());
        assert!(!scheduler.claim());
    }

    #[test]
    fn streak_counts_and_resets() {
        let scheduler = Scheduler::new();
        assert_eq!(scheduler.extend_streak(), 1);
        assert_eq!(scheduler.extend_streak(), 2);
        scheduler.reset_streak();
        assert_eq!(scheduler.extend_streak(), 1);
    }
}
