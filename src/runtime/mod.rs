//! The runtime loop.
//!
//! One cycle (flush) drains the action queue through `update`, and if the
//! state changed rebuilds subscriptions and renders, then launches the
//! batch's effects:
//!
//! ```text
//! dispatch ─→ action queue ─→ scheduler arms deferred flush
//!                                   │
//!   ┌───────────────────────────────┘
//!   ▼
//! reducer driver ─→ [changed?] ─→ subscriptions ─→ render
//!   │                                                │
//!   └──────────────→ effect runner ←─────────────────┘
//!                         │
//!                  dispatch (later cycle)
//! ```
//!
//! Every mounted app owns its own [`RuntimeHandle`]; there is no global
//! scheduler state. Structure:
//! - `scheduler.rs`: flush coalescing and the re-entrancy guard
//! - `queue.rs`: action/effect queues with swap-to-drain semantics
//! - `driver.rs`: folds a batch through `update`
//! - `subscriptions.rs`: wholesale release/re-install of subscriptions
//! - `render.rs`: view + host renderer call
//! - `effects.rs`: fire-and-forget effect tasks
//! - `lifecycle.rs`: unmount phases

mod dispatch;
mod driver;
mod effects;
mod error;
mod host;
mod isolate;
mod lifecycle;
mod queue;
mod render;
mod scheduler;
mod stats;
mod subscriptions;

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

pub use crate::config::RuntimeOptions;
pub use dispatch::{Callback, Dispatch, InputCallback};
pub use error::{EffectError, InitError, MountError, RenderError, SubscriptionError};
pub use host::{Host, Task, TokioHost};
pub use lifecycle::Phase;
pub use render::Renderer;
pub use stats::CycleStats;
pub use subscriptions::{Cleanup, Subscription};

use crate::program::{App, Program};
use dispatch::ActionSink;
use effects::EffectRunner;
use isolate::isolate;
use lifecycle::Lifecycle;
use queue::{ActionQueue, EffectQueue};
use scheduler::Scheduler;
use stats::Stats;
use subscriptions::ActiveSubscriptions;

/// Identifies one mounted runtime in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuntimeId(Uuid);

impl RuntimeId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RuntimeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Data only the cycle body touches.
struct Core<P: Program> {
    state: Arc<P::State>,
    effects: EffectQueue<P::Effect>,
    active: ActiveSubscriptions,
    renderer: Box<dyn Renderer<P::Tree>>,
    /// First render and subscription install have not happened yet.
    booting: bool,
}

struct Shared<P: Program> {
    id: RuntimeId,
    options: RuntimeOptions,
    program: P,
    props: P::Props,
    subscriptions: Vec<Arc<dyn Subscription<P::State, P::Action>>>,
    effects: EffectRunner<P::Effect, P::Action>,
    host: Arc<dyn Host>,
    dispatch: Dispatch<P::Action>,
    actions: ActionQueue<P::Action>,
    scheduler: Scheduler,
    lifecycle: Lifecycle,
    stats: Stats,
    /// Last committed state, readable outside the cycle.
    snapshot: RwLock<Arc<P::State>>,
    core: Mutex<Core<P>>,
    self_ref: Weak<Shared<P>>,
}

impl<P: Program> ActionSink<P::Action> for Shared<P> {
    fn accept(&self, action: P::Action) {
        if !self.lifecycle.is_running() || self.scheduler.is_halted() {
            tracing::trace!(runtime = %self.id, "Dispatch ignored (runtime stopped)");
            return;
        }
        self.actions.push(action);
        self.request_flush();
    }
}

impl<P: Program> Shared<P> {
    fn request_flush(&self) {
        if !self.scheduler.request() {
            return;
        }
        let runtime = self.self_ref.clone();
        self.host.defer(Box::new(move || {
            if let Some(runtime) = runtime.upgrade() {
                runtime.run_cycle();
            }
        }));
    }

    fn run_cycle(&self) {
        if !self.scheduler.try_begin() {
            self.rearm_if_stranded();
            return;
        }
        if !self.lifecycle.is_running() {
            self.scheduler.finish();
            self.finalize_unmount();
            return;
        }

        let cycle = self.stats.cycle();
        let span = tracing::debug_span!("cycle", runtime = %self.id, cycle);
        let _entered = span.enter();

        {
            let _halt = scopeguard::guard_on_unwind((), |()| {
                self.scheduler.halt();
                tracing::error!(runtime = %self.id, cycle, "Update panicked, runtime halted");
            });
            self.cycle_body();
        }

        self.scheduler.finish();
        self.after_cycle();
    }

    fn cycle_body(&self) {
        let mut guard = self.core.lock();
        let core = &mut *guard;

        let mut changed = std::mem::take(&mut core.booting);
        let batch = self.actions.take();
        if !batch.is_empty() {
            let outcome = driver::apply_batch(&self.program, &mut core.state, &mut core.effects, batch);
            self.stats.actions(outcome.applied);
            changed |= outcome.changed;
            tracing::trace!(
                applied = outcome.applied,
                changed = outcome.changed,
                effects = core.effects.len(),
                "Batch applied"
            );
        }

        if changed {
            *self.snapshot.write() = Arc::clone(&core.state);

            let released = core.active.release();
            let failed = core.active.install(&self.subscriptions, &core.state, &self.dispatch);
            self.stats.subscription_failures(released + failed);
            tracing::trace!(active = core.active.len(), "Subscriptions rebuilt");

            match render::render_state(
                &self.program,
                &self.props,
                &core.state,
                &self.dispatch,
                core.renderer.as_mut(),
            ) {
                Ok(()) => self.stats.render(),
                Err(err) => {
                    self.stats.render_failure();
                    tracing::warn!(runtime = %self.id, error = %err, "Render failed, keeping last frame");
                }
            }
        }

        let effects = core.effects.take();
        if !effects.is_empty() {
            self.effects.launch(effects, &self.dispatch);
        }
    }

    fn after_cycle(&self) {
        if !self.lifecycle.is_running() {
            self.finalize_unmount();
            return;
        }
        if self.actions.is_empty() {
            self.scheduler.reset_streak();
            return;
        }
        let streak = self.scheduler.extend_streak();
        if streak == self.options.cycle_warn_threshold {
            tracing::warn!(
                runtime = %self.id,
                streak,
                "Cycles keep re-arming themselves; possible dispatch loop"
            );
        }
        self.request_flush();
    }

    /// A rejected run gives up its request. If the cycle that rejected it
    /// has already exited and saw that request still set, nobody armed a
    /// run for the work it left queued.
    fn rearm_if_stranded(&self) {
        if self.scheduler.is_halted() || self.scheduler.is_flushing() || !self.lifecycle.is_running() {
            return;
        }
        if !self.actions.is_empty() {
            tracing::trace!(runtime = %self.id, "Re-arming flush after rejected run");
            self.request_flush();
        }
    }

    fn unmount(&self) {
        if self.lifecycle.begin_unmount() {
            tracing::debug!(runtime = %self.id, "Unmount requested");
            self.finalize_unmount();
        }
    }

    /// Release the final subscription set. Whoever holds the cycle flag
    /// does this; if a cycle is running it calls back here on exit.
    fn finalize_unmount(&self) {
        if !self.scheduler.claim() {
            return;
        }
        let dropped_actions = self.actions.clear();
        let mut core = self.core.lock();
        let failures = core.active.release();
        let dropped_effects = core.effects.take().len();
        drop(core);
        self.stats.subscription_failures(failures);
        self.lifecycle.complete();
        tracing::info!(
            runtime = %self.id,
            dropped_actions,
            dropped_effects,
            "Runtime unmounted"
        );
    }
}

/// Mount `app` into the container behind `renderer`.
///
/// Runs `init` immediately. On failure the renderer shows a placeholder and
/// no cycle ever runs. On success the first cycle (initial subscriptions,
/// first render, init effect) is scheduled on `host`, so actions dispatched
/// right after mounting join that same cycle.
pub fn mount<P, R>(
    mut renderer: R,
    app: App<P>,
    host: Arc<dyn Host>,
    options: RuntimeOptions,
) -> Result<RuntimeHandle<P>, MountError>
where
    P: Program,
    R: Renderer<P::Tree>,
{
    let id = RuntimeId::new();
    let App {
        program,
        props,
        effects,
        subscriptions,
    } = app;

    let initial = match isolate(|| program.init()) {
        Ok(Ok(initial)) => initial,
        Ok(Err(err)) => {
            tracing::error!(runtime = %id, error = %err, "Init failed");
            renderer.show_failure(&err.to_string());
            return Err(err.into());
        }
        Err(panic) => {
            tracing::error!(runtime = %id, error = %panic, "Init panicked");
            renderer.show_failure(&panic);
            return Err(MountError::InitPanicked(panic));
        }
    };

    let lifecycle = Lifecycle::new();
    let stats = Stats::default();
    let mut effect_queue = EffectQueue::new();
    effect_queue.push(initial.effect);
    let subscription_count = subscriptions.len();

    let shared = Arc::new_cyclic(|weak: &Weak<Shared<P>>| {
        let sink: Weak<dyn ActionSink<P::Action>> = weak.clone();
        Shared {
            id,
            options,
            program,
            props,
            subscriptions,
            effects: EffectRunner {
                handler: effects,
                host: Arc::clone(&host),
                lifecycle: lifecycle.handle(),
                stats: stats.clone(),
                runtime_id: id,
            },
            host,
            dispatch: Dispatch::new(sink),
            actions: ActionQueue::new(),
            scheduler: Scheduler::new(),
            lifecycle,
            stats,
            snapshot: RwLock::new(Arc::clone(&initial.state)),
            core: Mutex::new(Core {
                state: initial.state,
                effects: effect_queue,
                active: ActiveSubscriptions::new(),
                renderer: Box::new(renderer),
                booting: true,
            }),
            self_ref: weak.clone(),
        }
    });

    tracing::info!(runtime = %id, subscriptions = subscription_count, "Runtime mounted");
    shared.request_flush();
    Ok(RuntimeHandle { shared })
}

/// Mount on the current tokio runtime with default options.
pub fn run<P, R>(renderer: R, app: App<P>) -> Result<RuntimeHandle<P>, MountError>
where
    P: Program,
    R: Renderer<P::Tree>,
{
    let host = TokioHost::current()?;
    mount(renderer, app, Arc::new(host), RuntimeOptions::default())
}

/// Owner handle for a mounted runtime. Dropping it unmounts.
pub struct RuntimeHandle<P: Program> {
    shared: Arc<Shared<P>>,
}

impl<P: Program> RuntimeHandle<P> {
    pub fn id(&self) -> RuntimeId {
        self.shared.id
    }

    pub fn dispatch(&self, action: P::Action) {
        self.shared.accept(action);
    }

    pub fn dispatcher(&self) -> Dispatch<P::Action> {
        self.shared.dispatch.clone()
    }

    /// Latest committed state.
    pub fn state(&self) -> Arc<P::State> {
        Arc::clone(&self.shared.snapshot.read())
    }

    pub fn stats(&self) -> CycleStats {
        self.shared.stats.snapshot()
    }

    pub fn phase(&self) -> Phase {
        self.shared.lifecycle.phase()
    }

    /// Whether a cycle body is executing right now.
    pub fn is_flushing(&self) -> bool {
        self.shared.scheduler.is_flushing()
    }

    /// Whether an update panic stopped this runtime.
    pub fn is_halted(&self) -> bool {
        self.shared.scheduler.is_halted()
    }

    /// Stop accepting actions, cancel in-flight effects and release the
    /// final subscription set. Idempotent.
    pub fn unmount(&self) {
        self.shared.unmount();
    }

    /// Resolves once teardown has released the final subscriptions.
    pub async fn unmounted(&self) {
        self.shared.lifecycle.handle().unmounted().await;
    }
}

impl<P: Program> Drop for RuntimeHandle<P> {
    fn drop(&mut self) {
        self.shared.unmount();
    }
}

/// Type-erased view of a mounted runtime, for code that juggles several
/// programs.
pub trait Mounted: Send + Sync {
    fn id(&self) -> RuntimeId;
    fn stats(&self) -> CycleStats;
    fn phase(&self) -> Phase;
    fn unmount(&self);
}

impl<P: Program> Mounted for RuntimeHandle<P> {
    fn id(&self) -> RuntimeId {
        RuntimeHandle::id(self)
    }

    fn stats(&self) -> CycleStats {
        RuntimeHandle::stats(self)
    }

    fn phase(&self) -> Phase {
        RuntimeHandle::phase(self)
    }

    fn unmount(&self) {
        RuntimeHandle::unmount(self)
    }
}
