//! Application-side primitives for the unidirectional runtime.
//!
//! # Architecture
//!
//! ```text
//! Action ──→ update ──→ State ──→ view ──→ Tree
//!    ↑          │                  │
//!    │       Effect            Dispatch
//!    └──────────┴──────────────────┘
//! ```
//!
//! - **State**: immutable value held behind an `Arc`; pointer identity is the
//!   only change signal
//! - **Action**: intent produced by the view, effects or subscriptions
//! - **update**: pure transition `(Action, State) -> (State, Option<Effect>)`
//! - **view**: pure projection of state into a renderable tree

mod app;
mod transition;

use std::sync::Arc;

pub use app::{App, EffectHandler, Unhandled};
pub use transition::Transition;

use crate::runtime::{Dispatch, InitError};

/// The pure half of an application.
///
/// Effects, subscriptions and rendering are supplied separately (see
/// [`App`]) so this trait only ever describes deterministic code.
pub trait Program: Send + Sync + 'static {
    type State: Send + Sync + 'static;
    type Action: Send + 'static;
    type Effect: Send + 'static;
    /// Root props handed to every `view` call.
    type Props: Send + Sync + 'static;
    /// Renderable tree produced by `view`.
    type Tree: Send + 'static;

    /// Produce the initial state and an optional startup effect.
    ///
    /// Failure here aborts the mount and leaves the container showing a
    /// placeholder.
    fn init(&self) -> Result<Transition<Self::State, Self::Effect>, InitError>;

    /// Apply one action to the current state.
    ///
    /// Returning `Transition::unchanged(state)` (the same `Arc`) means nothing
    /// changed; no render and no subscription rebuild follow.
    fn update(
        &self,
        action: Self::Action,
        state: &Arc<Self::State>,
    ) -> Transition<Self::State, Self::Effect>;

    fn view(
        &self,
        props: &Self::Props,
        state: &Arc<Self::State>,
        dispatch: &Dispatch<Self::Action>,
    ) -> Self::Tree;
}
