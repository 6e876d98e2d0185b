//! Unidirectional app-state runtime.
//!
//! A [`Program`] describes state, actions and effects; [`mount`] binds it to
//! a [`Renderer`] and drives it: dispatched actions are batched into cycles,
//! folded through `update`, rendered when the state changed, and effects are
//! launched as independent tasks.

pub mod component;
pub mod config;
pub mod demos;
pub mod logging;
pub mod program;
pub mod runtime;

pub use program::{App, EffectHandler, Program, Transition};
pub use runtime::{mount, run, Dispatch, Renderer, RuntimeHandle};
