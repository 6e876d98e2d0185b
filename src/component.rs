//! Hook-style component wrapper.
//!
//! For small widgets that do not want to spell out actions and effects: the
//! render function receives an [`Updater`] whose handlers compute a
//! replacement state, either synchronously or from a future. `Some(state)`
//! replaces the state, `None` leaves it alone.
//!
//! Everything still runs through the regular runtime: a handler dispatches a
//! [`Change`], `update` applies it, async producers run as effects.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use futures_core::future::BoxFuture;

use crate::program::{App, EffectHandler, Program, Transition};
use crate::runtime::{Callback, Dispatch, EffectError, InitError, InputCallback};

/// Future producing an optional replacement state.
pub type Pending<S> = BoxFuture<'static, Option<S>>;

/// Action type of a [`Component`].
pub enum Change<S> {
    Replace(S),
    Await(Pending<S>),
}

/// Handle given to the render function for building event handlers.
pub struct Updater<S> {
    dispatch: Dispatch<Change<S>>,
}

impl<S> Clone for Updater<S> {
    fn clone(&self) -> Self {
        Self {
            dispatch: self.dispatch.clone(),
        }
    }
}

impl<S: Send + Sync + 'static> Updater<S> {
    pub fn set(&self, state: S) {
        self.dispatch.dispatch(Change::Replace(state));
    }

    /// Click handler computing the next state synchronously.
    pub fn handler<F>(&self, compute: F) -> Callback
    where
        F: Fn() -> Option<S> + Send + Sync + 'static,
    {
        let dispatch = self.dispatch.clone();
        Arc::new(move || {
            if let Some(state) = compute() {
                dispatch.dispatch(Change::Replace(state));
            }
        })
    }

    /// Click handler whose next state comes from a future.
    pub fn handler_async<F, Fut>(&self, compute: F) -> Callback
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<S>> + Send + 'static,
    {
        let dispatch = self.dispatch.clone();
        Arc::new(move || dispatch.dispatch(Change::Await(Box::pin(compute()))))
    }

    /// Input handler computing the next state from the new text.
    pub fn input_handler<F>(&self, compute: F) -> InputCallback
    where
        F: Fn(String) -> Option<S> + Send + Sync + 'static,
    {
        let dispatch = self.dispatch.clone();
        Arc::new(move |text| {
            if let Some(state) = compute(text) {
                dispatch.dispatch(Change::Replace(state));
            }
        })
    }
}

type RenderFn<S, P, T> = dyn Fn(&Updater<S>, &S, &P) -> T + Send + Sync;

/// A program made of an initial state and a render function.
pub struct Component<S, P, T> {
    initial: Arc<S>,
    render: Box<RenderFn<S, P, T>>,
    _props: PhantomData<fn(&P)>,
}

impl<S, P, T> Component<S, P, T>
where
    S: Send + Sync + 'static,
    P: Send + Sync + 'static,
    T: Send + 'static,
{
    pub fn new<F>(initial: S, render: F) -> Self
    where
        F: Fn(&Updater<S>, &S, &P) -> T + Send + Sync + 'static,
    {
        Self {
            initial: Arc::new(initial),
            render: Box::new(render),
            _props: PhantomData,
        }
    }

    /// Bundle with the effect handler that resolves async producers.
    pub fn into_app(self, props: P) -> App<Self> {
        App::new(self, props).with_effects(Resolve)
    }
}

impl<S, P, T> Program for Component<S, P, T>
where
    S: Send + Sync + 'static,
    P: Send + Sync + 'static,
    T: Send + 'static,
{
    type State = S;
    type Action = Change<S>;
    type Effect = Pending<S>;
    type Props = P;
    type Tree = T;

    fn init(&self) -> Result<Transition<S, Pending<S>>, InitError> {
        Ok(Transition::to_shared(Arc::clone(&self.initial)))
    }

    fn update(&self, action: Change<S>, state: &Arc<S>) -> Transition<S, Pending<S>> {
        match action {
            Change::Replace(next) => Transition::to(next),
            Change::Await(pending) => Transition::unchanged(state).with_effect(pending),
        }
    }

    fn view(&self, props: &P, state: &Arc<S>, dispatch: &Dispatch<Change<S>>) -> T {
        let updater = Updater {
            dispatch: dispatch.clone(),
        };
        (self.render)(&updater, state, props)
    }
}

/// Awaits a pending producer and applies its result.
struct Resolve;

impl<S: Send + 'static> EffectHandler<Pending<S>, Change<S>> for Resolve {
    fn handle(
        &self,
        pending: Pending<S>,
        dispatch: Dispatch<Change<S>>,
    ) -> BoxFuture<'static, Result<(), EffectError>> {
        Box::pin(async move {
            if let Some(state) = pending.await {
                dispatch.dispatch(Change::Replace(state));
            }
            Ok(())
        })
    }
}
