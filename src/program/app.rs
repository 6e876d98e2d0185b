//! Mount bundle: the pure program plus its impure collaborators.

use std::future::Future;
use std::sync::Arc;

use futures_core::future::BoxFuture;

use super::Program;
use crate::runtime::{Dispatch, EffectError, Subscription};

/// Executes effects produced by `update`.
///
/// The returned future runs on its own task; the runtime never awaits it
/// inside a cycle. Any actions it wants to feed back go through `dispatch`.
pub trait EffectHandler<E, A>: Send + Sync + 'static {
    fn handle(&self, effect: E, dispatch: Dispatch<A>) -> BoxFuture<'static, Result<(), EffectError>>;
}

impl<E, A, F, Fut> EffectHandler<E, A> for F
where
    F: Fn(E, Dispatch<A>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), EffectError>> + Send + 'static,
{
    fn handle(&self, effect: E, dispatch: Dispatch<A>) -> BoxFuture<'static, Result<(), EffectError>> {
        Box::pin(self(effect, dispatch))
    }
}

/// Default handler for apps that never produce effects.
///
/// Every effect it receives is reported as a failure so a forgotten
/// `with_effects` shows up in the logs.
pub struct Unhandled;

impl<E: Send + 'static, A> EffectHandler<E, A> for Unhandled {
    fn handle(&self, _effect: E, _dispatch: Dispatch<A>) -> BoxFuture<'static, Result<(), EffectError>> {
        Box::pin(async { Err(EffectError::Unhandled) })
    }
}

/// Everything `mount` needs besides the renderer and host.
pub struct App<P: Program> {
    pub(crate) program: P,
    pub(crate) props: P::Props,
    pub(crate) effects: Arc<dyn EffectHandler<P::Effect, P::Action>>,
    pub(crate) subscriptions: Vec<Arc<dyn Subscription<P::State, P::Action>>>,
}

impl<P: Program> App<P> {
    pub fn new(program: P, props: P::Props) -> Self {
        Self {
            program,
            props,
            effects: Arc::new(Unhandled),
            subscriptions: Vec::new(),
        }
    }

    pub fn with_effects<H>(mut self, handler: H) -> Self
    where
        H: EffectHandler<P::Effect, P::Action>,
    {
        self.effects = Arc::new(handler);
        self
    }

    /// Append a subscription factory. Order is install order and stays
    /// fixed for the lifetime of the mount.
    pub fn with_subscription<Sub>(mut self, subscription: Sub) -> Self
    where
        Sub: Subscription<P::State, P::Action>,
    {
        self.subscriptions.push(Arc::new(subscription));
        self
    }

    pub fn program(&self) -> &P {
        &self.program
    }
}
