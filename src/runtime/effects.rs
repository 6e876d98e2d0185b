//! Effect runner: launches every effect of a batch as its own task.
//!
//! Handlers are started in queue order but never awaited by the cycle, so
//! effects race each other. Each task also listens for unmount and is
//! dropped when teardown starts. A panic while polling the handler future
//! is reported like any other effect failure.

use std::sync::Arc;

use super::dispatch::Dispatch;
use super::host::Host;
use super::error::EffectError;
use super::isolate::{isolate, isolate_future};
use super::lifecycle::LifecycleHandle;
use super::stats::Stats;
use super::RuntimeId;
use crate::program::EffectHandler;

pub(crate) struct EffectRunner<E, A> {
    pub handler: Arc<dyn EffectHandler<E, A>>,
    pub host: Arc<dyn Host>,
    pub lifecycle: LifecycleHandle,
    pub stats: Stats,
    pub runtime_id: RuntimeId,
}

impl<E: Send + 'static, A: 'static> EffectRunner<E, A> {
    pub fn launch(&self, effects: Vec<E>, dispatch: &Dispatch<A>) {
        for (index, effect) in effects.into_iter().enumerate() {
            self.stats.effect_launched();
            let pending = match isolate(|| self.handler.handle(effect, dispatch.clone())) {
                Ok(pending) => pending,
                Err(panic) => {
                    self.stats.effect_failure();
                    tracing::warn!(
                        runtime = %self.runtime_id,
                        effect = index,
                        error = %panic,
                        "Effect handler panicked before starting"
                    );
                    continue;
                }
            };
            let lifecycle = self.lifecycle.clone();
            let stats = self.stats.clone();
            let runtime_id = self.runtime_id;

            self.host.spawn(Box::pin(async move {
                tokio::select! {
                    result = isolate_future(pending) => {
                        let outcome = result.unwrap_or_else(|panic| Err(EffectError::Panicked(panic)));
                        if let Err(err) = outcome {
                            stats.effect_failure();
                            tracing::warn!(
                                runtime = %runtime_id,
                                effect = index,
                                error = %err,
                                "Effect handler failed"
                            );
                        }
                    }
                    _ = lifecycle.unmounting() => {
                        stats.effect_cancelled();
                        tracing::trace!(runtime = %runtime_id, effect = index, "Effect cancelled by unmount");
                    }
                }
            }));
        }
    }
}
