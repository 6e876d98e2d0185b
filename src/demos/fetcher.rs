//! Async fetch demo: an effect simulates a slow API, and a subscription
//! ticks a clock only while a request is in flight.

use std::sync::Arc;
use std::time::Duration;

use futures_core::future::BoxFuture;
use tokio::runtime::Handle;

use crate::config::DemoConfig;
use crate::demos::node::Node;
use crate::program::{App, EffectHandler, Program, Transition};
use crate::runtime::{Cleanup, Dispatch, EffectError, InitError, Subscription, SubscriptionError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchState {
    pub data: Option<String>,
    pub error: Option<String>,
    pub loading: bool,
    /// Clock ticks seen during the current request.
    pub waited_ticks: u32,
    pub requests: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchAction {
    Fetch,
    Loaded(String),
    Failed(String),
    Tick,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchEffect {
    Request { attempt: u32 },
}

pub struct Fetcher;

impl Program for Fetcher {
    type State = FetchState;
    type Action = FetchAction;
    type Effect = FetchEffect;
    type Props = ();
    type Tree = Node;

    fn init(&self) -> Result<Transition<FetchState, FetchEffect>, InitError> {
        Ok(Transition::to(FetchState::default()))
    }

    fn update(&self, action: FetchAction, state: &Arc<FetchState>) -> Transition<FetchState, FetchEffect> {
        match action {
            FetchAction::Fetch if state.loading => Transition::unchanged(state),
            FetchAction::Fetch => {
                let attempt = state.requests + 1;
                Transition::to(FetchState {
                    loading: true,
                    waited_ticks: 0,
                    requests: attempt,
                    ..FetchState::clone(state)
                })
                .with_effect(FetchEffect::Request { attempt })
            }
            FetchAction::Loaded(data) => Transition::to(FetchState {
                data: Some(data),
                error: None,
                loading: false,
                ..FetchState::clone(state)
            }),
            FetchAction::Failed(error) => Transition::to(FetchState {
                error: Some(error),
                loading: false,
                ..FetchState::clone(state)
            }),
            FetchAction::Tick if state.loading => Transition::to(FetchState {
                waited_ticks: state.waited_ticks + 1,
                ..FetchState::clone(state)
            }),
            FetchAction::Tick => Transition::unchanged(state),
        }
    }

    fn view(&self, _props: &(), state: &Arc<FetchState>, dispatch: &Dispatch<FetchAction>) -> Node {
        let button = if state.loading {
            Node::button("Loading...", dispatch.callback(|| FetchAction::Fetch)).disabled_if(true)
        } else {
            Node::button("Fetch Data", dispatch.callback(|| FetchAction::Fetch))
        };

        let mut children = vec![button];
        if state.loading {
            children.push(Node::text(format!("Waiting... {} ticks", state.waited_ticks)));
        }
        if let Some(error) = &state.error {
            children.push(Node::alert(format!("Error: {error}")));
        }
        if let Some(data) = &state.data {
            children.push(Node::text(format!("Received: {data}")));
        }
        Node::column(children)
    }
}

/// Pretend API: answers after `delay`, failing every `fail_every`-th call.
pub struct SimulatedApi {
    pub delay: Duration,
    pub fail_every: u32,
}

impl SimulatedApi {
    fn answer(&self, attempt: u32) -> FetchAction {
        if self.fail_every > 0 && attempt % self.fail_every == 0 {
            FetchAction::Failed("Failed to fetch data!".to_string())
        } else {
            FetchAction::Loaded(format!("Data from request #{attempt}"))
        }
    }
}

impl EffectHandler<FetchEffect, FetchAction> for SimulatedApi {
    fn handle(
        &self,
        effect: FetchEffect,
        dispatch: Dispatch<FetchAction>,
    ) -> BoxFuture<'static, Result<(), EffectError>> {
        let FetchEffect::Request { attempt } = effect;
        let delay = self.delay;
        let answer = self.answer(attempt);
        Box::pin(async move {
            tracing::debug!(attempt, "Simulated request started");
            tokio::time::sleep(delay).await;
            dispatch.dispatch(answer);
            Ok(())
        })
    }
}

/// Ticks while a request is loading; installs nothing otherwise.
pub struct LoadingClock {
    pub period: Duration,
}

impl Subscription<FetchState, FetchAction> for LoadingClock {
    fn subscribe(
        &self,
        state: &Arc<FetchState>,
        dispatch: &Dispatch<FetchAction>,
    ) -> Result<Option<Cleanup>, SubscriptionError> {
        if !state.loading {
            return Ok(None);
        }
        let handle = Handle::try_current().map_err(|err| SubscriptionError::Setup(err.to_string()))?;
        let period = self.period;
        let dispatch = dispatch.clone();
        let task = handle.spawn(async move {
            loop {
                tokio::time::sleep(period).await;
                dispatch.dispatch(FetchAction::Tick);
            }
        });
        Ok(Some(Cleanup::abort(task)))
    }

    fn name(&self) -> &str {
        "loading-clock"
    }
}

pub fn fetcher_app(config: &DemoConfig) -> App<Fetcher> {
    App::new(Fetcher, ())
        .with_effects(SimulatedApi {
            delay: Duration::from_millis(config.fetch_delay_ms),
            fail_every: config.fetch_fail_every,
        })
        .with_subscription(LoadingClock {
            period: Duration::from_millis(config.tick_ms),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loading() -> Arc<FetchState> {
        Arc::new(FetchState {
            loading: true,
            requests: 1,
            ..FetchState::default()
        })
    }

    #[test]
    fn fetch_starts_request_once() {
        let idle = Arc::new(FetchState::default());
        let next = Fetcher.update(FetchAction::Fetch, &idle);
        assert!(next.state.loading);
        assert_eq!(next.effect, Some(FetchEffect::Request { attempt: 1 }));

        let busy = loading();
        let again = Fetcher.update(FetchAction::Fetch, &busy);
        assert!(again.is_unchanged_from(&busy));
        assert!(again.effect.is_none());
    }

    #[test]
    fn ticks_only_count_while_loading() {
        let busy = loading();
        assert_eq!(Fetcher.update(FetchAction::Tick, &busy).state.waited_ticks, 1);

        let idle = Arc::new(FetchState::default());
        assert!(Fetcher.update(FetchAction::Tick, &idle).is_unchanged_from(&idle));
    }

    #[test]
    fn results_end_loading() {
        let loaded = Fetcher.update(FetchAction::Loaded("x".into()), &loading()).state;
        assert_eq!(loaded.data.as_deref(), Some("x"));
        assert!(!loaded.loading);

        let failed = Fetcher.update(FetchAction::Failed("nope".into()), &loaded).state;
        assert_eq!(failed.error.as_deref(), Some("nope"));
        assert_eq!(failed.data.as_deref(), Some("x"));
    }

    #[test]
    fn every_nth_request_fails() {
        let api = SimulatedApi {
            delay: Duration::ZERO,
            fail_every: 3,
        };
        assert_eq!(api.answer(1), FetchAction::Loaded("Data from request #1".into()));
        assert_eq!(api.answer(3), FetchAction::Failed("Failed to fetch data!".into()));

        let never = SimulatedApi {
            delay: Duration::ZERO,
            fail_every: 0,
        };
        assert!(matches!(never.answer(3), FetchAction::Loaded(_)));
    }

    #[test]
    fn clock_is_idle_without_request() {
        let idle = Arc::new(FetchState::default());
        let cleanup = LoadingClock {
            period: Duration::from_millis(10),
        }
        .subscribe(&idle, &Dispatch::detached())
        .unwrap();
        assert!(cleanup.is_none());
    }

    #[test]
    fn paints_loading_and_results() {
        let busy = Fetcher.view(&(), &loading(), &Dispatch::detached());
        assert_eq!(busy.paint(), "[Loading...] (disabled)\nWaiting... 0 ticks\n");

        let done = Arc::new(FetchState {
            data: Some("hello".into()),
            error: Some("late".into()),
            ..FetchState::default()
        });
        assert_eq!(
            Fetcher.view(&(), &done, &Dispatch::detached()).paint(),
            "[Fetch Data]\n! Error: late\nReceived: hello\n"
        );
    }
}
