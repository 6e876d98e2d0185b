mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{counter_app, recorder, settle, Log, ManualHost, Msg};
use tickflow::runtime::{Cleanup, Dispatch, RuntimeOptions, Subscription, SubscriptionError};
use tickflow::{mount, run};

/// Subscription that logs `"<name>+<state>"` on setup and `"<name>-<state>"`
/// on cleanup.
struct Tracked {
    name: &'static str,
    log: Log,
}

impl Subscription<i64, Msg> for Tracked {
    fn subscribe(&self, state: &Arc<i64>, _dispatch: &Dispatch<Msg>) -> Result<Option<Cleanup>, SubscriptionError> {
        let name = self.name;
        let value = **state;
        let log = self.log.clone();
        log.push(format!("{name}+{value}"));
        Ok(Some(Cleanup::new(move || log.push(format!("{name}-{value}")))))
    }

    fn name(&self) -> &str {
        self.name
    }
}

fn tracked(name: &'static str, log: &Log) -> Tracked {
    Tracked {
        name,
        log: log.clone(),
    }
}

#[test]
fn cleanups_run_in_install_order_before_resubscribing() {
    let host = Arc::new(ManualHost::default());
    let log = Log::default();
    let (renderer, _recording) = recorder();
    let (app, _, _) = counter_app();
    let app = app
        .with_subscription(tracked("a", &log))
        .with_subscription(tracked("b", &log))
        .with_subscription(tracked("c", &log));
    let runtime = mount(renderer, app, host.clone(), RuntimeOptions::default()).unwrap();

    host.run_all();
    assert_eq!(log.entries(), vec!["a+0", "b+0", "c+0"]);
    log.clear();

    runtime.dispatch(Msg::Increment);
    host.run_all();
    assert_eq!(
        log.entries(),
        vec!["a-0", "b-0", "c-0", "a+1", "b+1", "c+1"]
    );
}

#[test]
fn unchanged_state_keeps_subscriptions() {
    let host = Arc::new(ManualHost::default());
    let log = Log::default();
    let (renderer, _recording) = recorder();
    let (app, _, _) = counter_app();
    let app = app.with_subscription(tracked("a", &log));
    let runtime = mount(renderer, app, host.clone(), RuntimeOptions::default()).unwrap();
    host.run_all();
    log.clear();

    runtime.dispatch(Msg::Noop);
    host.run_all();
    assert!(log.entries().is_empty());
}

#[test]
fn failing_factory_is_skipped() {
    let host = Arc::new(ManualHost::default());
    let log = Log::default();
    let (renderer, recording) = recorder();
    let (app, _, _) = counter_app();
    let app = app
        .with_subscription(tracked("a", &log))
        .with_subscription(
            |_: &Arc<i64>, _: &Dispatch<Msg>| -> Result<Option<Cleanup>, SubscriptionError> {
                Err(SubscriptionError::Setup("socket refused".into()))
            },
        )
        .with_subscription(
            |_: &Arc<i64>, _: &Dispatch<Msg>| -> Result<Option<Cleanup>, SubscriptionError> {
                panic!("listener exploded")
            },
        )
        .with_subscription(tracked("d", &log));
    let runtime = mount(renderer, app, host.clone(), RuntimeOptions::default()).unwrap();

    host.run_all();
    assert_eq!(log.entries(), vec!["a+0", "d+0"]);
    assert_eq!(recording.frames(), vec![0], "render still happens");
    assert_eq!(runtime.stats().subscription_failures, 2);

    log.clear();
    runtime.dispatch(Msg::Increment);
    host.run_all();
    assert_eq!(log.entries(), vec!["a-0", "d-0", "a+1", "d+1"]);
}

#[test]
fn failing_cleanup_does_not_block_the_rest() {
    let host = Arc::new(ManualHost::default());
    let log = Log::default();
    let (renderer, _recording) = recorder();
    let (app, _, _) = counter_app();
    let app = app
        .with_subscription(
            |_: &Arc<i64>, _: &Dispatch<Msg>| -> Result<Option<Cleanup>, SubscriptionError> {
                Ok(Some(Cleanup::fallible(|| {
                    Err(SubscriptionError::Cleanup("already closed".into()))
                })))
            },
        )
        .with_subscription(
            |_: &Arc<i64>, _: &Dispatch<Msg>| -> Result<Option<Cleanup>, SubscriptionError> {
                Ok(Some(Cleanup::new(|| panic!("cleanup exploded"))))
            },
        )
        .with_subscription(tracked("c", &log));
    let runtime = mount(renderer, app, host.clone(), RuntimeOptions::default()).unwrap();
    host.run_all();
    log.clear();

    runtime.dispatch(Msg::Increment);
    host.run_all();
    assert_eq!(log.entries(), vec!["c-0", "c+1"]);
    assert_eq!(runtime.stats().subscription_failures, 2);
}

#[test]
fn subscription_only_installs_when_state_asks_for_it() {
    let host = Arc::new(ManualHost::default());
    let log = Log::default();
    let seen = log.clone();
    let (renderer, _recording) = recorder();
    let (app, _, _) = counter_app();
    let app = app.with_subscription(
        move |state: &Arc<i64>, _: &Dispatch<Msg>| -> Result<Option<Cleanup>, SubscriptionError> {
            if **state % 2 == 0 {
                return Ok(None);
            }
            let log = seen.clone();
            let value = **state;
            log.push(format!("odd+{value}"));
            Ok(Some(Cleanup::new(move || log.push(format!("odd-{value}")))))
        },
    );
    let runtime = mount(renderer, app, host.clone(), RuntimeOptions::default()).unwrap();

    for _ in 0..3 {
        runtime.dispatch(Msg::Increment);
        host.run_all();
    }
    assert_eq!(log.entries(), vec!["odd+1", "odd-1", "odd+3"]);
}

#[tokio::test(start_paused = true)]
async fn subscription_task_dispatches_until_released() {
    let (renderer, recording) = recorder();
    let (app, _, _) = counter_app();
    let app = app.with_subscription(
        |state: &Arc<i64>, dispatch: &Dispatch<Msg>| -> Result<Option<Cleanup>, SubscriptionError> {
            if **state >= 3 {
                return Ok(None);
            }
            let dispatch = dispatch.clone();
            let task = tokio::spawn(async move {
                loop {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    dispatch.dispatch(Msg::Increment);
                }
            });
            Ok(Some(Cleanup::abort(task)))
        },
    );
    let runtime = run(renderer, app).unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;
    settle().await;

    assert_eq!(*runtime.state(), 3);
    assert_eq!(recording.frames(), vec![0, 1, 2, 3]);
}
