//! Shared test utilities: a recording renderer, a hand-driven host and a
//! small counter program.

#![allow(dead_code, unused_imports)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_core::future::BoxFuture;
use parking_lot::Mutex;
use tickflow::runtime::{
    Dispatch, EffectError, Host, InitError, RenderError, Renderer, Task,
};
use tickflow::{App, Program, Transition};

/// Let deferred flushes and ready effect tasks run. With paused time the
/// clock only advances once every task is idle.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

/// Append-only log shared between a test and the code under test.
#[derive(Clone, Default)]
pub struct Log {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Log {
    pub fn push(&self, entry: impl Into<String>) {
        self.entries.lock().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

/// What a [`RecordingRenderer`] has seen, readable from the test.
#[derive(Clone)]
pub struct Recording<T> {
    frames: Arc<Mutex<Vec<T>>>,
    failing: Arc<AtomicBool>,
    placeholder: Arc<Mutex<Option<String>>>,
}

impl<T: Clone> Recording<T> {
    pub fn frames(&self) -> Vec<T> {
        self.frames.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.frames.lock().len()
    }

    pub fn last(&self) -> Option<T> {
        self.frames.lock().last().cloned()
    }

    /// Make every following render fail (or succeed again).
    pub fn fail_renders(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn placeholder(&self) -> Option<String> {
        self.placeholder.lock().clone()
    }
}

pub struct RecordingRenderer<T> {
    recording: Recording<T>,
}

pub fn recorder<T>() -> (RecordingRenderer<T>, Recording<T>) {
    let recording = Recording {
        frames: Arc::new(Mutex::new(Vec::new())),
        failing: Arc::new(AtomicBool::new(false)),
        placeholder: Arc::new(Mutex::new(None)),
    };
    let renderer = RecordingRenderer {
        recording: Recording {
            frames: Arc::clone(&recording.frames),
            failing: Arc::clone(&recording.failing),
            placeholder: Arc::clone(&recording.placeholder),
        },
    };
    (renderer, recording)
}

impl<T: Send + 'static> Renderer<T> for RecordingRenderer<T> {
    fn render(&mut self, tree: T) -> Result<(), RenderError> {
        if self.recording.failing.load(Ordering::SeqCst) {
            return Err(RenderError::Rejected("container detached".into()));
        }
        self.recording.frames.lock().push(tree);
        Ok(())
    }

    fn show_failure(&mut self, message: &str) {
        *self.recording.placeholder.lock() = Some(message.to_string());
    }
}

/// Host whose deferred tasks only run when the test says so. Effects still
/// go to tokio.
#[derive(Default)]
pub struct ManualHost {
    deferred: Mutex<VecDeque<Task>>,
}

impl ManualHost {
    pub fn pending(&self) -> usize {
        self.deferred.lock().len()
    }

    /// Run the oldest deferred task. The lock is not held while it runs.
    pub fn run_next(&self) -> bool {
        let task = self.deferred.lock().pop_front();
        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }

    /// Run deferred tasks until none are left, including ones queued along
    /// the way.
    pub fn run_all(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
        }
        ran
    }
}

impl Host for ManualHost {
    fn defer(&self, task: Task) {
        self.deferred.lock().push_back(task);
    }

    fn spawn(&self, future: BoxFuture<'static, ()>) {
        tokio::spawn(future);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Increment,
    Add(i64),
    /// Replace the state with a new value, even an equal one.
    Set(i64),
    Noop,
    /// Keep the state, emit the job.
    Run(Job),
    /// Bump the state and emit the job.
    IncrementAnd(Job),
    Explode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    /// Dispatch `Set(value)` after `delay_ms`.
    Deliver { delay_ms: u64, value: i64 },
    /// Dispatch `Add(value)` right away, before the future is polled.
    Echo(i64),
    Fail,
    /// Panics after its first yield, once the task is already running.
    Crash,
    /// Never completes.
    Hang,
}

/// Counter over `i64`; the tree is the state itself. Every `update` call is
/// logged as `"<action>@<state>"`.
pub struct Counter {
    pub updates: Log,
}

impl Program for Counter {
    type State = i64;
    type Action = Msg;
    type Effect = Job;
    type Props = ();
    type Tree = i64;

    fn init(&self) -> Result<Transition<i64, Job>, InitError> {
        Ok(Transition::to(0))
    }

    fn update(&self, action: Msg, state: &Arc<i64>) -> Transition<i64, Job> {
        self.updates.push(format!("{action:?}@{state}"));
        match action {
            Msg::Increment => Transition::to(**state + 1),
            Msg::Add(n) => Transition::to(**state + n),
            Msg::Set(n) => Transition::to(n),
            Msg::Noop => Transition::unchanged(state),
            Msg::Run(job) => Transition::unchanged(state).with_effect(job),
            Msg::IncrementAnd(job) => Transition::to(**state + 1).with_effect(job),
            Msg::Explode => panic!("update exploded"),
        }
    }

    fn view(&self, _props: &(), state: &Arc<i64>, _dispatch: &Dispatch<Msg>) -> i64 {
        **state
    }
}

/// Effect handler for [`Job`]; logs `"start <job>"` when a job is launched.
pub fn job_runner(
    launched: Log,
) -> impl Fn(Job, Dispatch<Msg>) -> BoxFuture<'static, Result<(), EffectError>> + Send + Sync + 'static {
    move |job: Job, dispatch: Dispatch<Msg>| {
        launched.push(format!("start {job:?}"));
        if let Job::Echo(value) = job {
            dispatch.dispatch(Msg::Add(value));
        }
        let work: BoxFuture<'static, Result<(), EffectError>> = Box::pin(async move {
            match job {
                Job::Deliver { delay_ms, value } => {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    dispatch.dispatch(Msg::Set(value));
                    Ok(())
                }
                Job::Echo(_) => Ok(()),
                Job::Fail => Err(EffectError::failed("backend down")),
                Job::Crash => {
                    tokio::task::yield_now().await;
                    panic!("effect exploded")
                }
                Job::Hang => std::future::pending().await,
            }
        });
        work
    }
}

/// Counter app with the job runner installed. Returns the update log and
/// the effect launch log.
pub fn counter_app() -> (App<Counter>, Log, Log) {
    let updates = Log::default();
    let launched = Log::default();
    let app = App::new(
        Counter {
            updates: updates.clone(),
        },
        (),
    )
    .with_effects(job_runner(launched.clone()));
    (app, updates, launched)
}
