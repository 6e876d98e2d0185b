//! Error types for the runtime and its collaborators.
//!
//! Only [`MountError`] ever escapes to the caller. The others are reported
//! by impure collaborators, logged by the phase that ran them, and counted
//! in [`CycleStats`](super::CycleStats).

use thiserror::Error;

/// Failure raised by `Program::init`.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct InitError {
    message: String,
}

impl InitError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors that prevent a runtime from starting.
#[derive(Debug, Error)]
pub enum MountError {
    /// `init` failed; the container shows a placeholder.
    #[error("Initialization failed: {0}")]
    Init(#[from] InitError),

    /// `init` panicked.
    #[error("Initialization panicked: {0}")]
    InitPanicked(String),

    /// `mount` was called outside a tokio runtime.
    #[error("No async runtime available: {0}")]
    NoHost(String),
}

/// Failure painting a tree into the container.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Render I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Renderer rejected tree: {0}")]
    Rejected(String),

    #[error("View or renderer panicked: {0}")]
    Panicked(String),
}

/// Failure setting up or tearing down one subscription.
#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("Subscription setup failed: {0}")]
    Setup(String),

    #[error("Subscription cleanup failed: {0}")]
    Cleanup(String),

    #[error("Subscription panicked: {0}")]
    Panicked(String),
}

/// Failure reported by an effect handler.
#[derive(Debug, Error)]
pub enum EffectError {
    #[error("Effect failed: {0}")]
    Failed(String),

    #[error("No effect handler installed")]
    Unhandled,

    #[error("Effect panicked: {0}")]
    Panicked(String),
}

impl EffectError {
    pub fn failed(message: impl std::fmt::Display) -> Self {
        EffectError::Failed(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_error_converts_into_mount_error() {
        let err: MountError = InitError::new("bad seed").into();
        assert_eq!(err.to_string(), "Initialization failed: bad seed");
    }

    #[test]
    fn effect_error_from_display() {
        let err = EffectError::failed(42);
        assert_eq!(err.to_string(), "Effect failed: 42");
    }
}
