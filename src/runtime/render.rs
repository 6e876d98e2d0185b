//! Render trigger and the host renderer boundary.

use std::sync::Arc;

use super::dispatch::Dispatch;
use super::error::RenderError;
use super::isolate::isolate;
use crate::program::Program;

/// Host renderer bound to one mount container.
pub trait Renderer<T>: Send + 'static {
    /// Paint `tree` into the container. On failure the container keeps
    /// showing the previous tree.
    fn render(&mut self, tree: T) -> Result<(), RenderError>;

    /// Replace the container contents with a failure placeholder. Called
    /// once when `init` fails.
    fn show_failure(&mut self, message: &str) {
        tracing::error!(message, "Mount failed");
    }
}

/// Call `view` and hand the tree to the renderer, keeping any failure
/// (error or panic) local to this call.
pub(crate) fn render_state<P: Program>(
    program: &P,
    props: &P::Props,
    state: &Arc<P::State>,
    dispatch: &Dispatch<P::Action>,
    renderer: &mut dyn Renderer<P::Tree>,
) -> Result<(), RenderError> {
    isolate(|| {
        let tree = program.view(props, state, dispatch);
        renderer.render(tree)
    })
    .unwrap_or_else(|panic| Err(RenderError::Panicked(panic)))
}
