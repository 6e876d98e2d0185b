//! Text-mode host renderer and a handle for driving what it shows.

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

use super::node::Node;
use crate::runtime::{RenderError, Renderer};

#[derive(Debug, thiserror::Error)]
pub enum ScreenError {
    #[error("Nothing rendered yet")]
    NoFrame,

    #[error("No button labelled '{label}' at position {}", .index + 1)]
    NoSuchButton { label: String, index: usize },

    #[error("Button '{label}' is disabled")]
    Disabled { label: String },

    #[error("No input field on screen")]
    NoInput,
}

/// Writes each committed tree as a numbered frame.
pub struct TextRenderer<W> {
    out: W,
    screen: Screen,
    frames: u64,
}

impl<W: Write + Send + 'static> TextRenderer<W> {
    pub fn new(out: W) -> (Self, Screen) {
        let screen = Screen::default();
        let renderer = Self {
            out,
            screen: screen.clone(),
            frames: 0,
        };
        (renderer, screen)
    }
}

impl<W: Write + Send + 'static> Renderer<Node> for TextRenderer<W> {
    fn render(&mut self, tree: Node) -> Result<(), RenderError> {
        let frame = self.frames + 1;
        write!(self.out, "── frame {frame} ──\n{}", tree.paint())?;
        self.out.flush()?;
        self.frames = frame;
        self.screen.show(tree);
        Ok(())
    }

    fn show_failure(&mut self, message: &str) {
        let placeholder = Node::alert(format!("Failed to start: {message}"));
        if let Err(err) = write!(self.out, "{}", placeholder.paint()).and_then(|()| self.out.flush()) {
            tracing::warn!(error = %err, "Could not write failure placeholder");
        }
        self.screen.show(placeholder);
    }
}

/// The tree currently on screen, shared with the renderer.
#[derive(Clone, Default)]
pub struct Screen {
    last: Arc<Mutex<Option<Node>>>,
}

impl Screen {
    fn show(&self, tree: Node) {
        *self.last.lock() = Some(tree);
    }

    pub fn has_frame(&self) -> bool {
        self.last.lock().is_some()
    }

    /// Painted text of the current frame, empty before the first one.
    pub fn text(&self) -> String {
        self.last.lock().as_ref().map(Node::paint).unwrap_or_default()
    }

    pub fn click(&self, label: &str) -> Result<(), ScreenError> {
        self.click_nth(label, 0)
    }

    /// Click the `index`-th (0-based) button labelled `label`.
    pub fn click_nth(&self, label: &str, index: usize) -> Result<(), ScreenError> {
        let on_click = {
            let last = self.last.lock();
            let tree = last.as_ref().ok_or(ScreenError::NoFrame)?;
            let button = tree
                .buttons(label)
                .into_iter()
                .nth(index)
                .ok_or_else(|| ScreenError::NoSuchButton {
                    label: label.to_string(),
                    index,
                })?;
            match (&button.on_click, button.disabled) {
                (Some(on_click), false) => Arc::clone(on_click),
                _ => {
                    return Err(ScreenError::Disabled {
                        label: label.to_string(),
                    })
                }
            }
        };
        // Lock released first: a synchronous host may render inside the handler.
        on_click();
        Ok(())
    }

    /// Replace the text of the first input field.
    pub fn type_text(&self, text: &str) -> Result<(), ScreenError> {
        let on_input = {
            let last = self.last.lock();
            let tree = last.as_ref().ok_or(ScreenError::NoFrame)?;
            tree.first_input()
                .and_then(|input| input.on_input.clone())
                .ok_or(ScreenError::NoInput)?
        };
        on_input(text.to_string());
        Ok(())
    }
}
