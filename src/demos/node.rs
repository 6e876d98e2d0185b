//! Minimal UI tree for the demo apps.

use crate::runtime::{Callback, InputCallback};

pub struct Button {
    pub label: String,
    pub disabled: bool,
    pub on_click: Option<Callback>,
}

pub struct Input {
    pub value: String,
    pub on_input: Option<InputCallback>,
}

pub enum Node {
    Column(Vec<Node>),
    /// Children painted on one line.
    Row(Vec<Node>),
    List(Vec<Node>),
    Heading(String),
    Text(String),
    Alert(String),
    Button(Button),
    Input(Input),
    Empty,
}

impl Node {
    pub fn column(children: Vec<Node>) -> Self {
        Node::Column(children)
    }

    pub fn row(children: Vec<Node>) -> Self {
        Node::Row(children)
    }

    pub fn list(items: Vec<Node>) -> Self {
        Node::List(items)
    }

    pub fn heading(text: impl Into<String>) -> Self {
        Node::Heading(text.into())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn alert(text: impl Into<String>) -> Self {
        Node::Alert(text.into())
    }

    pub fn button(label: impl Into<String>, on_click: Callback) -> Self {
        Node::Button(Button {
            label: label.into(),
            disabled: false,
            on_click: Some(on_click),
        })
    }

    pub fn input(value: impl Into<String>, on_input: InputCallback) -> Self {
        Node::Input(Input {
            value: value.into(),
            on_input: Some(on_input),
        })
    }

    /// Disable this node if it is a button and `disabled` holds.
    pub fn disabled_if(mut self, disabled: bool) -> Self {
        if let Node::Button(button) = &mut self {
            button.disabled = disabled;
        }
        self
    }

    /// Render the tree as text, one line per block node.
    pub fn paint(&self) -> String {
        let mut out = String::new();
        self.paint_into(&mut out);
        out
    }

    fn paint_into(&self, out: &mut String) {
        match self {
            Node::Column(children) => {
                for child in children {
                    child.paint_into(out);
                }
            }
            Node::List(items) => {
                for item in items {
                    out.push_str("- ");
                    out.push_str(&item.inline());
                    out.push('\n');
                }
            }
            Node::Empty => {}
            other => {
                out.push_str(&other.inline());
                out.push('\n');
            }
        }
    }

    fn inline(&self) -> String {
        match self {
            Node::Heading(text) => format!("# {text}"),
            Node::Text(text) => text.clone(),
            Node::Alert(text) => format!("! {text}"),
            Node::Button(button) if button.disabled => format!("[{}] (disabled)", button.label),
            Node::Button(button) => format!("[{}]", button.label),
            Node::Input(input) => format!("> {}_", input.value),
            Node::Column(children) | Node::Row(children) | Node::List(children) => children
                .iter()
                .map(Node::inline)
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
            Node::Empty => String::new(),
        }
    }

    /// Buttons labelled `label`, in document order.
    pub fn buttons<'a>(&'a self, label: &str) -> Vec<&'a Button> {
        let mut found = Vec::new();
        self.walk(&mut |node| {
            if let Node::Button(button) = node {
                if button.label == label {
                    found.push(button);
                }
            }
        });
        found
    }

    pub fn first_input(&self) -> Option<&Input> {
        let mut found = None;
        self.walk(&mut |node| {
            if found.is_none() {
                if let Node::Input(input) = node {
                    found = Some(input);
                }
            }
        });
        found
    }

    fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Node)) {
        visit(self);
        if let Node::Column(children) | Node::Row(children) | Node::List(children) = self {
            for child in children {
                child.walk(visit);
            }
        }
    }
}
