use std::sync::Arc;

use crate::component::Component;
use crate::demos::node::Node;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoState {
    pub todos: Vec<String>,
    pub new_todo: String,
}

impl TodoState {
    /// Append the draft; `None` when it is blank.
    fn add(&self) -> Option<TodoState> {
        if self.new_todo.trim().is_empty() {
            return None;
        }
        let mut todos = self.todos.clone();
        todos.push(self.new_todo.clone());
        Some(TodoState {
            todos,
            new_todo: String::new(),
        })
    }

    fn remove(&self, index: usize) -> TodoState {
        let todos = self
            .todos
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, todo)| todo.clone())
            .collect();
        TodoState {
            todos,
            new_todo: self.new_todo.clone(),
        }
    }

    fn edit(&self, text: String) -> TodoState {
        TodoState {
            todos: self.todos.clone(),
            new_todo: text,
        }
    }
}

pub type TodoComponent = Component<TodoState, (), Node>;

pub fn todo() -> TodoComponent {
    Component::new(TodoState::default(), |updater, state: &TodoState, _: &()| {
        let current = Arc::new(state.clone());

        let rows = (0..state.todos.len())
            .map(|index| {
                let current = Arc::clone(&current);
                Node::row(vec![
                    Node::text(state.todos[index].clone()),
                    Node::button("Remove", updater.handler(move || Some(current.remove(index)))),
                ])
            })
            .collect();

        let on_input = {
            let current = Arc::clone(&current);
            updater.input_handler(move |text| Some(current.edit(text)))
        };

        Node::column(vec![
            Node::input(state.new_todo.clone(), on_input),
            Node::button("Add Todo", updater.handler(move || current.add())),
            Node::list(rows),
        ])
    })
}
