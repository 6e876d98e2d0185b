use crate::component::Component;
use crate::demos::node::Node;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counter {
    pub count: i64,
}

pub type CounterComponent = Component<Counter, (), Node>;

pub fn counter() -> CounterComponent {
    Component::new(Counter::default(), |updater, state: &Counter, _: &()| {
        let count = state.count;
        Node::row(vec![
            Node::button("-1", updater.handler(move || Some(Counter { count: count - 1 }))),
            Node::text(count.to_string()),
            Node::button("+1", updater.handler(move || Some(Counter { count: count + 1 }))),
        ])
    })
}
