use crate::component::Component;
use crate::demos::node::Node;

/// Props handed in by whoever mounts the greeter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreeterProps {
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Greeter {
    pub clicks: u32,
}

pub type GreeterComponent = Component<Greeter, GreeterProps, Node>;

pub fn greeter() -> GreeterComponent {
    Component::new(
        Greeter::default(),
        |updater, state: &Greeter, props: &GreeterProps| {
            let clicks = state.clicks;
            Node::column(vec![
                Node::heading(format!("Hello, {}!", props.name)),
                Node::text(format!("You clicked the button {clicks} times.")),
                Node::button(
                    "Click Me",
                    updater.handler(move || Some(Greeter { clicks: clicks + 1 })),
                ),
            ])
        },
    )
}
