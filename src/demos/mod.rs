//! Demo apps mounted by the `tickflow` binary.

mod command;
mod counter;
mod fetcher;
mod greeter;
mod node;
mod text;
mod todo;

use std::io::Write;
use std::sync::Arc;

pub use command::{Command, CommandError};
pub use counter::{counter, Counter, CounterComponent};
pub use fetcher::{fetcher_app, FetchAction, FetchEffect, FetchState, Fetcher, LoadingClock, SimulatedApi};
pub use greeter::{greeter, Greeter, GreeterComponent, GreeterProps};
pub use node::{Button, Input, Node};
pub use text::{Screen, ScreenError, TextRenderer};
pub use todo::{todo, TodoComponent, TodoState};

use crate::config::{DemoConfig, DemoName};
use crate::runtime::{mount, Host, MountError, Mounted, RuntimeOptions};

/// Mount the demo selected by `config.name`.
pub fn launch<W>(
    config: &DemoConfig,
    renderer: TextRenderer<W>,
    host: Arc<dyn Host>,
    options: RuntimeOptions,
) -> Result<Box<dyn Mounted>, MountError>
where
    W: Write + Send + 'static,
{
    tracing::info!(demo = ?config.name, "Launching demo");
    let mounted: Box<dyn Mounted> = match config.name {
        DemoName::Counter => Box::new(mount(renderer, counter().into_app(()), host, options)?),
        DemoName::Greeter => {
            let props = GreeterProps {
                name: config.greeting_name.clone(),
            };
            Box::new(mount(renderer, greeter().into_app(props), host, options)?)
        }
        DemoName::Todo => Box::new(mount(renderer, todo().into_app(()), host, options)?),
        DemoName::Fetcher => Box::new(mount(renderer, fetcher_app(config), host, options)?),
    };
    Ok(mounted)
}
