//! Configuration loaded from `~/.config/tickflow/config.toml`.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{Config, DemoConfig, DemoName, LogFormat, LoggingConfig, RuntimeOptions};
