use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub runtime: RuntimeOptions,
    #[serde(default)]
    pub demo: DemoConfig,
}

/// Log output settings. `RUST_LOG` overrides `filter` when set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive (e.g. "info", "tickflow=debug").
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
}

/// Knobs for a mounted runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeOptions {
    /// Back-to-back self re-armed cycles after which a possible dispatch
    /// loop is reported (default: 64). Reporting only; nothing is dropped.
    #[serde(default = "default_cycle_warn_threshold")]
    pub cycle_warn_threshold: u32,
}

/// Which demo app the binary mounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DemoName {
    #[default]
    Counter,
    Greeter,
    Todo,
    Fetcher,
}

/// Settings for the bundled demo apps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    #[serde(default)]
    pub name: DemoName,
    /// Name shown by the greeter (default: "World").
    #[serde(default = "default_greeting_name")]
    pub greeting_name: String,
    /// Simulated fetch latency in milliseconds (default: 1500).
    #[serde(default = "default_fetch_delay_ms")]
    pub fetch_delay_ms: u64,
    /// Every n-th fetch fails; 0 disables failures (default: 3).
    #[serde(default = "default_fetch_fail_every")]
    pub fetch_fail_every: u32,
    /// Loading clock period in milliseconds (default: 100).
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_cycle_warn_threshold() -> u32 {
    64
}

fn default_greeting_name() -> String {
    "World".to_string()
}

fn default_fetch_delay_ms() -> u64 {
    1500
}

fn default_fetch_fail_every() -> u32 {
    3
}

fn default_tick_ms() -> u64 {
    100
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: LogFormat::default(),
        }
    }
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            cycle_warn_threshold: default_cycle_warn_threshold(),
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            name: DemoName::default(),
            greeting_name: default_greeting_name(),
            fetch_delay_ms: default_fetch_delay_ms(),
            fetch_fail_every: default_fetch_fail_every(),
            tick_ms: default_tick_ms(),
        }
    }
}
