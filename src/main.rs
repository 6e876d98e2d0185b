use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use tickflow::config::{Config, DemoName};
use tickflow::demos::{self, Command, Screen, TextRenderer};
use tickflow::logging::init_tracing;
use tickflow::runtime::TokioHost;

#[derive(Debug, Parser)]
#[command(name = "tickflow", version, about = "Run a demo app on the tickflow runtime")]
struct Cli {
    /// Demo to mount (overrides the config file).
    #[arg(long, value_enum)]
    demo: Option<DemoName>,

    /// Config file (default: ~/.config/tickflow/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Name shown by the greeter demo.
    #[arg(long)]
    name: Option<String>,

    /// Simulated latency of the fetcher demo, in milliseconds.
    #[arg(long)]
    fetch_delay_ms: Option<u64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(demo) = cli.demo {
        config.demo.name = demo;
    }
    if let Some(name) = cli.name {
        config.demo.greeting_name = name;
    }
    if let Some(delay) = cli.fetch_delay_ms {
        config.demo.fetch_delay_ms = delay;
    }
    config.validate()?;

    init_tracing(&config.logging).map_err(|err| anyhow!("failed to initialize logging: {err}"))?;

    let (renderer, screen) = TextRenderer::new(std::io::stdout());
    let host = Arc::new(TokioHost::current()?);
    let mounted = demos::launch(&config.demo, renderer, host, config.runtime)
        .context("failed to mount demo")?;

    eprintln!("Commands: click <label> [@n], type <text>, show, quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(command) => execute(&screen, command),
                    Err(err) => eprintln!("{err}"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    mounted.unmount();
    let stats = mounted.stats();
    tracing::info!(
        runtime = %mounted.id(),
        cycles = stats.cycles,
        actions = stats.actions,
        renders = stats.renders,
        effects = stats.effects_launched,
        "Demo finished"
    );
    Ok(())
}

fn execute(screen: &Screen, command: Command) {
    let result = match command {
        Command::Click { label, index } => screen.click_nth(&label, index),
        Command::Type(text) => screen.type_text(&text),
        Command::Show => {
            print!("{}", screen.text());
            Ok(())
        }
        Command::Quit => Ok(()),
    };
    if let Err(err) = result {
        eprintln!("{err}");
    }
}
