use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use tasklet_core::impls::memory::{self, Journal};
use tasklet_core::{DispatcherConfig, TaskDispatcher, TaskName};

/// Dispatch background tasks against in-memory collaborators.
#[derive(Debug, Parser)]
#[command(name = "tasklet", version)]
struct Cli {
    /// Dispatcher config (TOML).
    #[arg(long, short, env = "TASKLET_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the accepted task identifiers.
    Tasks,

    /// Dispatch one task and print its outcome.
    Dispatch {
        /// Task identifier, e.g. `service_manager_trigger`.
        task: String,

        /// JSON payload.
        #[arg(long, default_value = "{}")]
        payload: String,
    },
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging();

    let config = match &cli.config {
        Some(path) => DispatcherConfig::load(path)?,
        None => DispatcherConfig::default(),
    };

    match cli.command {
        Command::Tasks => {
            for name in TaskName::ALL {
                println!("{name}");
            }
        }
        Command::Dispatch { task, payload } => {
            let payload: serde_json::Value = serde_json::from_str(&payload)?;

            let journal = Journal::new();
            let dispatcher =
                TaskDispatcher::from_collaborators(&memory::collaborators(&journal), &config)?;

            let outcome = dispatcher.dispatch(&task, payload).await?;
            for entry in journal.entries().await {
                info!(?entry, "side effect");
            }
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }

    Ok(())
}
