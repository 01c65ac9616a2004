use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use loader_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "material-loader")]
#[command(author, version, about = "A Material-style loading indicator with pull-to-refresh")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Use this config file instead of ~/.config/material-loader/config.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive list with pull-to-refresh
    Demo,
    /// Show the spinning loader over the terminal
    Spinner {
        /// Dismiss the loader after this many seconds
        #[arg(short, long, default_value_t = 5)]
        seconds: u64,
    },
    /// Replay a gesture script and print every rendered state
    Trace {
        /// Script file; reads stdin when omitted
        file: Option<PathBuf>,
        /// Print one JSON object per state
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AppConfig::load().context("Failed to load config")?,
    };
    let config = Arc::new(config);

    // TUI modes own the terminal, so their logs go to a file
    let tui = !matches!(cli.command, Some(Commands::Trace { .. }));
    init_logging(&config, tui)?;

    match cli.command {
        Some(Commands::Demo) | None => commands::demo::run(config).await,
        Some(Commands::Spinner { seconds }) => commands::spinner::run(config, seconds).await,
        Some(Commands::Trace { file, json }) => {
            commands::trace::run(config, file.as_deref(), json).await
        }
    }
}

fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
    );

    if to_file {
        let path = config.log_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    Ok(())
}
