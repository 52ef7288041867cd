mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wheel_core::{WheelError, WheelSettings};
use wheel_game::GameError;

#[derive(Parser)]
#[command(name = "wheel")]
#[command(about = "Live prize wheel - one spin per person, results shared in real time")]
#[command(version)]
struct Cli {
    /// Data directory holding the shared store and settings
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prize list management (moderator)
    #[command(subcommand)]
    Config(commands::ConfigCommands),

    /// Log in and spin the wheel once
    Play {
        /// Participant name (will prompt if not provided)
        #[arg(short, long)]
        name: Option<String>,
        /// Shuffle the local prize order before spinning
        #[arg(short, long)]
        shuffle: bool,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show play results, newest first
    History {
        /// Keep running and reprint on every change
        #[arg(short, long)]
        watch: bool,
    },

    /// Observer view: follow prize list and results live
    Watch,

    /// Delete all play results (moderator)
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "wheel_cli={0},wheel_core={0},wheel_game={0}",
            log_level
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let data_dir = cli.data_dir.unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("prize-wheel")
    });

    tokio::fs::create_dir_all(&data_dir)
        .await
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

    let settings = WheelSettings::load(&data_dir.join("settings.json"))
        .await
        .context("Failed to load settings.json")?;

    let (config, records) = match wheel_core::open_stores(&data_dir, &settings).await {
        Ok(stores) => stores,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Check that {} is accessible", data_dir.display());
            std::process::exit(1);
        }
    };

    let app = commands::App {
        settings,
        config: Arc::new(config),
        records: Arc::new(records),
    };

    // Execute command
    let result = match cli.command {
        Commands::Config(cmd) => commands::handle_config_command(cmd, &app).await,
        Commands::Play {
            name,
            shuffle,
            json,
        } => commands::handle_play(name, shuffle, json, &app).await,
        Commands::History { watch } => commands::handle_history(watch, &app).await,
        Commands::Watch => commands::handle_watch(&app).await,
        Commands::Reset { force } => commands::handle_reset(force, &app).await,
    };

    if let Err(e) = result {
        match e {
            GameError::AlreadyPlayed { name } => {
                eprintln!("Error: {} has already played", name);
                eprintln!("Only one spin is allowed per person");
            }
            GameError::EmptyWheel => {
                eprintln!("Error: List is empty");
                eprintln!("Publish prizes with: wheel config set <items..>");
            }
            GameError::AuthCheckFailed(reason) => {
                eprintln!("Error: Could not check play history: {}", reason);
                eprintln!("Nothing was spun; try again in a moment");
            }
            GameError::Core(WheelError::InvalidItem { position }) => {
                eprintln!("Error: Prize {} is blank or spans several lines", position + 1);
            }
            _ => {
                eprintln!("Error: {}", e);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
