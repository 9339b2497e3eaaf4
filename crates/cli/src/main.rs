//! Lookout CLI, the main entry point.
//!
//! Commands:
//! - `onboard` initializes `~/.lookout/config.toml`
//! - `serve` starts the HTTP relay gateway
//! - `find` runs the object finder against a camera
//! - `ask` asks one question about what the camera sees
//! - `doctor` diagnoses config, camera and relay

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lookout_finder::QuickQuestion;

mod commands;

#[derive(Parser)]
#[command(
    name = "lookout",
    about = "Lookout: camera-guided object finder and assistant",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Onboard,

    /// Start the HTTP relay gateway
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Search for an object until it is found or you say stop
    Find {
        /// What to look for (try: phone, keys, remote)
        target: String,

        /// Image file or directory of images to use as the camera
        #[arg(short, long)]
        frames: Option<PathBuf>,

        /// Give up after this many seconds
        #[arg(long, default_value_t = 120)]
        timeout_secs: u64,
    },

    /// Ask a question about what the camera sees
    Ask {
        /// Free-form question
        #[arg(conflicts_with = "preset")]
        question: Option<String>,

        /// Canned question: describe, read, money, medicine, colors
        #[arg(long)]
        preset: Option<QuickQuestion>,

        /// Image file or directory of images to use as the camera
        #[arg(short, long)]
        frames: Option<PathBuf>,
    },

    /// Diagnose configuration, camera and relay
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Find {
            target,
            frames,
            timeout_secs,
        } => commands::find::run(target, frames, timeout_secs).await?,
        Commands::Ask {
            question,
            preset,
            frames,
        } => commands::ask::run(question, preset, frames).await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
