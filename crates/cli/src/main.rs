//! Anvil CLI — the main entry point.
//!
//! Commands:
//! - `onboard` — Initialize the workspace (`.anvil/` + default settings)
//! - `chat`    — Interactive chat or single-message mode
//! - `status`  — Show workspace settings

use clap::{Parser, Subcommand};

mod commands;
mod hosts;

#[derive(Parser)]
#[command(
    name = "anvil",
    about = "Anvil — an LLM-driven coding assistant",
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
    /// Initialize the workspace in the current directory
    Onboard,

    /// Chat with the assistant
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Show workspace settings
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await,
        Commands::Chat { message } => commands::chat::run(message).await,
        Commands::Status => commands::status::run().await,
    }
}
