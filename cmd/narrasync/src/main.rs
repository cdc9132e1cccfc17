//! narrasync CLI - keeps slide narration audio in sync with slide text.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod provider;

use commands::{ConfigCommand, GenerateCommand, VoicesCommand};

/// narrasync CLI - keeps slide narration audio in sync with slide text.
///
/// Reads the `data-narration` attribute of every slide in the `NN-*.html`
/// decks of a slides directory and synthesizes one audio file per narrated
/// slide. Unchanged narration is skipped using a manifest of text
/// fingerprints.
///
/// Configuration is stored in ~/.narrasync/narrasync/ and supports multiple
/// contexts, similar to kubectl's context management.
#[derive(Parser)]
#[command(name = "narrasync")]
#[command(about = "Slide narration audio generator")]
#[command(version)]
pub struct Cli {
    /// Config file (default is ~/.narrasync/narrasync/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Context name to use
    #[arg(short = 'c', long, global = true)]
    pub context: Option<String>,

    /// Output as JSON (for piping)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate narration audio for changed slides
    Generate(GenerateCommand),
    /// List provider voices
    Voices(VoicesCommand),
    /// Manage CLI configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Generate(cmd) => cmd.run(&cli).await,
        Commands::Voices(cmd) => cmd.run(&cli).await,
        Commands::Config(cmd) => cmd.run(&cli).await,
    }
}
