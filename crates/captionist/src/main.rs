//! Captionist CLI - social-media captions for your images, written by AI.
//!
//! Sends an image plus style options to OpenAI or Google Gemini and prints
//! the caption that comes back.
//!
//! # Usage
//!
//! ```bash
//! # Save an API key once
//! captionist key set --provider openai
//!
//! # Caption a photo
//! captionist generate beach.jpg --tone funny --platform instagram
//!
//! # View configuration
//! captionist config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Captionist - generate social-media captions for images with AI.
#[derive(Parser, Debug)]
#[command(name = "captionist")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a caption for an image
    Generate(cli::generate::GenerateArgs),

    /// Save, show, or clear the API key
    Key(cli::key::KeyArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match captionist_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `captionist config path`."
            );
            captionist_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Captionist v{}", captionist_core::VERSION);

    match cli.command {
        Commands::Generate(args) => cli::generate::execute(args, &config).await,
        Commands::Key(args) => cli::key::execute(args, &config).await,
        Commands::Config(args) => cli::config::execute(args, &config).await,
    }
}
