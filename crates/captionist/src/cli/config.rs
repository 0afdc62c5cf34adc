//! The `captionist config` command.

use captionist_core::llm::mask_key;
use captionist_core::{Config, Provider};
use clap::{Args, Subcommand};
use std::fmt::Write as _;
use std::path::Path;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the active configuration and which API keys resolve
    Show,

    /// Print the config file location
    Path,

    /// Write a default config file
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command against the configuration `main` loaded.
pub async fn execute(args: ConfigArgs, config: &Config) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            println!("{}", config.to_toml()?);
            print!("{}", render_resolved(config));
        }
        ConfigCommand::Path => println!("{}", Config::default_path().display()),
        ConfigCommand::Init { force } => {
            let path = Config::default_path();
            write_default(&path, force)?;
            tracing::info!(path = %path.display(), "Wrote default config");
            println!("Configuration initialized at: {}", path.display());
        }
    }
    Ok(())
}

/// Values derived from the config rather than stored in it: where saved keys
/// live and whether each provider's key currently resolves.
fn render_resolved(config: &Config) -> String {
    let mut out = String::from("# Resolved\n");
    let _ = writeln!(out, "key_store = {}", config.key_store_path().display());
    for provider in [Provider::OpenAi, Provider::Google] {
        let status = match config.api_key_for(provider) {
            Some(key) => mask_key(&key),
            None => format!("not set ({})", provider.env_var()),
        };
        let _ = writeln!(out, "{}.api_key = {status}", provider.as_str());
    }
    out
}

fn write_default(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Pass --force to replace it.",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, Config::default().to_toml()?)?;
    Ok(())
}
