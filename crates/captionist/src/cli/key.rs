//! The `captionist key` command for API key management.

use super::keystore::{clear_credentials, load_credentials, save_credentials, FileKeyStore};
use super::theme::{captionist_theme, handle_interrupt};
use captionist_core::llm::mask_key;
use captionist_core::{Config, Credentials, Provider};
use clap::{Args, Subcommand};
use console::Style;
use dialoguer::{Password, Select};

/// Arguments for the `key` command.
#[derive(Args, Debug)]
pub struct KeyArgs {
    #[command(subcommand)]
    pub command: KeyCommand,
}

/// Subcommands for key management.
#[derive(Subcommand, Debug)]
pub enum KeyCommand {
    /// Save an API key (prompts when --key is omitted)
    Set {
        /// Provider the key belongs to: openai or google
        #[arg(long)]
        provider: Option<Provider>,

        /// API key value
        #[arg(long)]
        key: Option<String>,
    },

    /// Show the saved provider and a masked key
    Show,

    /// Forget the saved key
    Clear,
}

/// Where to create a key for each provider.
pub(crate) fn key_url(provider: Provider) -> &'static str {
    match provider {
        Provider::OpenAi => "https://platform.openai.com/api-keys",
        Provider::Google => "https://makersuite.google.com/app/apikey",
    }
}

/// Execute the key command.
pub async fn execute(args: KeyArgs, config: &Config) -> anyhow::Result<()> {
    let mut store = FileKeyStore::new(config.key_store_path());
    let dim = Style::new().for_stderr().dim();

    match args.command {
        KeyCommand::Set { provider, key } => {
            let provider = match provider {
                Some(provider) => provider,
                None => match prompt_provider()? {
                    Some(provider) => provider,
                    None => return Ok(()),
                },
            };

            let key = match key {
                Some(key) => key,
                None => {
                    eprintln!(
                        "  {}",
                        dim.apply_to(format!("Get a key at {}", key_url(provider)))
                    );
                    let Some(key) = handle_interrupt(
                        Password::with_theme(&captionist_theme())
                            .with_prompt(format!("Enter your {} API key", provider.label()))
                            .interact(),
                    )?
                    else {
                        return Ok(());
                    };
                    key
                }
            };

            save_credentials(&mut store, &Credentials::new(key, provider))?;
            tracing::info!("Saved {} key to {}", provider, store.path().display());
            eprintln!(
                "  {}",
                dim.apply_to(format!("{} API connected", provider.label()))
            );
        }

        KeyCommand::Show => match load_credentials(&store)? {
            Some(credentials) => {
                println!(
                    "{}\t{}",
                    credentials.provider,
                    mask_key(&credentials.api_key)
                );
            }
            None => {
                println!("No API key saved. Run `captionist key set` to add one.");
            }
        },

        KeyCommand::Clear => {
            clear_credentials(&mut store)?;
            println!("Saved API key removed.");
        }
    }

    Ok(())
}

/// Ask which provider the key is for. `None` if the user cancels.
fn prompt_provider() -> anyhow::Result<Option<Provider>> {
    let providers = &[Provider::OpenAi.label(), Provider::Google.label()];
    let selection = Select::with_theme(&captionist_theme())
        .with_prompt("AI provider")
        .items(providers)
        .default(0)
        .interact_opt()?;

    Ok(match selection {
        Some(0) => Some(Provider::OpenAi),
        Some(1) => Some(Provider::Google),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_url_per_provider() {
        assert!(key_url(Provider::OpenAi).contains("openai.com"));
        assert!(key_url(Provider::Google).contains("makersuite.google.com"));
    }
}
