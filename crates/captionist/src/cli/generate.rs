//! The `captionist generate` command.

use super::keystore::{load_credentials, FileKeyStore};
use captionist_core::{
    CaptionOptions, CaptionService, Config, Credentials, ImageResource, Length, Platform,
    Provider, Tone,
};
use clap::Args;
use console::Style;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Arguments for the `generate` command.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Image to caption (JPEG, PNG, GIF or WebP)
    #[arg(required = true)]
    pub image: PathBuf,

    /// Caption tone: casual, professional, creative, funny
    #[arg(short, long)]
    pub tone: Option<Tone>,

    /// Caption length: short, medium, long
    #[arg(short, long)]
    pub length: Option<Length>,

    /// Target platform: instagram, twitter, facebook, linkedin, general
    #[arg(short, long)]
    pub platform: Option<Platform>,

    /// Ask for 3-5 hashtags at the end
    #[arg(long, overrides_with = "no_hashtags")]
    pub hashtags: bool,

    /// Ask for no hashtags
    #[arg(long, overrides_with = "hashtags")]
    pub no_hashtags: bool,

    /// Provider to use: openai or google (defaults to the saved key's provider)
    #[arg(long)]
    pub provider: Option<Provider>,

    /// API key (overrides the saved key)
    #[arg(long, env = "CAPTIONIST_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Number of captions to generate, one request each
    #[arg(short = 'n', long, default_value = "1")]
    pub count: usize,

    /// Print each caption as a JSON object
    #[arg(long)]
    pub json: bool,
}

impl GenerateArgs {
    /// Options given on the command line; unset flags stay `None`.
    fn cli_options(&self) -> CaptionOptions {
        let include_hashtags = if self.hashtags {
            Some(true)
        } else if self.no_hashtags {
            Some(false)
        } else {
            None
        };
        CaptionOptions {
            tone: self.tone,
            length: self.length,
            include_hashtags,
            platform: self.platform,
        }
    }
}

#[derive(Serialize)]
struct CaptionRecord<'a> {
    caption: &'a str,
    provider: Provider,
    options: captionist_core::ResolvedOptions,
}

/// Pick the provider and key for this run.
///
/// Provider: flag, then the saved key's provider, then OpenAI.
/// Key: flag, then the saved key (when its provider matches), then config/env.
pub(crate) fn resolve_credentials(
    api_key: Option<&str>,
    provider: Option<Provider>,
    saved: Option<Credentials>,
    config: &Config,
) -> anyhow::Result<Credentials> {
    let provider = provider
        .or(saved.as_ref().map(|c| c.provider))
        .unwrap_or(Provider::OpenAi);

    let key = api_key
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .or_else(|| {
            saved
                .filter(|c| c.provider == provider)
                .map(|c| c.api_key)
        })
        .or_else(|| config.api_key_for(provider));

    match key {
        Some(key) => Ok(Credentials::new(key, provider)),
        None => anyhow::bail!(
            "No {} API key configured. Run `captionist key set` or set {}.",
            provider.label(),
            provider.env_var()
        ),
    }
}

/// Execute the generate command.
pub async fn execute(args: GenerateArgs, config: &Config) -> anyhow::Result<()> {
    if args.count == 0 {
        anyhow::bail!("--count must be at least 1");
    }

    let store = FileKeyStore::new(config.key_store_path());
    let saved = load_credentials(&store)?;
    let credentials =
        resolve_credentials(args.api_key.as_deref(), args.provider, saved, config)?;
    let provider = credentials.provider;

    let path_str = args.image.to_string_lossy();
    let image_path = PathBuf::from(shellexpand::tilde(&path_str).into_owned());
    let image = ImageResource::from_path(&image_path)?;

    let options = config.caption.to_options().overlay(&args.cli_options());
    let resolved = options.resolve();
    tracing::debug!(?resolved, %provider, "Resolved caption options");

    let service = CaptionService::with_config(credentials, config);

    for _ in 0..args.count {
        let spinner = create_spinner(provider);
        let result = service.generate_caption(&image, &options).await;
        spinner.finish_and_clear();

        let caption = match result {
            Ok(caption) => caption,
            Err(e) => {
                let red = Style::new().for_stderr().red();
                eprintln!(
                    "{}",
                    red.apply_to(
                        "Failed to generate caption. Please check your API key and try again."
                    )
                );
                return Err(e.into());
            }
        };

        if args.json {
            let record = CaptionRecord {
                caption: &caption,
                provider,
                options: resolved,
            };
            println!("{}", serde_json::to_string(&record)?);
        } else {
            println!("{caption}");
            if args.count > 1 {
                println!();
            }
        }
    }

    Ok(())
}

fn create_spinner(provider: Provider) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.magenta} [{elapsed}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Generating caption with {}...", provider.label()));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(hashtags: bool, no_hashtags: bool) -> GenerateArgs {
        GenerateArgs {
            image: PathBuf::from("photo.jpg"),
            tone: Some(Tone::Funny),
            length: None,
            platform: None,
            hashtags,
            no_hashtags,
            provider: None,
            api_key: None,
            count: 1,
            json: false,
        }
    }

    #[test]
    fn cli_options_leave_unset_flags_empty() {
        let options = args(false, false).cli_options();
        assert_eq!(options.tone, Some(Tone::Funny));
        assert_eq!(options.include_hashtags, None);
        assert_eq!(options.length, None);
    }

    #[test]
    fn cli_options_hashtag_flags() {
        assert_eq!(args(true, false).cli_options().include_hashtags, Some(true));
        assert_eq!(args(false, true).cli_options().include_hashtags, Some(false));
    }

    #[test]
    fn flag_key_wins() {
        let saved = Credentials::new("saved-key", Provider::Google);
        let creds =
            resolve_credentials(Some("flag-key"), None, Some(saved), &Config::default()).unwrap();
        assert_eq!(creds, Credentials::new("flag-key", Provider::Google));
    }

    #[test]
    fn saved_key_used_for_matching_provider() {
        let saved = Credentials::new("saved-key", Provider::Google);
        let creds = resolve_credentials(None, None, Some(saved), &Config::default()).unwrap();
        assert_eq!(creds, Credentials::new("saved-key", Provider::Google));
    }

    #[test]
    fn saved_key_not_cross_wired_to_other_provider() {
        let mut config = Config::default();
        config.providers.openai.api_key = String::new();
        let saved = Credentials::new("AIza-gemini", Provider::Google);
        let err = resolve_credentials(None, Some(Provider::OpenAi), Some(saved), &config)
            .unwrap_err();
        assert!(err.to_string().contains("OpenAI"));
    }

    #[test]
    fn config_key_is_last_resort() {
        let mut config = Config::default();
        config.providers.openai.api_key = "sk-from-config".to_string();
        let creds = resolve_credentials(None, None, None, &config).unwrap();
        assert_eq!(creds, Credentials::new("sk-from-config", Provider::OpenAi));
    }

    #[test]
    fn config_defaults_layer_under_flags() {
        let mut config = Config::default();
        config.caption.platform = Platform::Instagram;
        config.caption.include_hashtags = false;

        let options = config.caption.to_options().overlay(&args(true, false).cli_options());
        let resolved = options.resolve();
        assert_eq!(resolved.platform, Platform::Instagram);
        assert_eq!(resolved.tone, Tone::Funny);
        assert!(resolved.include_hashtags);
    }
}
