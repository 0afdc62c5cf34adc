//! Logging initialization and configuration.
//!
//! Uses the `tracing` ecosystem for structured logging with support for
//! both human-readable and JSON output formats.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem.
///
/// # Arguments
///
/// * `level` - Default filter directive when RUST_LOG is not set.
/// * `json_format` - If true, outputs structured JSON logs; otherwise pretty-printed.
///
/// # Notes
///
/// - Log output goes to stderr (stdout is reserved for captions)
/// - The RUST_LOG environment variable can override the log level
pub fn init(level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Pick the default level: `--verbose` forces debug, otherwise the config value.
pub fn effective_level(config: &captionist_core::Config, verbose_override: bool) -> String {
    if verbose_override {
        return "debug".to_string();
    }
    match config.logging.level.to_ascii_lowercase().as_str() {
        level @ ("error" | "warn" | "info" | "debug" | "trace") => level.to_string(),
        _ => "info".to_string(),
    }
}

/// Initialize logging with configuration from Config.
pub fn init_from_config(
    config: &captionist_core::Config,
    verbose_override: bool,
    json_logs_override: bool,
) {
    let level = effective_level(config, verbose_override);
    let json_format = json_logs_override || config.logging.format == "json";
    init(&level, json_format);
}

#[cfg(test)]
mod tests {
    use super::*;
    use captionist_core::Config;

    #[test]
    fn verbose_forces_debug() {
        assert_eq!(effective_level(&Config::default(), true), "debug");
    }

    #[test]
    fn config_level_is_used() {
        let mut config = Config::default();
        config.logging.level = "WARN".to_string();
        assert_eq!(effective_level(&config, false), "warn");
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert_eq!(effective_level(&config, false), "info");
    }
}
