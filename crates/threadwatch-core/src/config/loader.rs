//! Config loader — reads `config.json`, the optional `.env` file, and the
//! bot token.
//!
//! # Loading precedence
//! 1. JSON file (required; any failure is fatal)
//! 2. Environment variables `THREADWATCH_NOTIFIER__<FIELD>` (override JSON)
//!
//! Unlike a long-running service with sane defaults, a relay with no routes
//! does nothing useful, so there is no fallback config.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::error::ConfigError;
use super::schema::{MessageTemplate, RoutingConfig};

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Default env file, relative to the working directory.
pub const DEFAULT_ENV_PATH: &str = ".env";

/// Environment variable holding the bot token.
pub const DEFAULT_TOKEN_VAR: &str = "DISCORD_TOKEN";

/// Load the routing configuration from `path` (or `config.json`), then apply
/// env var overrides.
pub fn load_config(path: Option<&Path>) -> Result<RoutingConfig, ConfigError> {
    let config_path = path
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = load_config_from_path(&config_path)?;
    Ok(apply_env_overrides(config, |key| std::env::var(key).ok()))
}

/// Load and decode a config file without env overrides.
fn load_config_from_path(path: &Path) -> Result<RoutingConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    debug!("Loading config from {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config: RoutingConfig =
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    info!(
        sources = config.sources.len(),
        destinations = config.destinations.len(),
        "loaded routing config from {}",
        path.display()
    );
    Ok(config)
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Env var format: `THREADWATCH_<SECTION>__<FIELD>`.
///
/// Supported overrides:
/// - `THREADWATCH_NOTIFIER__TEMPLATE` → `notifier.template`
/// - `THREADWATCH_NOTIFIER__SUPPRESS_EMBEDS` → `notifier.suppress_embeds`
fn apply_env_overrides<F>(mut config: RoutingConfig, lookup: F) -> RoutingConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("THREADWATCH_NOTIFIER__TEMPLATE") {
        match val.parse::<MessageTemplate>() {
            Ok(t) => config.notifier.template = t,
            Err(e) => warn!("Ignoring THREADWATCH_NOTIFIER__TEMPLATE: {}", e),
        }
    }
    if let Some(val) = lookup("THREADWATCH_NOTIFIER__SUPPRESS_EMBEDS") {
        config.notifier.suppress_embeds = val == "true" || val == "1";
    }

    config
}

/// Load a `.env` file into the process environment.
///
/// A missing file is fine (the token may already be exported); a file that
/// exists but can't be parsed is not.
pub fn load_env_file(path: Option<&Path>) -> Result<(), ConfigError> {
    let env_path = path
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ENV_PATH));

    match dotenvy::from_path(&env_path) {
        Ok(()) => {
            debug!("Loaded environment from {}", env_path.display());
            Ok(())
        }
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No env file at {}, using process environment", env_path.display());
            Ok(())
        }
        Err(source) => Err(ConfigError::EnvFile {
            path: env_path,
            source,
        }),
    }
}

/// Read the bot token from `var`. Absent or blank is an error.
pub fn load_token(var: &str) -> Result<String, ConfigError> {
    token_from(var, std::env::var(var).ok())
}

fn token_from(var: &str, value: Option<String>) -> Result<String, ConfigError> {
    match value.map(|v| v.trim().to_string()) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(ConfigError::MissingToken(var.to_string())),
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
