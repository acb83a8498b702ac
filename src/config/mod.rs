mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    parse_config(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
}

/// Parse and validate configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./tubemeta.toml",
        "~/.config/tubemeta/config.toml",
        "/etc/tubemeta/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.quota.max_attempts == 0 {
        anyhow::bail!("quota.max_attempts must be at least 1");
    }

    if config.cache.dir.as_os_str().is_empty() {
        anyhow::bail!("cache.dir cannot be empty");
    }

    if config.youtube.api_key.is_empty() {
        tracing::warn!("No YouTube API key configured; remote fetches are disabled");
    }

    for path in &config.library.paths {
        if !path.exists() {
            tracing::warn!("Library path does not exist: {:?}", path);
        }
    }

    Ok(())
}
