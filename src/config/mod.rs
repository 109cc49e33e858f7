mod types;

pub use types::*;

use anyhow::{Context, Result};
use report_media_common::paths::is_safe_segment;
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config = parse_config(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    expand_paths(&mut config);

    Ok(config)
}

/// Parse and validate configuration from a TOML string
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
        "./config.toml",
        "./report-media.toml",
        "~/.config/report-media/config.toml",
        "/etc/report-media/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    // Return default config if no file found
    Ok(Config::default())
}

fn expand_paths(config: &mut Config) {
    let base_dir = config.storage.base_dir.to_string_lossy().into_owned();
    config.storage.base_dir = PathBuf::from(shellexpand::tilde(&base_dir).as_ref());
}

/// Validate configuration
///
/// Runs on every load; call it again after applying command-line overrides.
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.server.max_upload_bytes == 0 {
        anyhow::bail!("server.max_upload_bytes cannot be 0");
    }

    if !is_safe_segment(&config.storage.root_label) {
        anyhow::bail!(
            "storage.root_label {:?} must be a single path segment",
            config.storage.root_label
        );
    }

    if config.storage.base_dir.as_os_str().is_empty() {
        anyhow::bail!("storage.base_dir cannot be empty");
    }

    Ok(())
}
