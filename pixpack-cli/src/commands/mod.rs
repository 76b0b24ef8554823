//! Subcommand implementations

pub mod decode;
pub mod encode;
pub mod list;

use anyhow::{Context, Result};
use pixpack_core::PackConfig;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Build the batch configuration from an optional JSON file and CLI flags.
///
/// Flags win over file values: `--follow-links` turns link following on,
/// `--extension` replaces the image extension.
pub fn load_config(
    path: Option<&Path>,
    follow_links: bool,
    extension: Option<&str>,
) -> Result<PackConfig> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        }
        None => PackConfig::default(),
    };

    if follow_links {
        config.follow_links = true;
    }
    if let Some(ext) = extension {
        config.image_extension = ext.to_string();
    }

    config.validate().context("Invalid configuration")?;
    debug!("Using configuration {:?}", config);

    Ok(config)
}
