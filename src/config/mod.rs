//! Configuration loading and validation

mod schema;

pub use schema::*;

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "pulsebox.yaml";

/// Load configuration from a YAML file
pub fn load_config(path: &Path) -> Result<PulseConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {:?}", path))?;
    let config: PulseConfig = serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse config file {:?}", path))?;
    config.validate()?;
    Ok(config)
}

/// Load `path` if given, else `pulsebox.yaml` if present, else defaults
pub fn load_or_default(path: Option<&Path>) -> Result<PulseConfig> {
    if let Some(path) = path {
        return load_config(path);
    }

    let fallback = Path::new(DEFAULT_CONFIG_FILE);
    if fallback.exists() {
        debug!(path = ?fallback, "using config from working directory");
        return load_config(fallback);
    }

    debug!("no config file, using defaults");
    Ok(PulseConfig::default())
}
