use std::path::Path;

use anyhow::{Context, Result};
use inkbridge_core::ExporterConfig;

/// Values given on the command line; each one wins over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub upload_mode: Option<String>,
    pub endpoint: Option<String>,
}

pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<ExporterConfig> {
    let mut config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            ExporterConfig::from_json(&raw)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => ExporterConfig::default(),
    };
    if let Some(api_key) = overrides.api_key {
        config.api_key = Some(api_key);
    }
    if let Some(upload_mode) = overrides.upload_mode {
        config.upload_mode = upload_mode;
    }
    if let Some(endpoint) = overrides.endpoint {
        config.endpoint = endpoint;
    }
    Ok(config)
}
