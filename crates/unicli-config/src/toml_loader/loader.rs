//! Core TOML config loading: read a file, creating the default when missing.

use std::path::Path;

use tracing::{info, warn};
use unicli_common::ConfigError;

use crate::schema::{normalize_base_url, UnicliConfig};
use crate::validation;

use super::paths::create_default_config;

/// Load config from a specific TOML file path.
///
/// Deserializes the file using serde defaults for any missing fields and
/// normalizes `api.base_url`. After loading, the config is validated; if
/// validation fails, a warning is logged and the parsed config is returned as-is.
pub fn load_from_path(path: &Path) -> Result<UnicliConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound(path.to_path_buf())
        } else {
            ConfigError::ParseError(format!("failed to read {}: {e}", path.display()))
        }
    })?;

    let mut config: UnicliConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;
    config.api.base_url = normalize_base_url(&config.api.base_url);

    if let Err(e) = validation::validate(&config) {
        warn!("config validation warning: {e} (using parsed config as-is)");
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from `path`, writing the documented default file first if
/// nothing exists there yet.
pub fn load_or_create(path: &Path) -> Result<UnicliConfig, ConfigError> {
    match load_from_path(path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            info!("no config found at {}, creating default", path.display());
            create_default_config(path)?;
            Ok(UnicliConfig::default())
        }
        Err(e) => Err(e),
    }
}
