//! universal-cli configuration system.
//!
//! TOML-based configuration with validation and live reload. All config
//! sections use serde defaults so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use unicli_config::{config_to_json, toml_loader};
//!
//! let path = toml_loader::default_config_path().expect("no config dir");
//! let config = toml_loader::load_or_create(&path).expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod reload;
pub mod schema;
pub mod toml_loader;
pub mod toml_writer;
pub mod validation;
pub mod watcher;

pub use reload::ReloadManager;
pub use schema::{normalize_base_url, UnicliConfig, CONFIG_SCHEMA_VERSION};
pub use toml_writer::save_config_to_path;
pub use watcher::ConfigWatcher;

/// Serialize a config to pretty-printed JSON with the API key redacted.
pub fn config_to_json(config: &UnicliConfig) -> String {
    serde_json::to_string_pretty(&config.redacted())
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let json = config_to_json(&UnicliConfig::default());
        assert!(json.contains("\"system_prompt\""));
        assert!(json.contains("\"api\""));
        assert!(json.contains("\"agent\""));
        assert!(json.contains("\"logging\""));
    }

    #[test]
    fn config_to_json_redacts_key() {
        let mut config = UnicliConfig::default();
        config.api.api_key = "sk-live-abcdef".into();
        let json = config_to_json(&config);
        assert!(json.contains("sk-***"));
        assert!(!json.contains("abcdef"));
    }

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }
}
