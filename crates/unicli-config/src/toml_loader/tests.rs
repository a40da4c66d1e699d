//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_unicli_config.toml"));
    assert!(matches!(
        result,
        Err(unicli_common::ConfigError::FileNotFound(_))
    ));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
system_prompt = "Be terse."

[api]
model = "qwen2.5-coder"
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.system_prompt, "Be terse.");
    assert_eq!(config.api.model, "qwen2.5-coder");
    // Defaults preserved
    assert_eq!(config.api.base_url, "http://localhost:11434/v1");
    assert_eq!(config.agent.max_tool_rounds, 25);
}

#[test]
fn load_normalizes_base_url() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[api]\nbase_url = \"http://localhost:1234/v1/chat/completions/\"\n",
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.api.base_url, "http://localhost:1234/v1");
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(
        result,
        Err(unicli_common::ConfigError::ParseError(_))
    ));
}

#[test]
fn load_config_with_invalid_values_is_returned_as_parsed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[agent]\nmax_tool_rounds = 0\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.agent.max_tool_rounds, 0);
}

#[test]
fn load_or_create_writes_default_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("universal-cli").join("config.toml");

    let config = load_or_create(&path).unwrap();
    assert!(path.exists());
    assert_eq!(config.api.model, "llama3");

    let reloaded = load_from_path(&path).unwrap();
    assert_eq!(reloaded, config);
}

#[test]
fn default_config_toml_is_valid() {
    use super::template::default_config_toml;
    use crate::schema::UnicliConfig;

    let config: UnicliConfig = toml::from_str(&default_config_toml()).unwrap();
    assert_eq!(config, UnicliConfig::default());
}

#[test]
fn default_config_path_is_reasonable() {
    // May not resolve in every CI sandbox
    if let Ok(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("universal-cli"));
        assert!(path_str.ends_with("config.toml"));
    }
}
