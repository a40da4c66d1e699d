//! Full configuration validation.
//!
//! Checks endpoint shape and numeric ranges, collecting every problem
//! into a single `ConfigError`.

mod helpers;


use unicli_common::ConfigError;

use crate::schema::UnicliConfig;

use helpers::validate_range;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &UnicliConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_api(&mut errors, config);
    validate_agent(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_api(errors: &mut Vec<String>, config: &UnicliConfig) {
    let url = config.api.base_url.as_str();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(format!(
            "api.base_url = {url:?} must start with http:// or https://"
        ));
    }
    if config.api.model.trim().is_empty() {
        errors.push("api.model must not be empty".to_string());
    }
}

fn validate_agent(errors: &mut Vec<String>, config: &UnicliConfig) {
    validate_range(
        errors,
        "agent.max_tool_rounds",
        config.agent.max_tool_rounds,
        1,
        1000,
    );
    validate_range(
        errors,
        "agent.request_timeout_secs",
        config.agent.request_timeout_secs,
        1,
        3600,
    );
    validate_range(
        errors,
        "agent.connect_timeout_secs",
        config.agent.connect_timeout_secs,
        1,
        120,
    );
}
