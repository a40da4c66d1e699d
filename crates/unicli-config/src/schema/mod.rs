//! Configuration schema types for universal-cli.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with defaults that target a local Ollama server.

mod agent;
mod api;
mod system;

pub use agent::*;
pub use api::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// System prompt used when the config file does not set one.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant in the terminal.";

/// Root configuration.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UnicliConfig {
    /// Sent as the leading system message of every request.
    pub system_prompt: String,
    pub api: ApiConfig,
    pub agent: AgentConfig,
    pub logging: LoggingConfig,
}

impl Default for UnicliConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            api: ApiConfig::default(),
            agent: AgentConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl UnicliConfig {
    /// A copy safe to print: the API key is replaced by its redacted form.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.api.api_key = self.api.redacted_key();
        copy
    }
}
