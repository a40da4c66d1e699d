//! Remote endpoint configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// OpenAI-compatible endpoint settings.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL without the `/chat/completions` suffix.
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    /// Ask the server to append token usage to the stream.
    pub stream_usage: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434/v1".to_string(),
            api_key: "ollama".to_string(),
            model: "llama3".to_string(),
            stream_usage: false,
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("stream_usage", &self.stream_usage)
            .finish()
    }
}

impl ApiConfig {
    /// Set the base URL, normalizing what users commonly paste.
    pub fn set_base_url(&mut self, url: &str) {
        self.base_url = normalize_base_url(url);
    }

    /// The key as shown to the user: first three characters, or `(hidden)`.
    pub fn redacted_key(&self) -> String {
        if self.api_key.chars().count() > 4 {
            let prefix: String = self.api_key.chars().take(3).collect();
            format!("{prefix}***")
        } else {
            "(hidden)".to_string()
        }
    }
}

/// Strip trailing separators and a pasted `/chat/completions` or `/chat` suffix.
pub fn normalize_base_url(url: &str) -> String {
    let mut url = url.trim();
    url = url.trim_end_matches(['/', '\\']);
    if let Some(stripped) = url.strip_suffix("/chat/completions") {
        url = stripped;
    } else if let Some(stripped) = url.strip_suffix("/chat") {
        url = stripped;
    }
    url.to_string()
}
