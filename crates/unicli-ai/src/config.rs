//! Per-turn endpoint settings handed to the session by the caller.

use std::fmt;

/// Endpoint, credentials, model and system prompt for one turn.
///
/// Built fresh by the caller before every turn so edits made between turns
/// take effect without restarting the session.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Base URL; `/chat/completions` is appended by the client.
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub system_prompt: String,
    /// Request `stream_options.include_usage`.
    pub stream_usage: bool,
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("system_prompt", &self.system_prompt)
            .field("stream_usage", &self.stream_usage)
            .finish()
    }
}

impl SessionConfig {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: String::new(),
            model: model.into(),
            system_prompt: String::new(),
            stream_usage: false,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_stream_usage(mut self, enabled: bool) -> Self {
        self.stream_usage = enabled;
        self
    }

    /// Full chat-completions endpoint for this base URL.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}
