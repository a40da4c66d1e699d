//! Client struct, HTTP setup and request building.

use std::time::Duration;

use crate::tools::to_openai_tool;
use crate::{AiError, Message, SessionConfig, ToolDefinition};

use super::wire::{ChatRequest, StreamOptions, WireMessage};

/// Timeouts applied to every request made by an [`OpenAiClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    pub connect_timeout: Duration,
    /// Upper bound for a whole streamed response.
    pub request_timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(300),
        }
    }
}

/// Streaming chat-completions client.
///
/// Holds no endpoint state; the base URL, key and model come from the
/// [`SessionConfig`] passed with each request.
pub struct OpenAiClient {
    pub(crate) http: reqwest::Client,
    options: ClientOptions,
}

impl OpenAiClient {
    pub fn new(options: ClientOptions) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(options.connect_timeout)
            .timeout(options.request_timeout)
            .build()
            .map_err(|e| AiError::NetworkError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, options })
    }

    pub fn options(&self) -> ClientOptions {
        self.options
    }

    /// Build the JSON request body.
    pub(crate) fn build_request_body<'a>(
        &self,
        config: &'a SessionConfig,
        messages: &'a [Message],
        tools: &'a [ToolDefinition],
    ) -> ChatRequest<'a> {
        ChatRequest {
            model: &config.model,
            messages: messages.iter().map(WireMessage::from).collect(),
            tools: tools.iter().map(to_openai_tool).collect(),
            stream: true,
            stream_options: config
                .stream_usage
                .then_some(StreamOptions { include_usage: true }),
        }
    }
}
