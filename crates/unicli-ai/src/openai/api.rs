//! ChatClient trait implementation for OpenAiClient.

use async_trait::async_trait;
use tracing::debug;

use crate::streaming::parse_sse_stream;
use crate::{AiError, ChatClient, Message, SessionConfig, StreamFragment, TokenUsage, ToolDefinition};

use super::client::OpenAiClient;
use super::wire::handle_event;

#[async_trait]
impl ChatClient for OpenAiClient {
    async fn stream_chat(
        &self,
        config: &SessionConfig,
        messages: &[Message],
        tools: &[ToolDefinition],
        on_fragment: &mut (dyn FnMut(StreamFragment) + Send),
    ) -> Result<TokenUsage, AiError> {
        let body = self.build_request_body(config, messages, tools);
        let url = config.completions_url();

        debug!(model = %config.model, url = %url, messages = messages.len(), "Chat completions request");

        let mut request = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .json(&body);
        if !config.api_key.is_empty() {
            request = request.bearer_auth(&config.api_key);
        }

        let response = request.send().await.map_err(map_request_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AiError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text = text.chars().take(200).collect::<String>();
            return Err(AiError::ApiError(format!("HTTP {status}: {text}")));
        }

        let mut usage = TokenUsage::default();
        parse_sse_stream(response, |event| handle_event(&event, &mut usage, on_fragment)).await?;

        debug!(
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "Chat completions stream finished"
        );
        Ok(usage)
    }
}

fn map_request_error(e: reqwest::Error) -> AiError {
    if e.is_timeout() {
        AiError::Timeout
    } else {
        AiError::NetworkError(e.to_string())
    }
}
