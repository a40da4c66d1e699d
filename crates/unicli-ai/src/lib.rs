//! Conversation and tool-call engine for universal-cli.
//!
//! Provides:
//! - An OpenAI-compatible chat-completions client with SSE streaming
//! - Reassembly of streamed text and fragmented tool calls
//! - Sandboxed file-system tools (`list_files`, `read_file`, `write_file`)
//! - A session that runs the model/tool loop until a final answer
//! - Token usage tracking

pub mod config;
pub mod openai;
pub mod reassembler;
pub mod session;
pub mod streaming;
pub mod token_tracker;
pub mod tools;

use async_trait::async_trait;

pub use config::SessionConfig;
pub use openai::{ClientOptions, OpenAiClient};
pub use reassembler::{
    AssembledResponse, FirstOutput, StreamAccumulator, StreamFragment, ToolCallDelta,
};
pub use session::{
    Conversation, NoopObserver, Session, StopReason, TurnEvent, TurnObserver, TurnOutcome,
};
pub use token_tracker::TokenTracker;
pub use tools::{ToolError, ToolName, ToolRegistry, ToolSandbox};

/// A chat-completions backend that streams its response.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Submit `messages` plus the tool declarations and feed every response
    /// fragment to `on_fragment` in arrival order.
    ///
    /// Returns once the stream has ended. An `Err` means the turn cannot
    /// continue; fragments delivered before the error are not retracted.
    async fn stream_chat(
        &self,
        config: &SessionConfig,
        messages: &[Message],
        tools: &[ToolDefinition],
        on_fragment: &mut (dyn FnMut(StreamFragment) + Send),
    ) -> Result<TokenUsage, AiError>;
}

/// One entry of the conversation log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    System {
        content: String,
    },
    User {
        content: String,
    },
    Assistant {
        content: Option<String>,
        tool_calls: Vec<ToolCallRequest>,
    },
    /// Result of one tool call; `tool_call_id` names a request in the
    /// immediately preceding assistant message.
    Tool {
        tool_call_id: String,
        content: String,
    },
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Message::System {
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Message::User {
            content: content.into(),
        }
    }

    pub fn assistant(content: Option<String>) -> Self {
        Message::Assistant {
            content,
            tool_calls: Vec::new(),
        }
    }

    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Message::Tool {
            tool_call_id: tool_call_id.into(),
            content: content.into(),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Message::System { .. } => Role::System,
            Message::User { .. } => Role::User,
            Message::Assistant { .. } => Role::Assistant,
            Message::Tool { .. } => Role::Tool,
        }
    }

    pub fn content(&self) -> Option<&str> {
        match self {
            Message::System { content }
            | Message::User { content }
            | Message::Tool { content, .. } => Some(content),
            Message::Assistant { content, .. } => content.as_deref(),
        }
    }

    /// Tool calls carried by an assistant message; empty for other roles.
    pub fn tool_calls(&self) -> &[ToolCallRequest] {
        match self {
            Message::Assistant { tool_calls, .. } => tool_calls,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
    Tool,
}

/// A tool invocation reassembled from the response stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolCallRequest {
    /// Opaque id from the model, or a local placeholder if it sent none.
    pub id: String,
    /// Name as streamed; may be mangled (see [`ToolName::normalize`]).
    pub name: String,
    /// Raw argument text, expected to be one JSON object.
    pub arguments: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout")]
    Timeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_accessors() {
        let msg = Message::assistant(None);
        assert_eq!(msg.role(), Role::Assistant);
        assert_eq!(msg.content(), None);
        assert!(msg.tool_calls().is_empty());

        let msg = Message::tool("call_1", "ok");
        assert_eq!(msg.role(), Role::Tool);
        assert_eq!(msg.content(), Some("ok"));
    }

    #[test]
    fn total_tokens_saturates() {
        let usage = TokenUsage {
            input_tokens: u64::MAX,
            output_tokens: 1,
        };
        assert_eq!(usage.total_tokens(), u64::MAX);
    }
}
