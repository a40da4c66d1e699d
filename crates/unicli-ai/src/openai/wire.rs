//! Wire format of the chat-completions API.
//!
//! Request types borrow from the conversation so a request is built without
//! cloning message text. Response chunk types are lenient: every field is
//! optional and `null` is accepted wherever a value may be absent.

use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};
use tokio::io::AsyncBufRead;
use tracing::warn;

use crate::streaming::{read_sse_events, SseEvent};
use crate::{AiError, Message, StreamFragment, TokenUsage, ToolCallDelta, ToolCallRequest};

/// Payload that terminates the event stream.
const DONE_MARKER: &str = "[DONE]";

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<serde_json::Value>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_options: Option<StreamOptions>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StreamOptions {
    pub include_usage: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub(crate) enum WireMessage<'a> {
    System {
        content: &'a str,
    },
    User {
        content: &'a str,
    },
    Assistant {
        content: Option<&'a str>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<WireToolCall<'a>>,
    },
    Tool {
        tool_call_id: &'a str,
        content: &'a str,
    },
}

#[derive(Debug, Serialize)]
pub(crate) struct WireToolCall<'a> {
    pub id: &'a str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: WireFunction<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct WireFunction<'a> {
    pub name: &'a str,
    pub arguments: &'a str,
}

impl<'a> From<&'a ToolCallRequest> for WireToolCall<'a> {
    fn from(call: &'a ToolCallRequest) -> Self {
        WireToolCall {
            id: &call.id,
            kind: "function",
            function: WireFunction {
                name: &call.name,
                arguments: &call.arguments,
            },
        }
    }
}

impl<'a> From<&'a Message> for WireMessage<'a> {
    fn from(message: &'a Message) -> Self {
        match message {
            Message::System { content } => WireMessage::System { content },
            Message::User { content } => WireMessage::User { content },
            Message::Assistant {
                content,
                tool_calls,
            } => WireMessage::Assistant {
                content: content.as_deref(),
                tool_calls: tool_calls.iter().map(WireToolCall::from).collect(),
            },
            Message::Tool {
                tool_call_id,
                content,
            } => WireMessage::Tool {
                tool_call_id,
                content,
            },
        }
    }
}

/// One `data:` payload of the response stream.
#[derive(Debug, Deserialize)]
struct ChunkData {
    choices: Option<Vec<Choice>>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    delta: Option<Delta>,
}

#[derive(Debug, Deserialize)]
struct Delta {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCallChunk>>,
}

#[derive(Debug, Deserialize)]
struct ToolCallChunk {
    index: Option<usize>,
    id: Option<String>,
    function: Option<FunctionChunk>,
}

#[derive(Debug, Deserialize)]
struct FunctionChunk {
    name: Option<String>,
    /// Some servers send the arguments as an already-parsed object.
    arguments: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: Option<u64>,
    completion_tokens: Option<u64>,
}

impl ChunkData {
    fn into_fragment(self) -> Option<StreamFragment> {
        let delta = self.choices?.into_iter().next()?.delta?;

        let tool_calls = delta
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(position, chunk)| {
                let (name, arguments) = match chunk.function {
                    Some(f) => (f.name, f.arguments.and_then(arguments_text)),
                    None => (None, None),
                };
                ToolCallDelta {
                    index: chunk.index.unwrap_or(position),
                    id: chunk.id,
                    name,
                    arguments,
                }
            })
            .collect();

        Some(StreamFragment {
            content: delta.content,
            tool_calls,
        })
    }
}

fn arguments_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

/// Handle one SSE event: forward its fragment and record any usage.
pub(crate) fn handle_event(
    event: &SseEvent,
    usage: &mut TokenUsage,
    on_fragment: &mut (dyn FnMut(StreamFragment) + Send),
) -> ControlFlow<()> {
    let data = event.data.trim();
    if data == DONE_MARKER {
        return ControlFlow::Break(());
    }
    if data.is_empty() {
        return ControlFlow::Continue(());
    }

    match serde_json::from_str::<ChunkData>(data) {
        Ok(mut chunk) => {
            if let Some(u) = chunk.usage.take() {
                usage.input_tokens = u.prompt_tokens.unwrap_or(0);
                usage.output_tokens = u.completion_tokens.unwrap_or(0);
            }
            if let Some(fragment) = chunk.into_fragment() {
                on_fragment(fragment);
            }
        }
        Err(e) => warn!(error = %e, "Skipping undecodable stream chunk"),
    }
    ControlFlow::Continue(())
}

/// Decode a chat-completions SSE body from any buffered reader.
///
/// Returns the usage reported by the server, or zeros if it sent none.
pub async fn decode_stream<R>(
    reader: R,
    on_fragment: &mut (dyn FnMut(StreamFragment) + Send),
) -> Result<TokenUsage, AiError>
where
    R: AsyncBufRead + Unpin,
{
    let mut usage = TokenUsage::default();
    read_sse_events(reader, |event| handle_event(&event, &mut usage, on_fragment)).await?;
    Ok(usage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StreamAccumulator;

    async fn decode(body: &str) -> (Vec<StreamFragment>, TokenUsage) {
        let mut fragments = Vec::new();
        let usage = decode_stream(body.as_bytes(), &mut |f| fragments.push(f))
            .await
            .unwrap();
        (fragments, usage)
    }

    #[tokio::test]
    async fn content_deltas_become_text_fragments() {
        let body = concat!(
            "data: {\"choices\":[{\"index\":0,\"delta\":{\"role\":\"assistant\",\"content\":\"Hel\"}}]}\n\n",
            "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"lo!\"},\"finish_reason\":null}]}\n\n",
            "data: [DONE]\n\n",
        );
        let (fragments, usage) = decode(body).await;
        assert_eq!(
            fragments,
            vec![StreamFragment::text("Hel"), StreamFragment::text("lo!")]
        );
        assert_eq!(usage, TokenUsage::default());
    }

    #[tokio::test]
    async fn tool_call_chunks_reassemble() {
        let body = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":null,\"tool_calls\":[{\"index\":0,\"id\":\"call_9\",\"type\":\"function\",\"function\":{\"name\":\"list_\",\"arguments\":\"\"}}]}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"index\":0,\"function\":{\"name\":\"files\",\"arguments\":\"{\\\"path\\\":\"}}]}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"index\":0,\"function\":{\"arguments\":\"\\\"src\\\"}\"}}]}}]}\n\n",
            "data: [DONE]\n\n",
        );
        let (fragments, _) = decode(body).await;

        let mut acc = StreamAccumulator::new();
        for fragment in &fragments {
            acc.push(fragment);
        }
        let response = acc.finish();
        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.tool_calls[0].id, "call_9");
        assert_eq!(response.tool_calls[0].name, "list_files");
        assert_eq!(response.tool_calls[0].arguments, "{\"path\":\"src\"}");
    }

    #[tokio::test]
    async fn object_arguments_and_missing_index_are_tolerated() {
        let body = "data: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"function\":{\"name\":\"read_file\",\"arguments\":{\"path\":\"a\"}}},{\"function\":{\"name\":\"list_files\"}}]}}]}\n\n";
        let (fragments, _) = decode(body).await;
        let calls = &fragments[0].tool_calls;
        assert_eq!(calls[0].index, 0);
        assert_eq!(calls[0].arguments.as_deref(), Some("{\"path\":\"a\"}"));
        assert_eq!(calls[1].index, 1);
        assert_eq!(calls[1].arguments, None);
    }

    #[tokio::test]
    async fn bad_chunks_are_skipped_and_done_stops() {
        let body = concat!(
            "data: not json\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"ok\"}}]}\n\n",
            "data: [DONE]\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"ignored\"}}]}\n\n",
        );
        let (fragments, _) = decode(body).await;
        assert_eq!(fragments, vec![StreamFragment::text("ok")]);
    }

    #[tokio::test]
    async fn usage_chunk_is_recorded() {
        let body = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"x\"}}],\"usage\":null}\n\n",
            "data: {\"choices\":[],\"usage\":{\"prompt_tokens\":12,\"completion_tokens\":3,\"total_tokens\":15}}\n\n",
            "data: [DONE]\n\n",
        );
        let (fragments, usage) = decode(body).await;
        assert_eq!(fragments.len(), 1);
        assert_eq!(usage.input_tokens, 12);
        assert_eq!(usage.output_tokens, 3);
    }

    #[test]
    fn assistant_tool_calls_serialize_as_functions() {
        let message = Message::Assistant {
            content: Some("Checking.".into()),
            tool_calls: vec![ToolCallRequest {
                id: "call_7".into(),
                name: "list_files".into(),
                arguments: "{}".into(),
            }],
        };

        let value = serde_json::to_value(WireMessage::from(&message)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "role": "assistant",
                "content": "Checking.",
                "tool_calls": [{
                    "id": "call_7",
                    "type": "function",
                    "function": {"name": "list_files", "arguments": "{}"}
                }]
            })
        );
    }
}
