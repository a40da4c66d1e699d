//! Session struct and tool execution.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use unicli_common::SessionId;

use crate::token_tracker::TokenTracker;
use crate::tools::ToolRegistry;
use crate::{Message, ToolCallRequest};

use super::conversation::Conversation;
use super::observer::{TurnEvent, TurnObserver};

/// Default ceiling on tool rounds per turn.
pub const DEFAULT_MAX_TOOL_ROUNDS: u32 = 25;

/// A conversation with the model plus the tools it may call.
pub struct Session {
    pub(super) id: SessionId,
    pub(super) conversation: Conversation,
    pub(super) registry: ToolRegistry,
    pub(super) tracker: TokenTracker,
    /// Maximum tool rounds per turn before the turn is cut off.
    pub(super) max_tool_rounds: u32,
}

impl Session {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            id: SessionId::new(),
            conversation: Conversation::new(),
            registry,
            tracker: TokenTracker::new(),
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    pub fn with_max_tool_rounds(mut self, max: u32) -> Self {
        self.set_max_tool_rounds(max);
        self
    }

    /// At least one round is always allowed.
    pub fn set_max_tool_rounds(&mut self, max: u32) {
        self.max_tool_rounds = max.max(1);
    }

    pub fn max_tool_rounds(&self) -> u32 {
        self.max_tool_rounds
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Full conversation history.
    pub fn messages(&self) -> &[Message] {
        self.conversation.messages()
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn tracker(&self) -> &TokenTracker {
        &self.tracker
    }

    /// Run one tool call. Always yields result text for the model.
    pub(super) async fn execute_tool(
        &self,
        call: &ToolCallRequest,
        observer: &mut dyn TurnObserver,
    ) -> String {
        debug!(tool = %call.name, id = %call.id, "Executing tool");

        let args = match parse_arguments(&call.arguments) {
            Ok(args) => args,
            Err(error) => {
                warn!(tool = %call.name, error = %error, "Failed to parse tool arguments, using {{}}");
                observer.on_event(TurnEvent::ArgumentParseError {
                    name: &call.name,
                    error: &error,
                });
                Map::new()
            }
        };

        let shown = serde_json::to_string(&args).unwrap_or_default();
        observer.on_event(TurnEvent::ToolStarted {
            name: &call.name,
            arguments: &shown,
        });

        let output = self.registry.dispatch(&call.name, &args).await;
        observer.on_event(TurnEvent::ToolFinished {
            name: &call.name,
            output: &output,
        });
        output
    }
}

/// Parse raw argument text into a JSON object.
///
/// Blank text is an empty object. Anything that is not an object is an error.
pub(super) fn parse_arguments(raw: &str) -> Result<Map<String, Value>, String> {
    if raw.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(format!("expected a JSON object, got {}", json_kind(&other))),
        Err(e) => Err(e.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_arguments_are_an_empty_object() {
        assert_eq!(parse_arguments("").unwrap(), Map::new());
        assert_eq!(parse_arguments("  \n").unwrap(), Map::new());
    }

    #[test]
    fn object_arguments_parse() {
        let args = parse_arguments("{\"path\":\"src\"}").unwrap();
        assert_eq!(args["path"], "src");
    }

    #[test]
    fn malformed_and_non_object_arguments_are_errors() {
        assert!(parse_arguments("{path:").is_err());
        let err = parse_arguments("[1,2]").unwrap_err();
        assert_eq!(err, "expected a JSON object, got an array");
        assert!(parse_arguments("\"src\"").is_err());
    }

    #[test]
    fn round_limit_is_at_least_one() {
        let dir = tempfile::tempdir().unwrap();
        let sandbox = crate::ToolSandbox::new(dir.path()).unwrap();
        let session = Session::new(ToolRegistry::new(sandbox)).with_max_tool_rounds(0);
        assert_eq!(session.max_tool_rounds(), 1);
    }
}
