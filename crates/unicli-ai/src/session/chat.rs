//! The turn loop: request, reassemble, run tools, repeat.

use tracing::{debug, warn};
use unicli_common::new_tool_call_id;

use crate::{
    AiError, ChatClient, Message, SessionConfig, StreamAccumulator, StreamFragment,
};

use super::manager::Session;
use super::observer::{TurnEvent, TurnObserver};
use super::types::{StopReason, TurnOutcome};

impl Session {
    /// Add a user message and drive the model until it gives a final answer.
    ///
    /// Tool calls are executed one at a time in index order and their
    /// results fed back to the model. A remote failure ends the turn with
    /// `Err`; the user message stays in the log and no assistant message is
    /// added for the failed round.
    pub async fn run_turn(
        &mut self,
        client: &dyn ChatClient,
        config: &SessionConfig,
        input: &str,
        observer: &mut dyn TurnObserver,
    ) -> Result<TurnOutcome, AiError> {
        self.conversation.set_system_prompt(&config.system_prompt);
        self.conversation.push(Message::user(input));

        let mut tool_rounds: u32 = 0;

        loop {
            let request = tool_rounds + 1;
            debug!(
                session = %self.id,
                request,
                messages = self.conversation.len(),
                model = %config.model,
                "Requesting model response"
            );
            observer.on_event(TurnEvent::AwaitingModel { round: request });

            let mut accumulator = StreamAccumulator::new();
            let usage = {
                let mut on_fragment = |fragment: StreamFragment| {
                    if let Some(first) = accumulator.push(&fragment) {
                        observer.on_event(TurnEvent::OutputStarted(first));
                    }
                    if let Some(text) = fragment.content.as_deref().filter(|t| !t.is_empty()) {
                        observer.on_event(TurnEvent::TextDelta(text));
                    }
                };
                client
                    .stream_chat(
                        config,
                        self.conversation.messages(),
                        self.registry.definitions(),
                        &mut on_fragment,
                    )
                    .await?
            };
            observer.on_event(TurnEvent::ResponseComplete);
            self.tracker.record(&config.model, &usage);

            let response = accumulator.finish();
            if !response.gaps.is_empty() {
                warn!(gaps = ?response.gaps, "Tool call indices missing from stream");
            }

            if response.tool_calls.is_empty() {
                let content = non_empty(&response.content);
                self.conversation.push(Message::assistant(content));
                debug!(tool_rounds, total_tokens = self.tracker.total_tokens(), "Turn finished");
                return Ok(TurnOutcome {
                    content: response.content,
                    tool_rounds,
                    stop: StopReason::FinalAnswer,
                });
            }

            if tool_rounds >= self.max_tool_rounds {
                let limit = self.max_tool_rounds;
                warn!(limit, "Tool round limit reached, ending turn");
                observer.on_event(TurnEvent::ToolRoundLimit { limit });

                let notice = format!(
                    "[Stopped: reached the limit of {limit} tool rounds without a final answer]"
                );
                let content = match non_empty(&response.content) {
                    Some(text) => format!("{text}\n\n{notice}"),
                    None => notice,
                };
                self.conversation.push(Message::assistant(Some(content.clone())));
                return Ok(TurnOutcome {
                    content,
                    tool_rounds,
                    stop: StopReason::ToolRoundLimit,
                });
            }
            tool_rounds += 1;

            let mut tool_calls = response.tool_calls;
            for call in &mut tool_calls {
                if call.id.is_empty() {
                    call.id = new_tool_call_id();
                }
            }

            self.conversation.push(Message::Assistant {
                content: non_empty(&response.content),
                tool_calls: tool_calls.clone(),
            });

            debug!(round = tool_rounds, count = tool_calls.len(), "Executing tool calls");
            observer.on_event(TurnEvent::ExecutingTools {
                count: tool_calls.len(),
            });
            for call in &tool_calls {
                let output = self.execute_tool(call, observer).await;
                self.conversation.push(Message::tool(call.id.clone(), output));
            }
        }
    }
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}
