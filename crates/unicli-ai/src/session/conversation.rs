//! The ordered message log sent to the model.

use crate::Message;

/// Append-only conversation history.
///
/// Only the session mutates it. The leading system message is the one
/// exception to append-only: it is replaced when the prompt changes.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub(crate) fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Install `prompt` as the leading system message. An empty prompt
    /// removes it.
    pub(crate) fn set_system_prompt(&mut self, prompt: &str) {
        let has_system = matches!(self.messages.first(), Some(Message::System { .. }));
        match (has_system, prompt.is_empty()) {
            (true, true) => {
                self.messages.remove(0);
            }
            (true, false) => self.messages[0] = Message::system(prompt),
            (false, false) => self.messages.insert(0, Message::system(prompt)),
            (false, true) => {}
        }
    }
}
