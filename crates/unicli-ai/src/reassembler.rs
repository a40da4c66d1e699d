//! Reassembly of a streamed model response.
//!
//! Servers split both text and tool calls across many fragments. Text
//! deltas are concatenated in arrival order; tool-call deltas are keyed by
//! their position index and merged field by field until the stream ends.

use std::collections::BTreeMap;
use std::ops::Range;

use crate::ToolCallRequest;

/// One incremental piece of a streamed response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamFragment {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCallDelta>,
}

impl StreamFragment {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    pub fn tool_call(delta: ToolCallDelta) -> Self {
        Self {
            content: None,
            tool_calls: vec![delta],
        }
    }
}

/// A fragment of the tool call at `index`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolCallDelta {
    pub index: usize,
    pub id: Option<String>,
    pub name: Option<String>,
    pub arguments: Option<String>,
}

impl ToolCallDelta {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_arguments(mut self, arguments: impl Into<String>) -> Self {
        self.arguments = Some(arguments.into());
        self
    }
}

/// Kind of the first meaningful fragment of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstOutput {
    Text,
    ToolCall,
}

/// Per-round accumulation state; consumed by [`StreamAccumulator::finish`].
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    content: String,
    tool_calls: BTreeMap<usize, ToolCallRequest>,
    first_output: Option<FirstOutput>,
}

/// The finalized response of one model round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembledResponse {
    pub content: String,
    /// Tool calls in ascending index order.
    pub tool_calls: Vec<ToolCallRequest>,
    /// Index ranges no delta ever referenced. Always empty for well-formed streams.
    pub gaps: Vec<Range<usize>>,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one fragment.
    ///
    /// Returns `Some` exactly once: for the first fragment carrying
    /// non-empty text or any tool-call delta.
    pub fn push(&mut self, fragment: &StreamFragment) -> Option<FirstOutput> {
        let mut first = None;

        if let Some(text) = fragment.content.as_deref().filter(|t| !t.is_empty()) {
            self.content.push_str(text);
            first = first.or(self.mark_output(FirstOutput::Text));
        }

        for delta in &fragment.tool_calls {
            self.apply_delta(delta);
            first = first.or(self.mark_output(FirstOutput::ToolCall));
        }

        first
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    pub fn finish(self) -> AssembledResponse {
        let mut gaps = Vec::new();
        let mut expected = 0;
        for &index in self.tool_calls.keys() {
            if index > expected {
                gaps.push(expected..index);
            }
            expected = index.saturating_add(1);
        }

        AssembledResponse {
            content: self.content,
            tool_calls: self.tool_calls.into_values().collect(),
            gaps,
        }
    }

    fn apply_delta(&mut self, delta: &ToolCallDelta) {
        let call = self.tool_calls.entry(delta.index).or_default();

        // Ids arrive whole; some servers repeat them on every fragment.
        if let Some(id) = delta.id.as_deref().filter(|id| !id.is_empty()) {
            call.id = id.to_string();
        }
        if let Some(name) = &delta.name {
            call.name.push_str(name);
        }
        if let Some(arguments) = &delta.arguments {
            call.arguments.push_str(arguments);
        }
    }

    fn mark_output(&mut self, kind: FirstOutput) -> Option<FirstOutput> {
        if self.first_output.is_some() {
            return None;
        }
        self.first_output = Some(kind);
        Some(kind)
    }
}
