//! Turn result types.

/// Why a turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The model answered without requesting tools.
    FinalAnswer,
    /// The model kept requesting tools past the configured round limit.
    ToolRoundLimit,
}

/// Result of one successful turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Content of the final assistant message (may be empty).
    pub content: String,
    /// Number of tool rounds executed during the turn.
    pub tool_rounds: u32,
    pub stop: StopReason,
}
