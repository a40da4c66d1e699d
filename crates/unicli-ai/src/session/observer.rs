//! Progress notifications emitted while a turn runs.

use crate::FirstOutput;

/// A step of the turn, in the order it happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnEvent<'a> {
    /// A request is about to be sent; `round` counts requests within the turn from 1.
    AwaitingModel { round: u32 },
    /// First meaningful fragment of the current response.
    OutputStarted(FirstOutput),
    TextDelta(&'a str),
    /// The current response stream ended successfully.
    ResponseComplete,
    ExecutingTools { count: usize },
    /// `arguments` is the parsed argument object as compact JSON.
    ToolStarted { name: &'a str, arguments: &'a str },
    /// Arguments were not a JSON object; the tool runs with `{}`.
    ArgumentParseError { name: &'a str, error: &'a str },
    ToolFinished { name: &'a str, output: &'a str },
    ToolRoundLimit { limit: u32 },
}

/// Receives [`TurnEvent`]s from [`Session::run_turn`](super::Session::run_turn).
pub trait TurnObserver: Send {
    fn on_event(&mut self, event: TurnEvent<'_>);
}

impl<F> TurnObserver for F
where
    F: FnMut(TurnEvent<'_>) + Send,
{
    fn on_event(&mut self, event: TurnEvent<'_>) {
        self(event)
    }
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl TurnObserver for NoopObserver {
    fn on_event(&mut self, _event: TurnEvent<'_>) {}
}
