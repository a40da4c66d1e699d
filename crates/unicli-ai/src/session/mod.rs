//! Conversation session management.
//!
//! A `Session` owns the conversation log and the tool registry, and runs
//! the model/tool loop for each user turn.

mod chat;
mod conversation;
mod manager;
mod observer;
mod types;

pub use conversation::Conversation;
pub use manager::Session;
pub use observer::{NoopObserver, TurnEvent, TurnObserver};
pub use types::{StopReason, TurnOutcome};
