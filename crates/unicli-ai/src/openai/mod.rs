//! OpenAI-compatible chat-completions client.
//!
//! Works with any server exposing `POST {base}/chat/completions` with SSE
//! streaming (OpenAI, Ollama, LM Studio, vLLM, ...).

mod api;
mod client;
mod wire;

pub use client::{ClientOptions, OpenAiClient};
pub use wire::decode_stream;
