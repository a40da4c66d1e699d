//! Agent loop limits and HTTP timeouts.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AgentConfig {
    /// Tool-execution rounds allowed per user turn (valid range: 1-1000).
    pub max_tool_rounds: u32,
    /// Whole-request timeout in seconds, including the stream (valid range: 1-3600).
    pub request_timeout_secs: u32,
    /// TCP/TLS connect timeout in seconds (valid range: 1-120).
    pub connect_timeout_secs: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_tool_rounds: 25,
            request_timeout_secs: 300,
            connect_timeout_secs: 10,
        }
    }
}
