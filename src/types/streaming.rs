//! Events emitted on the streaming channel.

use serde::{Deserialize, Serialize};

use super::tools::ToolCall;

/// One unit emitted during a streaming chat call.
///
/// Serializes with a `response_type` tag (`answer` / `tool_call_started`)
/// so downstream consumers can forward events verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "response_type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Incremental text, plus the full ordered snapshot of tool calls
    /// assembled so far. The last event of every stream is an `Answer`
    /// with empty content and `done: true`.
    Answer {
        #[serde(default)]
        content: String,
        #[serde(default)]
        done: bool,
        /// Snapshot in ascending index order; absent when no tool call has
        /// been observed yet.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tool_calls: Option<Vec<ToolCall>>,
    },
    /// A tool invocation became addressable: its name has stabilized and
    /// its id is known. Emitted at most once per invocation.
    ToolCallStarted {
        tool_name: String,
        tool_call_id: String,
    },
}

impl StreamEvent {
    /// Terminal-marker check for consumers that only watch for end-of-turn.
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Answer { done: true, .. })
    }
}
