//! Conversation turns and terminal chat responses.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::tools::ToolCall;
use crate::error::ChatError;

/// Role of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
}

/// One conversation turn.
///
/// The serde shape of this struct is exactly the raw wire shape expected by
/// OpenAI-compatible backends, so raw-path requests serialize it directly.
/// `content` may be empty when the turn is a pure tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    #[serde(default)]
    pub content: String,
    /// Tool invocations requested by an assistant turn, in backend order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// On tool-role turns, the id of the invocation this turn answers.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tool_call_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(MessageRole::Assistant, content)
    }

    /// An assistant turn that carries prior tool invocations.
    pub fn assistant_with_tool_calls(
        content: impl Into<String>,
        tool_calls: Vec<ToolCall>,
    ) -> Self {
        Self {
            tool_calls,
            ..Self::plain(MessageRole::Assistant, content)
        }
    }

    /// A tool-role turn answering the invocation identified by `tool_call_id`.
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            ..Self::plain(MessageRole::Tool, content)
        }
    }

    fn plain(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: String::new(),
            name: String::new(),
        }
    }
}

/// Validate conversation shape before any network call.
///
/// Rejects tool-role turns without a `tool_call_id` back-reference and
/// assistant turns whose tool invocations reuse an id.
pub fn validate_conversation(messages: &[Message]) -> Result<(), ChatError> {
    for (i, msg) in messages.iter().enumerate() {
        if msg.role == MessageRole::Tool && msg.tool_call_id.is_empty() {
            return Err(ChatError::InvalidMessage(format!(
                "tool message at index {i} is missing tool_call_id"
            )));
        }
        if msg.role == MessageRole::Assistant && !msg.tool_calls.is_empty() {
            let mut seen = HashSet::new();
            for tc in &msg.tool_calls {
                if !seen.insert(tc.id.as_str()) {
                    return Err(ChatError::InvalidMessage(format!(
                        "assistant message at index {i} has duplicate tool call id {:?}",
                        tc.id
                    )));
                }
            }
        }
    }
    Ok(())
}

/// Token usage reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// Terminal result of a non-streaming chat call.
///
/// Fields absent from the backend envelope stay at their defaults; nothing
/// is synthesized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub finish_reason: String,
    #[serde(default)]
    pub usage: Usage,
    /// Tool invocations, in backend order. Non-streaming tool calls arrive
    /// whole; no aggregation is involved.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
}
