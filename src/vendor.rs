//! Vendor identity predicates.
//!
//! Pure, stateless functions over explicit model-name/endpoint parameters.
//! The transport selector and the builders call these fresh on every
//! request; nothing here is cached.

use crate::types::Message;

/// DashScope's OpenAI-compatible endpoint, the only base URL on which the
/// qwen3 raw-path routing applies.
pub const DASHSCOPE_COMPATIBLE_BASE_URL: &str = "https://dashscope.aliyuncs.com/compatible-mode/v1";

/// qwen3 models served through DashScope's compatible-mode endpoint need
/// the raw transport path: their streaming and tool-calling semantics
/// diverge from the generic protocol.
pub fn is_dashscope_qwen3(model: &str, base_url: &str) -> bool {
    model.starts_with("qwen3-") && base_url == DASHSCOPE_COMPATIBLE_BASE_URL
}

/// DeepSeek-family models reject the `tool_choice` field; both builders
/// omit it entirely for them.
pub fn is_deepseek(model: &str) -> bool {
    model.to_lowercase().contains("deepseek")
}

/// Whether any turn in the conversation already carries tool invocations.
/// Such history cannot be expressed on the standard path.
pub fn has_tool_call_history(messages: &[Message]) -> bool {
    messages.iter().any(|m| !m.tool_calls.is_empty())
}
