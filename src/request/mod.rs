//! Request construction: transport selection and the two body builders.
//!
//! Both builders are pure; the same inputs always serialize to the same
//! bytes. Transport selection is re-evaluated on every call because the
//! conversation shape changes turn over turn.

mod raw;
mod standard;

pub use raw::{
    ChatTemplateKwargs, RawChatRequest, RawToolChoice, RawToolChoiceFunction, build_raw_request,
};
pub use standard::{StandardChatRequest, StandardMessage, build_standard_request};

use crate::types::{ChatOptions, Message};
use crate::vendor;

/// The built request body, discriminated by transport path.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Generic chat-completions shape.
    Standard(StandardChatRequest),
    /// Hand-built vendor-specific document carrying quirk fields.
    Raw(RawChatRequest),
}

/// Decide whether a call must take the raw transport path.
///
/// The standard message shape cannot express an assistant turn that carries
/// prior tool-call history, so any conversation already containing a tool
/// call is routed raw for round-trip fidelity. DashScope qwen3 is routed
/// raw unconditionally.
pub fn uses_raw_path(model: &str, base_url: &str, messages: &[Message]) -> bool {
    vendor::is_dashscope_qwen3(model, base_url) || vendor::has_tool_call_history(messages)
}

/// Build the request body for a non-streaming call, honoring transport
/// selection.
pub fn build_request(
    model: &str,
    base_url: &str,
    messages: &[Message],
    options: Option<&ChatOptions>,
) -> RequestBody {
    if uses_raw_path(model, base_url, messages) {
        RequestBody::Raw(build_raw_request(model, messages, options, false))
    } else {
        RequestBody::Standard(build_standard_request(model, messages, options, false))
    }
}
