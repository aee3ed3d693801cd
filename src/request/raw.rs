//! Raw-path request shape.
//!
//! A fully vendor-specific document built by hand where the standard shape
//! cannot express what the backend needs: assistant turns carrying prior
//! tool invocations, a forced function `tool_choice`, and the qwen
//! `enable_thinking` toggles.

use serde::Serialize;

use super::standard::{positive_f32, positive_u32};
use crate::types::{ChatOptions, Message, Tool, ToolChoice};
use crate::vendor;

/// Vendor-specific chat-completions request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawChatRequest {
    pub model: String,
    /// Serialized straight from the vendor-neutral turns; round-trips
    /// tool-call history verbatim.
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<RawToolChoice>,
    /// Always present; carries the resolved thinking flag.
    pub chat_template_kwargs: ChatTemplateKwargs,
    /// qwen quirk: synchronous calls must disable thinking through this
    /// separate top-level field, whatever the caller asked for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_thinking: Option<bool>,
}

/// Raw-path `tool_choice`: either a mode literal or a forced function.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawToolChoice {
    Mode(&'static str),
    Function {
        #[serde(rename = "type")]
        kind: &'static str,
        function: RawToolChoiceFunction,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawToolChoiceFunction {
    pub name: String,
}

impl RawToolChoice {
    fn function(name: &str) -> Self {
        Self::Function {
            kind: "function",
            function: RawToolChoiceFunction {
                name: name.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatTemplateKwargs {
    pub enable_thinking: bool,
}

/// Build the raw-path request body.
///
/// Includes everything the standard builder includes, plus the structured
/// function `tool_choice` and the thinking fields. DeepSeek models get no
/// `tool_choice` at all.
pub fn build_raw_request(
    model: &str,
    messages: &[Message],
    options: Option<&ChatOptions>,
    stream: bool,
) -> RawChatRequest {
    let mut req = RawChatRequest {
        model: model.to_string(),
        messages: messages.to_vec(),
        stream: stream.then_some(true),
        temperature: None,
        top_p: None,
        max_tokens: None,
        max_completion_tokens: None,
        frequency_penalty: None,
        presence_penalty: None,
        tools: None,
        tool_choice: None,
        chat_template_kwargs: ChatTemplateKwargs {
            enable_thinking: false,
        },
        enable_thinking: None,
    };

    let mut thinking = false;

    if let Some(opts) = options {
        req.temperature = positive_f32(opts.temperature);
        req.top_p = positive_f32(opts.top_p);
        req.max_tokens = positive_u32(opts.max_tokens);
        req.max_completion_tokens = positive_u32(opts.max_completion_tokens);
        req.frequency_penalty = positive_f32(opts.frequency_penalty);
        req.presence_penalty = positive_f32(opts.presence_penalty);

        if let Some(flag) = opts.thinking {
            thinking = flag;
        }

        if !opts.tools.is_empty() {
            req.tools = Some(opts.tools.clone());
        }

        if let Some(choice) = &opts.tool_choice
            && !vendor::is_deepseek(model)
        {
            req.tool_choice = Some(match choice {
                ToolChoice::Function(name) => RawToolChoice::function(name),
                ToolChoice::Auto => RawToolChoice::Mode("auto"),
                ToolChoice::None => RawToolChoice::Mode("none"),
                ToolChoice::Required => RawToolChoice::Mode("required"),
            });
        }
    }

    req.chat_template_kwargs = ChatTemplateKwargs {
        enable_thinking: thinking,
    };

    if !stream {
        req.enable_thinking = Some(false);
    }

    req
}
