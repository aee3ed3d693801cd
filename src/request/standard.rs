//! Standard-path request shape.

use serde::Serialize;

use crate::types::{ChatOptions, Message, MessageRole, Tool};
use crate::vendor;

/// Generic chat-completions request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardChatRequest {
    pub model: String,
    pub messages: Vec<StandardMessage>,
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
    pub tool_choice: Option<&'static str>,
}

/// Standard-path message union.
///
/// Deliberately narrower than [`Message`]: there is no way to attach prior
/// assistant tool invocations here. Conversations that need them are routed
/// to the raw path by the transport selector.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum StandardMessage {
    System { content: String },
    User { content: String },
    Assistant { content: String },
    Tool { content: String, tool_call_id: String },
}

impl From<&Message> for StandardMessage {
    fn from(msg: &Message) -> Self {
        let content = msg.content.clone();
        match msg.role {
            MessageRole::System => Self::System { content },
            MessageRole::User => Self::User { content },
            MessageRole::Assistant => Self::Assistant { content },
            MessageRole::Tool => Self::Tool {
                content,
                tool_call_id: msg.tool_call_id.clone(),
            },
        }
    }
}

/// Build the standard-path request body.
///
/// Numeric options are written only when greater than zero; zero means
/// "backend default", never "explicit zero". `tool_choice` is mapped only
/// for the auto/none/required literals (and suppressed wholesale for
/// DeepSeek models); forcing a specific function is not representable on
/// this path. The thinking option is ignored here.
pub fn build_standard_request(
    model: &str,
    messages: &[Message],
    options: Option<&ChatOptions>,
    stream: bool,
) -> StandardChatRequest {
    let mut req = StandardChatRequest {
        model: model.to_string(),
        messages: messages.iter().map(StandardMessage::from).collect(),
        stream: stream.then_some(true),
        temperature: None,
        top_p: None,
        max_tokens: None,
        max_completion_tokens: None,
        frequency_penalty: None,
        presence_penalty: None,
        tools: None,
        tool_choice: None,
    };

    let Some(opts) = options else {
        return req;
    };

    req.temperature = positive_f32(opts.temperature);
    req.top_p = positive_f32(opts.top_p);
    req.max_tokens = positive_u32(opts.max_tokens);
    req.max_completion_tokens = positive_u32(opts.max_completion_tokens);
    req.frequency_penalty = positive_f32(opts.frequency_penalty);
    req.presence_penalty = positive_f32(opts.presence_penalty);

    if !opts.tools.is_empty() {
        req.tools = Some(opts.tools.clone());
    }

    if let Some(choice) = &opts.tool_choice
        && !vendor::is_deepseek(model)
    {
        req.tool_choice = choice.as_mode();
    }

    req
}

pub(crate) fn positive_f32(value: f32) -> Option<f32> {
    (value > 0.0).then_some(value)
}

pub(crate) fn positive_u32(value: u32) -> Option<u32> {
    (value > 0).then_some(value)
}
