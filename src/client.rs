//! Chat client: per-call transport selection, non-streaming dispatch and
//! streaming setup.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::ChatError;
use crate::request::{self, RequestBody};
use crate::streaming::spawn_stream_task;
use crate::types::{
    ChatOptions, ChatResponse, Message, StreamEvent, ToolCall, Usage, validate_conversation,
};

/// Default endpoint when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for a [`ChatClient`].
#[derive(Debug, Clone, Default)]
pub struct ChatConfig {
    /// Model name sent to the backend; also drives vendor detection.
    pub model_name: String,
    /// Caller-side identifier for this model configuration.
    pub model_id: String,
    /// Backend base URL; [`DEFAULT_BASE_URL`] when empty.
    pub base_url: String,
    pub api_key: String,
}

/// Client for one OpenAI-compatible chat backend.
///
/// Holds no per-call state; transport selection is re-evaluated on every
/// call from the model identity and the conversation shape.
#[derive(Debug, Clone)]
pub struct ChatClient {
    model_name: String,
    model_id: String,
    base_url: String,
    api_key: SecretString,
    http_client: reqwest::Client,
}

impl ChatClient {
    pub fn new(config: ChatConfig) -> Self {
        let base_url = if config.base_url.is_empty() {
            DEFAULT_BASE_URL.to_string()
        } else {
            config.base_url
        };
        Self {
            model_name: config.model_name,
            model_id: config.model_id,
            base_url,
            api_key: config.api_key.into(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Use a caller-configured HTTP client (timeouts, proxies, ...).
    pub fn with_http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = http_client;
        self
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// One non-streaming request/response cycle.
    ///
    /// Routes to the raw transport path for DashScope qwen3 and for any
    /// conversation that already carries tool-call history; otherwise takes
    /// the standard path. Neither path retries.
    pub async fn chat(
        &self,
        messages: &[Message],
        options: Option<&ChatOptions>,
    ) -> Result<ChatResponse, ChatError> {
        validate_conversation(messages)?;

        let body = request::build_request(&self.model_name, &self.base_url, messages, options);
        debug!(
            model = %self.model_name,
            raw_path = matches!(body, RequestBody::Raw(_)),
            "dispatching chat request"
        );

        let envelope = match &body {
            RequestBody::Standard(req) => self.post_chat_completions(req).await?,
            RequestBody::Raw(req) => self.post_chat_completions(req).await?,
        };
        decode_response(envelope)
    }

    /// Start a streaming call and return the event channel.
    ///
    /// Errors are returned only for failures that occur before any event
    /// can be produced (construction, connect, non-200). Once streaming has
    /// begun, failures are logged and the channel still closes after a
    /// well-formed terminal event. Dropping the receiver cancels the call.
    ///
    /// Streaming always takes the standard request shape; raw-path calls
    /// are non-streaming only.
    pub async fn chat_stream(
        &self,
        messages: &[Message],
        options: Option<&ChatOptions>,
    ) -> Result<mpsc::Receiver<StreamEvent>, ChatError> {
        validate_conversation(messages)?;

        let req = request::build_standard_request(&self.model_name, messages, options, true);
        debug!(model = %self.model_name, "dispatching streaming chat request");

        let response = self.send(&req).await?;
        let response = require_ok(response).await?;

        let (tx, rx) = mpsc::channel(1);
        spawn_stream_task(response, tx);
        Ok(rx)
    }

    async fn post_chat_completions<B: serde::Serialize + ?Sized>(
        &self,
        body: &B,
    ) -> Result<ChatEnvelope, ChatError> {
        let response = self.send(body).await?;
        let response = require_ok(response).await?;
        response
            .json::<ChatEnvelope>()
            .await
            .map_err(|e| ChatError::Decode(e.to_string()))
    }

    async fn send<B: serde::Serialize + ?Sized>(
        &self,
        body: &B,
    ) -> Result<reqwest::Response, ChatError> {
        self.http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| ChatError::Http(format!("send request: {e}")))
    }
}

/// Fail with status and body carried verbatim on any non-200 reply.
async fn require_ok(response: reqwest::Response) -> Result<reqwest::Response, ChatError> {
    let status = response.status();
    if status != reqwest::StatusCode::OK {
        let body = response.text().await.unwrap_or_default();
        return Err(ChatError::backend(status.as_u16(), body));
    }
    Ok(response)
}

/// Minimal response envelope shared by both transport paths. Fields the
/// backend leaves out stay at their defaults in [`ChatResponse`].
#[derive(Debug, Deserialize)]
struct ChatEnvelope {
    #[serde(default)]
    choices: Vec<EnvelopeChoice>,
    #[serde(default)]
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct EnvelopeChoice {
    #[serde(default)]
    message: EnvelopeMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct EnvelopeMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<ToolCall>,
}

fn decode_response(mut envelope: ChatEnvelope) -> Result<ChatResponse, ChatError> {
    if envelope.choices.is_empty() {
        return Err(ChatError::EmptyResponse);
    }
    let choice = envelope.choices.remove(0);
    Ok(ChatResponse {
        content: choice.message.content.unwrap_or_default(),
        finish_reason: choice.finish_reason.unwrap_or_default(),
        usage: envelope.usage,
        tool_calls: choice.message.tool_calls,
    })
}
