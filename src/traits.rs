//! Capability traits at the caller-facing seam.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::client::ChatClient;
use crate::error::ChatError;
use crate::types::{ChatOptions, ChatResponse, Message, StreamEvent};

/// A backend able to run chat conversations with optional tool invocation.
///
/// The streaming method returns an ordered single-consumer channel; channel
/// close is the end-of-stream signal and the last event on every stream is
/// an answer with `done: true`. Errors are returned only for failures that
/// happen before any event can be produced.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn chat(
        &self,
        messages: &[Message],
        options: Option<&ChatOptions>,
    ) -> Result<ChatResponse, ChatError>;

    async fn chat_stream(
        &self,
        messages: &[Message],
        options: Option<&ChatOptions>,
    ) -> Result<mpsc::Receiver<StreamEvent>, ChatError>;
}

#[async_trait]
impl ChatModel for crate::client::ChatClient {
    async fn chat(
        &self,
        messages: &[Message],
        options: Option<&ChatOptions>,
    ) -> Result<ChatResponse, ChatError> {
        ChatClient::chat(self, messages, options).await
    }

    async fn chat_stream(
        &self,
        messages: &[Message],
        options: Option<&ChatOptions>,
    ) -> Result<mpsc::Receiver<StreamEvent>, ChatError> {
        ChatClient::chat_stream(self, messages, options).await
    }
}
