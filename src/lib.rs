//! wirechat — vendor-quirk-aware chat dispatch for OpenAI-compatible LLM
//! backends.
//!
//! Backends that nominally speak the "chat completions" protocol diverge in
//! practice: some need a hand-built transport path for tool-calling
//! conversations, some expose vendor-only fields like a thinking toggle,
//! and streaming responses fragment tool-call payloads across many partial
//! frames. This crate normalizes all of that behind one vendor-neutral
//! surface:
//!
//! - [`types`] — vendor-neutral messages, options, responses and stream
//!   events
//! - [`vendor`] — pure vendor-identity predicates
//! - [`request`] — transport selection and the standard/raw request builders
//! - [`client`] — [`ChatClient`](client::ChatClient), the non-streaming
//!   dispatcher and streaming entry point
//! - [`streaming`] — the per-call aggregator reassembling fragmented tool
//!   calls into ordered, deterministic invocations
//!
//! # Example
//!
//! ```rust,no_run
//! use wirechat::client::{ChatClient, ChatConfig};
//! use wirechat::types::{ChatOptions, Message};
//!
//! # async fn run() -> Result<(), wirechat::error::ChatError> {
//! let client = ChatClient::new(ChatConfig {
//!     model_name: "qwen3-max".to_string(),
//!     api_key: "sk-...".to_string(),
//!     ..Default::default()
//! });
//!
//! let mut events = client
//!     .chat_stream(&[Message::user("hello")], Some(&ChatOptions::default()))
//!     .await?;
//! while let Some(event) = events.recv().await {
//!     println!("{event:?}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod request;
pub mod streaming;
pub mod traits;
pub mod types;
pub mod vendor;

pub use client::{ChatClient, ChatConfig, DEFAULT_BASE_URL};
pub use error::ChatError;
pub use traits::ChatModel;
pub use types::{
    ChatOptions, ChatResponse, FunctionCall, Message, MessageRole, StreamEvent, Tool, ToolCall,
    ToolChoice, ToolFunction, Usage,
};
