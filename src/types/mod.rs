//! Vendor-neutral chat types.

mod chat;
mod options;
mod streaming;
mod tools;

pub use chat::{ChatResponse, Message, MessageRole, Usage, validate_conversation};
pub use options::ChatOptions;
pub use streaming::StreamEvent;
pub use tools::{FunctionCall, Tool, ToolCall, ToolChoice, ToolFunction};
