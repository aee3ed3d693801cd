//! Per-call chat options.

use super::tools::{Tool, ToolChoice};

/// Options recognized by both request builders.
///
/// Numeric fields follow the backend convention that zero means "use the
/// backend default": a field is written into the request only when it is
/// greater than zero. An explicit zero is indistinguishable from unset by
/// design.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    pub max_completion_tokens: u32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    /// Catalog of functions the backend may invoke.
    pub tools: Vec<Tool>,
    pub tool_choice: Option<ToolChoice>,
    /// Extended-reasoning toggle some vendors expose. Unset means the
    /// vendor default; the standard path ignores it entirely.
    pub thinking: Option<bool>,
}
