//! Tool definitions and tool invocations.

use serde::{Deserialize, Serialize};

/// A function the backend may ask the caller to invoke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Currently always `"function"`.
    #[serde(rename = "type")]
    pub kind: String,
    pub function: ToolFunction,
}

impl Tool {
    /// Create a function tool from a name, description and JSON-schema
    /// parameter description.
    ///
    /// ```
    /// use wirechat::types::Tool;
    ///
    /// let tool = Tool::function(
    ///     "get_weather",
    ///     "Get weather information",
    ///     serde_json::json!({
    ///         "type": "object",
    ///         "properties": { "location": { "type": "string" } }
    ///     }),
    /// );
    /// ```
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            kind: "function".to_string(),
            function: ToolFunction {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

/// Function signature advertised to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolFunction {
    pub name: String,
    pub description: String,
    /// JSON-schema description of the function parameters.
    pub parameters: serde_json::Value,
}

/// How the backend should choose among the advertised tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolChoice {
    /// Backend decides whether to call a tool.
    Auto,
    /// Tool calling disabled for this request.
    None,
    /// Backend must call some tool.
    Required,
    /// Force one specific function by name. Only expressible on the raw
    /// path; the standard builder omits it.
    Function(String),
}

impl ToolChoice {
    /// The wire literal for the non-forcing modes.
    pub(crate) fn as_mode(&self) -> Option<&'static str> {
        match self {
            Self::Auto => Some("auto"),
            Self::None => Some("none"),
            Self::Required => Some("required"),
            Self::Function(_) => None,
        }
    }
}

/// A single function invocation requested by the backend.
///
/// During streaming an instance is created empty when its index is first
/// observed, mutated by successive partial frames and immutable once the
/// stream completes. `arguments` holds JSON text that may be syntactically
/// incomplete until then.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Vendor-assigned id, unique within a response.
    #[serde(default)]
    pub id: String,
    /// Currently always `"function"`.
    #[serde(default, rename = "type")]
    pub call_type: String,
    #[serde(default)]
    pub function: FunctionCall,
}

/// Name and JSON-encoded arguments of an invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}
