//! Non-fatal events recorded while a run proceeds.

use std::fmt::{Display, Formatter};

use wtooling::ToolError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The model asked for a tool that has no implementation.
    UnknownTool { tool_call_id: String, name: String },
    /// A tool failed and the failure was reported back to the model.
    ToolFailed {
        tool_call_id: String,
        name: String,
        error: ToolError,
    },
    /// The model repeated a tool call id that was already answered.
    DuplicateToolCall { tool_call_id: String, name: String },
    /// Tool calls in the second response, kept but not executed.
    IgnoredToolCalls { count: usize },
}

impl Diagnostic {
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownTool { .. } => "unknown_tool",
            Self::ToolFailed { .. } => "tool_failed",
            Self::DuplicateToolCall { .. } => "duplicate_tool_call",
            Self::IgnoredToolCalls { .. } => "ignored_tool_calls",
        }
    }

    pub fn tool_name(&self) -> Option<&str> {
        match self {
            Self::UnknownTool { name, .. }
            | Self::ToolFailed { name, .. }
            | Self::DuplicateToolCall { name, .. } => Some(name),
            Self::IgnoredToolCalls { .. } => None,
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownTool { tool_call_id, name } => {
                write!(f, "function {name} not available (call {tool_call_id})")
            }
            Self::ToolFailed {
                tool_call_id,
                name,
                error,
            } => write!(
                f,
                "function {name} failed (call {tool_call_id}): {}",
                error.message
            ),
            Self::DuplicateToolCall { tool_call_id, name } => {
                write!(f, "function {name} call {tool_call_id} was already answered")
            }
            Self::IgnoredToolCalls { count } => {
                write!(f, "ignored {count} tool call(s) in the final response")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_tool() {
        let diagnostic = Diagnostic::UnknownTool {
            tool_call_id: "call_3".to_string(),
            name: "get_stock_price".to_string(),
        };

        assert_eq!(diagnostic.code(), "unknown_tool");
        assert_eq!(diagnostic.tool_name(), Some("get_stock_price"));
        assert_eq!(
            diagnostic.to_string(),
            "function get_stock_price not available (call call_3)"
        );
        assert_eq!(
            Diagnostic::IgnoredToolCalls { count: 2 }.to_string(),
            "ignored 2 tool call(s) in the final response"
        );
    }
}
