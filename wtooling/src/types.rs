//! Tool runtime context and execution result types.

use wcommon::RunId;
use wprovider::{Message, ToolCall};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolExecutionContext {
    pub run_id: RunId,
}

impl ToolExecutionContext {
    pub fn new(run_id: impl Into<RunId>) -> Self {
        Self {
            run_id: run_id.into(),
        }
    }
}

/// Literal output of one successful tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolExecutionResult {
    pub tool_call_id: String,
    pub tool_name: String,
    pub output: String,
}

impl ToolExecutionResult {
    pub fn new(
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            output: output.into(),
        }
    }

    pub fn from_call(call: &ToolCall, output: impl Into<String>) -> Self {
        Self::new(call.id.clone(), call.name.clone(), output)
    }

    pub fn into_message(self) -> Message {
        Message::tool_result(self.tool_call_id, self.tool_name, self.output)
    }
}

#[cfg(test)]
mod tests {
    use wprovider::Role;

    use super::*;

    #[test]
    fn result_becomes_tool_role_message() {
        let call = ToolCall {
            id: "call_9".to_string(),
            name: "get_current_weather".to_string(),
            arguments: "{}".to_string(),
        };

        let message = ToolExecutionResult::from_call(&call, "{\"temperature\":\"10\"}").into_message();
        assert_eq!(message.role, Role::Tool);
        assert_eq!(message.tool_call_id.as_deref(), Some("call_9"));
        assert_eq!(message.name.as_deref(), Some("get_current_weather"));
        assert_eq!(message.content.as_deref(), Some("{\"temperature\":\"10\"}"));
    }
}
