//! Chat-layer errors and classification.

use std::error::Error;
use std::fmt::{Display, Formatter};

use wprovider::{ProviderError, ProviderErrorKind};
use wtooling::{ToolError, ToolErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorKind {
    InvalidRequest,
    Provider,
    Tooling,
    /// The conversation log refused an append.
    Protocol,
}

/// Kind of the lower-layer error a chat error was converted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorSource {
    Provider(ProviderErrorKind),
    Tool(ToolErrorKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatError {
    pub kind: ChatErrorKind,
    pub message: String,
    pub source: Option<ChatErrorSource>,
}

impl ChatError {
    pub fn new(kind: ChatErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::InvalidRequest, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Provider, message)
    }

    pub fn tooling(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Tooling, message)
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Protocol, message)
    }

    pub fn with_source(mut self, source: ChatErrorSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn provider_kind(&self) -> Option<ProviderErrorKind> {
        match self.source {
            Some(ChatErrorSource::Provider(kind)) => Some(kind),
            _ => None,
        }
    }

    pub fn tool_kind(&self) -> Option<ToolErrorKind> {
        match self.source {
            Some(ChatErrorSource::Tool(kind)) => Some(kind),
            _ => None,
        }
    }
}

impl Display for ChatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ChatError {}

impl From<ProviderError> for ChatError {
    fn from(value: ProviderError) -> Self {
        ChatError::provider(value.to_string()).with_source(ChatErrorSource::Provider(value.kind))
    }
}

impl From<ToolError> for ChatError {
    fn from(value: ToolError) -> Self {
        ChatError::tooling(value.to_string()).with_source(ChatErrorSource::Tool(value.kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_keep_their_kind() {
        let error = ChatError::from(ProviderError::authentication("no OpenAI API key configured"));

        assert_eq!(error.kind, ChatErrorKind::Provider);
        assert_eq!(error.provider_kind(), Some(ProviderErrorKind::Authentication));
        assert_eq!(error.tool_kind(), None);
        assert!(error.message.contains("no OpenAI API key configured"));
    }

    #[test]
    fn tool_errors_keep_their_kind_and_context() {
        let error = ChatError::from(
            ToolError::execution("sensor offline").with_tool_name("get_current_weather"),
        );

        assert_eq!(error.kind, ChatErrorKind::Tooling);
        assert_eq!(error.tool_kind(), Some(ToolErrorKind::Execution));
        assert_eq!(
            error.to_string(),
            "Tooling: Execution [tool=get_current_weather]: sensor offline"
        );
    }
}
