//! Completion client: provider-agnostic model types and the OpenAI adapter.

mod credentials;
mod error;
mod model;
mod provider;

pub mod adapters;

pub mod prelude {
    pub use crate::{
        Message, ModelProvider, ModelRequest, ModelResponse, ProviderError, ProviderErrorKind,
        ProviderFuture, ProviderId, Role, ToolCall, ToolChoice, ToolDefinition,
    };
}

pub use credentials::{SecretString, SecureCredentialManager};
pub use error::{ProviderError, ProviderErrorKind};
pub use model::{
    Message, ModelRequest, ModelRequestBuilder, ModelResponse, ProviderId, Role, StopReason,
    TokenUsage, ToolCall, ToolChoice, ToolDefinition,
};
pub use provider::{ModelProvider, ProviderFuture};
