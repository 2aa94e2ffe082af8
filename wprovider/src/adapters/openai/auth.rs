//! OpenAI-specific credential helpers and auth resolution.

use crate::{ProviderError, ProviderId, SecureCredentialManager};

use super::types::OpenAiAuth;

impl SecureCredentialManager {
    /// Stores an OpenAI API key. The key format is not checked locally; a bad
    /// key surfaces as an authentication failure from the endpoint.
    pub fn set_openai_api_key(&self, api_key: impl Into<String>) -> Result<(), ProviderError> {
        self.set_api_key(ProviderId::OpenAi, api_key)
    }
}

pub(crate) fn resolve_openai_auth(
    credentials: &SecureCredentialManager,
) -> Result<OpenAiAuth, ProviderError> {
    if let Some(api_key) = credentials.api_key(ProviderId::OpenAi)? {
        return Ok(OpenAiAuth { api_key });
    }

    Err(ProviderError::authentication(
        "no OpenAI API key configured",
    ))
}
