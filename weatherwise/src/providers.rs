//! Completion provider construction from application configuration.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use wprovider::{ModelProvider, ProviderError, SecureCredentialManager};

use crate::AppConfig;

#[derive(Debug, Clone)]
pub struct ProviderBuildConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl ProviderBuildConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_key: None,
            base_url: base_url.into(),
            model: wchat::DEFAULT_MODEL.to_string(),
            timeout: crate::config::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl From<&AppConfig> for ProviderBuildConfig {
    fn from(config: &AppConfig) -> Self {
        let mut build = Self::new(config.base_url.clone())
            .with_model(config.model.clone())
            .with_timeout(config.timeout);
        if let Some(api_key) = &config.api_key {
            build = build.with_api_key(api_key.expose());
        }
        build
    }
}

/// Builds the OpenAI provider. A missing key is not an error here: the
/// provider reports an authentication failure on its first completion.
pub fn build_provider_with_config(
    config: ProviderBuildConfig,
) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    let credentials = Arc::new(SecureCredentialManager::new());
    match config.api_key.as_deref().map(str::trim) {
        Some(api_key) if !api_key.is_empty() => credentials.set_openai_api_key(api_key)?,
        _ => tracing::warn!(
            phase = "startup",
            event = "missing_credentials",
            "OPENAI_API_KEY is not set; completions will fail authentication"
        ),
    }

    let http = Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|err| ProviderError::transport(err.to_string()))?;

    build_openai_provider(credentials, http, config.base_url, config.model)
}

pub fn build_provider_from_app_config(
    config: &AppConfig,
) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    build_provider_with_config(ProviderBuildConfig::from(config))
}

#[cfg(feature = "provider-openai")]
fn build_openai_provider(
    credentials: Arc<SecureCredentialManager>,
    http: Client,
    base_url: String,
    model: String,
) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    use wprovider::adapters::openai::{OpenAiHttpTransport, OpenAiProvider};

    let transport = Arc::new(OpenAiHttpTransport::new(http).with_base_url(base_url));
    Ok(Arc::new(
        OpenAiProvider::new(credentials, transport).with_fallback_model(model),
    ))
}

#[cfg(not(feature = "provider-openai"))]
fn build_openai_provider(
    _credentials: Arc<SecureCredentialManager>,
    _http: Client,
    _base_url: String,
    _model: String,
) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    Err(ProviderError::invalid_request(
        "provider-openai feature is not enabled on weatherwise",
    ))
}
