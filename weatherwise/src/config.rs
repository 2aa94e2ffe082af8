//! Application configuration read from the process environment.
//!
//! ```rust
//! use std::time::Duration;
//!
//! use weatherwise::AppConfig;
//!
//! let config = AppConfig::from_lookup(|name| match name {
//!     "WEATHERWISE_MODEL" => Some("gpt-4o".to_string()),
//!     "WEATHERWISE_TIMEOUT_SECS" => Some("30".to_string()),
//!     _ => None,
//! })
//! .expect("config should load");
//!
//! assert_eq!(config.model, "gpt-4o");
//! assert_eq!(config.timeout, Duration::from_secs(30));
//! assert!(config.api_key.is_none());
//! ```

use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

use wchat::{DEFAULT_MODEL, ToolFailurePolicy};
use wprovider::SecretString;

pub const TOOLS_PATH_VAR: &str = "WEATHERWISE_TOOLS_PATH";
pub const BASE_URL_VAR: &str = "WEATHERWISE_BASE_URL";
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const MODEL_VAR: &str = "WEATHERWISE_MODEL";
pub const PROMPT_VAR: &str = "WEATHERWISE_PROMPT";
pub const SYSTEM_PROMPT_VAR: &str = "WEATHERWISE_SYSTEM_PROMPT";
pub const TIMEOUT_VAR: &str = "WEATHERWISE_TIMEOUT_SECS";
pub const TOOL_FAILURE_POLICY_VAR: &str = "WEATHERWISE_TOOL_FAILURE_POLICY";

pub const DEFAULT_TOOLS_PATH: &str = "tools.json";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_PROMPT: &str = "What's the weather like in San Francisco, Tokyo, and Paris?";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    InvalidValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub kind: ConfigErrorKind,
    pub variable: String,
    pub message: String,
}

impl ConfigError {
    pub fn invalid_value(variable: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ConfigErrorKind::InvalidValue,
            variable: variable.into(),
            message: message.into(),
        }
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid value for {}: {}", self.variable, self.message)
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub tools_path: PathBuf,
    pub base_url: String,
    /// Absent keys are not an error here; the first completion fails instead.
    pub api_key: Option<SecretString>,
    pub model: String,
    pub prompt: String,
    pub system_prompt: Option<String>,
    pub timeout: Duration,
    pub tool_failure_policy: ToolFailurePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tools_path: PathBuf::from(DEFAULT_TOOLS_PATH),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            system_prompt: None,
            timeout: DEFAULT_TIMEOUT,
            tool_failure_policy: ToolFailurePolicy::default(),
        }
    }
}

impl AppConfig {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a local `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();

        if let Some(path) = value(TOOLS_PATH_VAR) {
            config.tools_path = PathBuf::from(path);
        }
        if let Some(base_url) = value(BASE_URL_VAR) {
            config.base_url = base_url;
        }
        config.api_key = value(API_KEY_VAR).map(SecretString::new);
        if let Some(model) = value(MODEL_VAR) {
            config.model = model;
        }
        if let Some(prompt) = value(PROMPT_VAR) {
            config.prompt = prompt;
        }
        config.system_prompt = value(SYSTEM_PROMPT_VAR);
        if let Some(timeout) = value(TIMEOUT_VAR) {
            config.timeout = parse_timeout(&timeout)?;
        }
        if let Some(policy) = value(TOOL_FAILURE_POLICY_VAR) {
            config.tool_failure_policy = parse_tool_failure_policy(&policy)?;
        }

        Ok(config)
    }

    pub fn with_tools_path(mut self, tools_path: impl Into<PathBuf>) -> Self {
        self.tools_path = tools_path.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(api_key));
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_tool_failure_policy(mut self, policy: ToolFailurePolicy) -> Self {
        self.tool_failure_policy = policy;
        self
    }
}

fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
    let seconds = value.parse::<u64>().map_err(|_| {
        ConfigError::invalid_value(TIMEOUT_VAR, format!("'{value}' is not a whole number of seconds"))
    })?;
    if seconds == 0 {
        return Err(ConfigError::invalid_value(
            TIMEOUT_VAR,
            "timeout must be greater than zero",
        ));
    }

    Ok(Duration::from_secs(seconds))
}

fn parse_tool_failure_policy(value: &str) -> Result<ToolFailurePolicy, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "contain" => Ok(ToolFailurePolicy::Contain),
        "abort" => Ok(ToolFailurePolicy::Abort),
        other => Err(ConfigError::invalid_value(
            TOOL_FAILURE_POLICY_VAR,
            format!("expected 'contain' or 'abort', got '{other}'"),
        )),
    }
}
