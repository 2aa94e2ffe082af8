//! Weather question answering over one round of model function calls.
//!
//! This crate wires the workspace crates together: configuration from the
//! environment, the OpenAI provider, the mocked weather function and the
//! observability hooks.
//!
//! ```rust,no_run
//! use weatherwise::{AppConfig, build_runtime_from_config, final_output};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! let runtime = build_runtime_from_config(&config)?;
//! let run = runtime.chat.run_conversation(config.prompt.clone()).await?;
//! match final_output(&run) {
//!     Ok(answer) => println!("{answer}"),
//!     Err(reason) => println!("{reason}"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod providers;
pub mod runtime;
pub mod weather;

pub use wchat;
pub use wcommon;
pub use wobserve;
pub use wprovider;
pub use wtooling;

pub use config::{AppConfig, ConfigError, ConfigErrorKind};
pub use providers::{
    ProviderBuildConfig, build_provider_from_app_config, build_provider_with_config,
};
pub use runtime::{
    EMPTY_ANSWER_MESSAGE, NO_RESPONSE_MESSAGE, RuntimeBundle, build_runtime,
    build_runtime_from_config, chat_service, final_output, tool_registry, tool_runtime,
};
pub use wchat::{
    ChatError, ChatErrorKind, ChatRun, ChatService, Conversation, Diagnostic, RunId, RunOutcome,
    ToolFailurePolicy,
};
pub use weather::{TemperatureUnit, WeatherReport, function_table, get_current_weather};

pub mod prelude {
    pub use crate::{
        AppConfig, ChatRun, ChatService, RunOutcome, RuntimeBundle, build_runtime,
        build_runtime_from_config, final_output,
    };
}
