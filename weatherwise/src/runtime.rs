//! Runtime wiring: catalog, registry, tool runtime and chat service.

use std::path::Path;
use std::sync::Arc;

use wchat::{ChatRun, ChatService, RunOutcome};
use wobserve::{
    CombinedHooks, MetricsObservabilityHooks, SafeChatHooks, SafeToolHooks,
    TracingObservabilityHooks,
};
use wprovider::{ModelProvider, ProviderError};
use wtooling::{DefaultToolRuntime, FunctionTable, ToolCatalog, ToolRegistry, ToolRuntime};

use crate::{AppConfig, build_provider_from_app_config, weather};

pub const NO_RESPONSE_MESSAGE: &str = "Failed to get a response.";
pub const EMPTY_ANSWER_MESSAGE: &str = "The model returned an empty answer.";

#[derive(Clone)]
pub struct RuntimeBundle {
    pub registry: Arc<ToolRegistry>,
    pub chat: ChatService,
}

type ObservabilityHooks = CombinedHooks<TracingObservabilityHooks, MetricsObservabilityHooks>;

fn observability_hooks() -> ObservabilityHooks {
    CombinedHooks::new(TracingObservabilityHooks, MetricsObservabilityHooks)
}

/// Loads the descriptor file and binds it to `table`. A file that cannot be
/// loaded yields an empty registry.
pub fn tool_registry(path: impl AsRef<Path>, table: &FunctionTable) -> Arc<ToolRegistry> {
    let catalog = ToolCatalog::load_or_empty(path);
    Arc::new(ToolRegistry::from_catalog(catalog, table))
}

pub fn tool_runtime(registry: Arc<ToolRegistry>) -> Arc<dyn ToolRuntime> {
    Arc::new(
        DefaultToolRuntime::new(registry)
            .with_hooks(Arc::new(SafeToolHooks::new(observability_hooks()))),
    )
}

pub fn chat_service(
    config: &AppConfig,
    provider: Arc<dyn ModelProvider>,
    tool_runtime: Arc<dyn ToolRuntime>,
) -> ChatService {
    let mut builder = ChatService::builder(provider)
        .tool_runtime(tool_runtime)
        .hooks(Arc::new(SafeChatHooks::new(observability_hooks())))
        .model(config.model.clone())
        .tool_failure_policy(config.tool_failure_policy);

    if let Some(system_prompt) = &config.system_prompt {
        builder = builder.system_prompt(system_prompt.clone());
    }

    builder.build()
}

/// Wires the weather function table against the configured descriptor file.
pub fn build_runtime(config: &AppConfig, provider: Arc<dyn ModelProvider>) -> RuntimeBundle {
    let registry = tool_registry(&config.tools_path, &weather::function_table());
    tracing::info!(
        phase = "startup",
        event = "tools_loaded",
        tools_path = %config.tools_path.display(),
        advertised = registry.definitions().len(),
        bound = registry.len()
    );

    let chat = chat_service(config, provider, tool_runtime(Arc::clone(&registry)));
    RuntimeBundle { registry, chat }
}

pub fn build_runtime_from_config(config: &AppConfig) -> Result<RuntimeBundle, ProviderError> {
    let provider = build_provider_from_app_config(config)?;
    Ok(build_runtime(config, provider))
}

/// Text to print for a finished run: the answer, or the line explaining why
/// there is none.
pub fn final_output(run: &ChatRun) -> Result<&str, &'static str> {
    match run.outcome() {
        RunOutcome::Answered(_) => run
            .answer_text()
            .filter(|text| !text.trim().is_empty())
            .ok_or(EMPTY_ANSWER_MESSAGE),
        RunOutcome::NoResponse(_) | RunOutcome::Failed(_) => Err(NO_RESPONSE_MESSAGE),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use super::tool_registry;
    use crate::weather::{WEATHER_TOOL_NAME, function_table};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("weatherwise-{}-{name}", std::process::id()))
    }

    #[test]
    fn registry_binds_weather_descriptor() {
        let path = temp_path("tools.json");
        let mut file = std::fs::File::create(&path).expect("temp file should be writable");
        file.write_all(
            br#"[{"type":"function","function":{"name":"get_current_weather","description":"Get the current weather","parameters":{"type":"object","properties":{"location":{"type":"string"}},"required":["location"]}}},
                 {"type":"function","function":{"name":"get_forecast","parameters":{"type":"object"}}}]"#,
        )
        .expect("descriptor should be written");

        let registry = tool_registry(&path, &function_table());
        std::fs::remove_file(&path).expect("temp file should be removed");

        assert!(registry.resolve(WEATHER_TOOL_NAME).is_some());
        assert!(registry.resolve("get_forecast").is_none());
        assert_eq!(registry.definitions().len(), 2);
    }

    #[test]
    fn missing_descriptor_file_gives_empty_registry() {
        let registry = tool_registry(temp_path("absent.json"), &function_table());

        assert!(registry.is_empty());
        assert!(registry.definitions().is_empty());
        assert!(registry.resolve(WEATHER_TOOL_NAME).is_none());
    }
}
