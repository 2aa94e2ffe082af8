//! Tool runtime trait and default registry-backed executor.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures_util::FutureExt;
use wprovider::{ToolCall, ToolDefinition};

use crate::{
    NoopToolRuntimeHooks, ToolError, ToolExecutionContext, ToolExecutionResult, ToolFuture,
    ToolRegistry, ToolRuntimeHooks, parse_json_object,
};

pub trait ToolRuntime: Send + Sync {
    /// Descriptors advertised to the model.
    fn definitions(&self) -> Vec<ToolDefinition>;

    /// Whether `name` is bound to an implementation.
    fn resolves(&self, name: &str) -> bool;

    fn execute<'a>(
        &'a self,
        tool_call: ToolCall,
        context: ToolExecutionContext,
    ) -> ToolFuture<'a, Result<ToolExecutionResult, ToolError>>;
}

#[derive(Clone)]
pub struct DefaultToolRuntime {
    registry: Arc<ToolRegistry>,
    hooks: Arc<dyn ToolRuntimeHooks>,
}

impl Default for DefaultToolRuntime {
    fn default() -> Self {
        Self::new(Arc::new(ToolRegistry::new()))
    }
}

impl DefaultToolRuntime {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            hooks: Arc::new(NoopToolRuntimeHooks),
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ToolRuntimeHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn registry(&self) -> Arc<ToolRegistry> {
        Arc::clone(&self.registry)
    }

    async fn run(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
    ) -> Result<ToolExecutionResult, ToolError> {
        let (Some(tool), Some(schema)) = (
            self.registry.resolve(&tool_call.name),
            self.registry.schema(&tool_call.name),
        ) else {
            return Err(ToolError::not_found(format!(
                "tool '{}' is not registered",
                tool_call.name
            )));
        };

        let args = parse_json_object(&tool_call.arguments)?;
        schema.validate(&args)?;

        let output = AssertUnwindSafe(async { tool.invoke(args, context).await })
            .catch_unwind()
            .await
            .map_err(|payload| {
                ToolError::execution(format!("tool panicked: {}", panic_message(&*payload)))
            })??;

        Ok(ToolExecutionResult::from_call(tool_call, output))
    }
}

impl ToolRuntime for DefaultToolRuntime {
    fn definitions(&self) -> Vec<ToolDefinition> {
        self.registry.definitions()
    }

    fn resolves(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    fn execute<'a>(
        &'a self,
        tool_call: ToolCall,
        context: ToolExecutionContext,
    ) -> ToolFuture<'a, Result<ToolExecutionResult, ToolError>> {
        Box::pin(async move {
            self.hooks.on_execution_start(&tool_call, &context);
            let started_at = Instant::now();

            let result = self.run(&tool_call, &context).await.map_err(|error| {
                let error = if error.tool_name.is_none() {
                    error.with_tool_name(tool_call.name.clone())
                } else {
                    error
                };
                error.with_tool_call_id(tool_call.id.clone())
            });

            match &result {
                Ok(output) => {
                    self.hooks
                        .on_execution_success(&tool_call, &context, output, started_at.elapsed())
                }
                Err(error) => {
                    self.hooks
                        .on_execution_failure(&tool_call, &context, error, started_at.elapsed())
                }
            }

            result
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
