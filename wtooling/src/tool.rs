//! Tool trait contract for registry-managed capabilities.
//!
//! ```rust
//! use wprovider::ToolDefinition;
//! use wtooling::{FunctionTool, Tool, required_string};
//!
//! let tool = FunctionTool::from_sync(
//!     ToolDefinition {
//!         name: "echo".to_string(),
//!         description: "Echoes the text argument".to_string(),
//!         input_schema: r#"{"type":"object"}"#.to_string(),
//!     },
//!     |args| required_string(&args, "text"),
//! );
//!
//! assert_eq!(tool.definition().name, "echo");
//! ```

use std::future::Future;
use std::sync::Arc;

use wcommon::BoxFuture;
use wprovider::ToolDefinition;

use crate::{ToolArguments, ToolError, ToolExecutionContext};

pub type ToolFuture<'a, T> = BoxFuture<'a, T>;

pub trait Tool: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    /// Runs the tool with arguments already checked against its schema.
    fn invoke<'a>(
        &'a self,
        args: ToolArguments,
        context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<String, ToolError>>;
}

/// Synchronous tool body, as stored in a [`crate::FunctionTable`].
pub type SyncToolFn = dyn Fn(ToolArguments) -> Result<String, ToolError> + Send + Sync;

type ToolHandler = dyn Fn(ToolArguments, ToolExecutionContext) -> ToolFuture<'static, Result<String, ToolError>>
    + Send
    + Sync;

pub struct FunctionTool {
    definition: ToolDefinition,
    handler: Arc<ToolHandler>,
}

impl FunctionTool {
    pub fn new<F, Fut>(definition: ToolDefinition, handler: F) -> Self
    where
        F: Fn(ToolArguments, ToolExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, ToolError>> + Send + 'static,
    {
        let handler: Arc<ToolHandler> =
            Arc::new(move |args, context| Box::pin(handler(args, context)));

        Self {
            definition,
            handler,
        }
    }

    pub fn from_sync<F>(definition: ToolDefinition, handler: F) -> Self
    where
        F: Fn(ToolArguments) -> Result<String, ToolError> + Send + Sync + 'static,
    {
        Self::from_shared(definition, Arc::new(handler))
    }

    /// The body runs inside the returned future, so a panic surfaces when
    /// the runtime polls it.
    pub fn from_shared(definition: ToolDefinition, handler: Arc<SyncToolFn>) -> Self {
        Self::new(definition, move |args, _context| {
            let handler = Arc::clone(&handler);
            async move { handler(args) }
        })
    }
}

impl std::fmt::Debug for FunctionTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionTool")
            .field("name", &self.definition.name)
            .finish_non_exhaustive()
    }
}

impl Tool for FunctionTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    fn invoke<'a>(
        &'a self,
        args: ToolArguments,
        context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<String, ToolError>> {
        (self.handler)(args, context.clone())
    }
}
