//! Tool descriptor loading, argument validation, and tool execution.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use wtooling::{DefaultToolRuntime, FunctionTable, ToolCatalog, ToolRegistry, ToolRuntime};
//!
//! let catalog = ToolCatalog::from_json_str(r#"[{"name":"ping"}]"#).expect("catalog");
//! let table = FunctionTable::new().with_sync_fn("ping", |_| Ok("pong".to_string()));
//! let runtime = DefaultToolRuntime::new(Arc::new(ToolRegistry::from_catalog(catalog, &table)));
//!
//! assert!(runtime.resolves("ping"));
//! ```

mod args;
mod catalog;
mod error;
mod hooks;
mod registry;
mod runtime;
mod schema;
mod tool;
mod types;

pub mod prelude {
    pub use crate::{
        DefaultToolRuntime, FunctionTable, Tool, ToolCatalog, ToolError, ToolErrorKind,
        ToolExecutionContext, ToolExecutionResult, ToolFuture, ToolRegistry, ToolRuntime,
        ToolRuntimeHooks,
    };
}

pub use args::{
    ToolArguments, optional_string, parse_json_object, parse_json_value, required_string,
};
pub use catalog::{CatalogEntry, ToolCatalog};
pub use error::{CatalogError, CatalogErrorKind, ToolError, ToolErrorKind};
pub use hooks::{NoopToolRuntimeHooks, ToolRuntimeHooks};
pub use registry::{FunctionTable, ToolRegistry};
pub use runtime::{DefaultToolRuntime, ToolRuntime};
pub use schema::{ArgumentSchema, JsonType};
pub use tool::{FunctionTool, SyncToolFn, Tool, ToolFuture};
pub use types::{ToolExecutionContext, ToolExecutionResult};

/// Checks parsed arguments against a tool's parameter schema.
pub fn validate_arguments(schema: &ArgumentSchema, args: &ToolArguments) -> Result<(), ToolError> {
    schema.validate(args)
}
