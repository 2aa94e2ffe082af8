//! Name-keyed tool registry built from the descriptor catalog.
//!
//! ```rust
//! use wtooling::{FunctionTable, ToolCatalog, ToolRegistry, required_string};
//!
//! let catalog = ToolCatalog::from_json_str(
//!     r#"[{"name":"echo","parameters":{"type":"object"}},{"name":"unbound"}]"#,
//! )
//! .expect("catalog should parse");
//! let table = FunctionTable::new()
//!     .with_sync_fn("echo", |args| required_string(&args, "text"));
//!
//! let registry = ToolRegistry::from_catalog(catalog, &table);
//! assert!(registry.resolve("echo").is_some());
//! assert!(registry.resolve("unbound").is_none());
//! assert_eq!(registry.definitions().len(), 2);
//! ```

use std::sync::Arc;

use wcommon::Registry;
use wprovider::ToolDefinition;

use crate::tool::SyncToolFn;
use crate::{ArgumentSchema, FunctionTool, Tool, ToolArguments, ToolCatalog, ToolError};

/// Static map from tool name to its Rust implementation.
#[derive(Clone, Default)]
pub struct FunctionTable {
    functions: Registry<String, Arc<SyncToolFn>>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sync_fn<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(ToolArguments) -> Result<String, ToolError> + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(function));
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<SyncToolFn>> {
        self.functions.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl std::fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names = self.functions.keys().collect::<Vec<_>>();
        names.sort();
        f.debug_struct("FunctionTable")
            .field("functions", &names)
            .finish()
    }
}

#[derive(Clone)]
struct RegisteredTool {
    tool: Arc<dyn Tool>,
    schema: Arc<ArgumentSchema>,
}

#[derive(Default)]
pub struct ToolRegistry {
    advertised: Vec<ToolDefinition>,
    tools: Registry<String, RegisteredTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds each descriptor to its implementation. Descriptors without one
    /// are still advertised but never resolve.
    pub fn from_catalog(catalog: ToolCatalog, table: &FunctionTable) -> Self {
        let mut registry = Self::new();

        for entry in catalog {
            registry.advertised.push(entry.definition.clone());

            match table.get(&entry.definition.name) {
                Some(function) => {
                    let name = entry.definition.name.clone();
                    registry.tools.insert(
                        name,
                        RegisteredTool {
                            tool: Arc::new(FunctionTool::from_shared(entry.definition, function)),
                            schema: Arc::new(entry.schema),
                        },
                    );
                }
                None => tracing::debug!(
                    tool_name = %entry.definition.name,
                    "descriptor has no implementation; advertised only"
                ),
            }
        }

        registry
    }

    /// Registers a tool outside the catalog, replacing any tool of the same
    /// name.
    pub fn register<T>(&mut self, tool: T) -> Result<(), ToolError>
    where
        T: Tool + 'static,
    {
        let definition = tool.definition();
        let schema = ArgumentSchema::parse(&definition.input_schema)
            .map_err(|err| err.with_tool_name(definition.name.clone()))?;

        self.advertised.retain(|existing| existing.name != definition.name);
        self.advertised.push(definition.clone());
        self.tools.insert(
            definition.name,
            RegisteredTool {
                tool: Arc::new(tool),
                schema: Arc::new(schema),
            },
        );
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).map(|entry| Arc::clone(&entry.tool))
    }

    pub fn schema(&self, name: &str) -> Option<Arc<ArgumentSchema>> {
        self.tools.get(name).map(|entry| Arc::clone(&entry.schema))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Advertised descriptors in declaration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.advertised.clone()
    }

    /// Number of resolvable tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field(
                "advertised",
                &self
                    .advertised
                    .iter()
                    .map(|definition| definition.name.as_str())
                    .collect::<Vec<_>>(),
            )
            .field("resolvable", &self.tools.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ToolErrorKind, ToolExecutionContext, ToolFuture};

    fn catalog() -> ToolCatalog {
        ToolCatalog::from_json_str(
            r#"[
                {"name":"first","parameters":{"type":"object"}},
                {"name":"advertised_only"},
                {"name":"second","parameters":{"type":"object"}}
            ]"#,
        )
        .expect("catalog should parse")
    }

    #[derive(Debug)]
    struct StaticTool;

    impl Tool for StaticTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition {
                name: "static".to_string(),
                description: "Returns a constant".to_string(),
                input_schema: "{\"type\":\"object\"}".to_string(),
            }
        }

        fn invoke<'a>(
            &'a self,
            _args: ToolArguments,
            _context: &'a ToolExecutionContext,
        ) -> ToolFuture<'a, Result<String, ToolError>> {
            Box::pin(async { Ok("constant".to_string()) })
        }
    }

    #[test]
    fn binds_only_descriptors_with_implementations() {
        let table = FunctionTable::new()
            .with_sync_fn("first", |_| Ok("1".to_string()))
            .with_sync_fn("second", |_| Ok("2".to_string()))
            .with_sync_fn("undeclared", |_| Ok("x".to_string()));

        let registry = ToolRegistry::from_catalog(catalog(), &table);

        assert_eq!(registry.len(), 2);
        assert!(registry.resolve("first").is_some());
        assert!(registry.resolve("second").is_some());
        assert!(registry.resolve("advertised_only").is_none());
        assert!(registry.resolve("undeclared").is_none());

        let names = registry
            .definitions()
            .into_iter()
            .map(|definition| definition.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["first", "advertised_only", "second"]);
    }

    #[test]
    fn empty_catalog_resolves_nothing() {
        let table = FunctionTable::new().with_sync_fn("first", |_| Ok("1".to_string()));
        let registry = ToolRegistry::from_catalog(ToolCatalog::empty(), &table);

        assert!(registry.is_empty());
        assert!(registry.definitions().is_empty());
        assert!(registry.resolve("first").is_none());
    }

    #[test]
    fn register_adds_tool_and_rejects_bad_schema() {
        let mut registry = ToolRegistry::new();
        registry.register(StaticTool).expect("tool should register");
        assert!(registry.contains("static"));
        assert!(registry.schema("static").is_some());

        let error = registry
            .register(FunctionTool::from_sync(
                ToolDefinition {
                    name: "bad".to_string(),
                    description: String::new(),
                    input_schema: "not json".to_string(),
                },
                |_| Ok(String::new()),
            ))
            .expect_err("bad schema should fail");
        assert_eq!(error.kind, ToolErrorKind::Other);
        assert_eq!(error.tool_name.as_deref(), Some("bad"));
    }
}
