//! Tool descriptor file loading.
//!
//! The file is a JSON array. Each entry may use the Chat Completions shape or
//! a flat shape:
//!
//! ```rust
//! use wtooling::ToolCatalog;
//!
//! let catalog = ToolCatalog::from_json_str(
//!     r#"[
//!         {"type":"function","function":{"name":"get_current_weather","parameters":{"type":"object"}}},
//!         {"name":"get_time","description":"Current time","parameters":{"type":"object"}}
//!     ]"#,
//! )
//! .expect("catalog should parse");
//!
//! assert_eq!(catalog.names(), vec!["get_current_weather", "get_time"]);
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Value, json};
use wprovider::ToolDefinition;

use crate::{ArgumentSchema, CatalogError};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDescriptor {
    Wrapped {
        #[serde(rename = "type", default)]
        kind: Option<String>,
        function: RawFunction,
    },
    Flat(RawFunction),
}

#[derive(Debug, Deserialize)]
struct RawFunction {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    parameters: Option<Value>,
}

/// One validated descriptor and its compiled argument schema.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub definition: ToolDefinition,
    pub schema: ArgumentSchema,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolCatalog {
    entries: Vec<CatalogEntry>,
}

impl ToolCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_json_str(text: &str) -> Result<Self, CatalogError> {
        let raw = serde_json::from_str::<Vec<RawDescriptor>>(text)
            .map_err(|err| CatalogError::parse(format!("invalid tool descriptor file: {err}")))?;

        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(raw.len());

        for (index, descriptor) in raw.into_iter().enumerate() {
            let function = match descriptor {
                RawDescriptor::Wrapped { kind, function } => {
                    if let Some(kind) = kind
                        && kind != "function"
                    {
                        return Err(CatalogError::invalid_descriptor(format!(
                            "entry {index} has unsupported type '{kind}'"
                        )));
                    }
                    function
                }
                RawDescriptor::Flat(function) => function,
            };

            let entry = compile_entry(index, function)?;
            if !seen.insert(entry.definition.name.clone()) {
                return Err(CatalogError::duplicate_name(&entry.definition.name));
            }
            entries.push(entry);
        }

        Ok(Self { entries })
    }

    pub fn from_definitions(definitions: Vec<ToolDefinition>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(definitions.len());

        for (index, definition) in definitions.into_iter().enumerate() {
            let parameters = serde_json::from_str::<Value>(&definition.input_schema).map_err(
                |err| {
                    CatalogError::invalid_descriptor(format!(
                        "schema of tool '{}' is not JSON: {err}",
                        definition.name
                    ))
                },
            )?;

            let entry = compile_entry(
                index,
                RawFunction {
                    name: definition.name,
                    description: definition.description,
                    parameters: Some(parameters),
                },
            )?;
            if !seen.insert(entry.definition.name.clone()) {
                return Err(CatalogError::duplicate_name(&entry.definition.name));
            }
            entries.push(entry);
        }

        Ok(Self { entries })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|err| CatalogError::io(err.to_string()).with_path(path))?;

        Self::from_json_str(&text).map_err(|err| err.with_path(path))
    }

    /// Loads the file, degrading to an empty catalog on any failure.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(catalog) => catalog,
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    error_kind = ?error.kind,
                    error = %error.message,
                    "tool descriptors unavailable; continuing without tools"
                );
                Self::empty()
            }
        }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries
            .iter()
            .find(|entry| entry.definition.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|entry| entry.definition.name.as_str())
            .collect()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.entries
            .iter()
            .map(|entry| entry.definition.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for ToolCatalog {
    type Item = CatalogEntry;
    type IntoIter = std::vec::IntoIter<CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

fn compile_entry(index: usize, function: RawFunction) -> Result<CatalogEntry, CatalogError> {
    let name = function.name.trim().to_string();
    if name.is_empty() {
        return Err(CatalogError::invalid_descriptor(format!(
            "entry {index} has an empty name"
        )));
    }

    let parameters = function
        .parameters
        .unwrap_or_else(|| json!({"type": "object", "properties": {}}));
    if !parameters.is_object() {
        return Err(CatalogError::invalid_descriptor(format!(
            "parameters of tool '{name}' must be a JSON object"
        )));
    }

    let schema = ArgumentSchema::from_value(&parameters).map_err(|err| {
        CatalogError::invalid_descriptor(format!("tool '{name}': {}", err.message))
    })?;

    Ok(CatalogEntry {
        definition: ToolDefinition {
            name,
            description: function.description,
            input_schema: parameters.to_string(),
        },
        schema,
    })
}
