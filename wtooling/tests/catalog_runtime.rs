use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use wprovider::ToolCall;
use wtooling::{
    CatalogErrorKind, DefaultToolRuntime, FunctionTable, ToolCatalog, ToolErrorKind,
    ToolExecutionContext, ToolRegistry, ToolRuntime, optional_string, required_string,
};

const WEATHER_TOOLS: &str = r#"[
    {
        "type": "function",
        "function": {
            "name": "get_current_weather",
            "description": "Get the current weather in a given location",
            "parameters": {
                "type": "object",
                "properties": {
                    "location": {"type": "string", "description": "The city and state, e.g. San Francisco, CA"},
                    "unit": {"type": "string", "enum": ["celsius", "fahrenheit"]}
                },
                "required": ["location"]
            }
        }
    }
]"#;

fn temp_path(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!(
        "wtooling-{label}-{}-{nanos}.json",
        std::process::id()
    ))
}

fn weather_table() -> FunctionTable {
    FunctionTable::new().with_sync_fn("get_current_weather", |args| {
        let location = required_string(&args, "location")?;
        let unit = optional_string(&args, "unit")?.unwrap_or_else(|| "celsius".to_string());
        Ok(format!("{{\"location\":\"{location}\",\"unit\":\"{unit}\"}}"))
    })
}

#[test]
fn load_reads_descriptor_file_from_disk() {
    let path = temp_path("load");
    fs::write(&path, WEATHER_TOOLS).expect("fixture should write");

    let catalog = ToolCatalog::load(&path).expect("catalog should load");
    fs::remove_file(&path).ok();

    assert_eq!(catalog.names(), vec!["get_current_weather"]);
}

#[test]
fn load_reports_missing_file_with_path() {
    let path = temp_path("missing");
    let error = ToolCatalog::load(&path).expect_err("missing file should fail");

    assert_eq!(error.kind, CatalogErrorKind::Io);
    assert_eq!(error.path.as_deref(), Some(path.as_path()));
}

#[test]
fn load_or_empty_degrades_on_missing_or_malformed_file() {
    let missing = ToolCatalog::load_or_empty(temp_path("absent"));
    assert!(missing.is_empty());

    let path = temp_path("malformed");
    fs::write(&path, "[{\"function\":").expect("fixture should write");
    let malformed = ToolCatalog::load_or_empty(&path);
    fs::remove_file(&path).ok();

    assert!(malformed.is_empty());
}

#[tokio::test]
async fn loaded_catalog_drives_validated_execution() {
    let catalog = ToolCatalog::from_json_str(WEATHER_TOOLS).expect("catalog should parse");
    let registry = ToolRegistry::from_catalog(catalog, &weather_table());
    let runtime = DefaultToolRuntime::new(Arc::new(registry));

    assert_eq!(runtime.definitions().len(), 1);
    assert!(runtime.resolves("get_current_weather"));

    let result = runtime
        .execute(
            ToolCall {
                id: "call_tokyo".to_string(),
                name: "get_current_weather".to_string(),
                arguments: "{\"location\":\"Tokyo\"}".to_string(),
            },
            ToolExecutionContext::new("run-int"),
        )
        .await
        .expect("execution should succeed");
    assert_eq!(result.output, "{\"location\":\"Tokyo\",\"unit\":\"celsius\"}");

    let error = runtime
        .execute(
            ToolCall {
                id: "call_bad".to_string(),
                name: "get_current_weather".to_string(),
                arguments: "{\"location\":\"Tokyo\",\"unit\":\"kelvin\"}".to_string(),
            },
            ToolExecutionContext::new("run-int"),
        )
        .await
        .expect_err("enum violation should fail");
    assert_eq!(error.kind, ToolErrorKind::InvalidArguments);
    assert!(error.is_user_error());
}
