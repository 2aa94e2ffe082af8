//! JSON argument parsing helpers for tool implementations.
//!
//! ```rust
//! use wtooling::{optional_string, parse_json_object, required_string};
//!
//! let args = parse_json_object(r#"{"location":"Paris"}"#).expect("object should parse");
//! assert_eq!(required_string(&args, "location").expect("location"), "Paris");
//! assert_eq!(optional_string(&args, "unit").expect("unit"), None);
//! ```

use serde_json::{Map, Value};

use crate::ToolError;

/// Named arguments passed to a tool, as decoded from the model's payload.
pub type ToolArguments = Map<String, Value>;

pub fn parse_json_value(args_json: &str) -> Result<Value, ToolError> {
    serde_json::from_str(args_json)
        .map_err(|err| ToolError::invalid_arguments(format!("invalid JSON arguments: {err}")))
}

/// Parses a model argument payload. A blank payload is an empty object.
pub fn parse_json_object(args_json: &str) -> Result<ToolArguments, ToolError> {
    if args_json.trim().is_empty() {
        return Ok(ToolArguments::new());
    }

    match parse_json_value(args_json)? {
        Value::Object(map) => Ok(map),
        _ => Err(ToolError::invalid_arguments("expected JSON object arguments")),
    }
}

pub fn required_string(args: &ToolArguments, key: &str) -> Result<String, ToolError> {
    args.get(key)
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| ToolError::invalid_arguments(format!("missing required string: '{key}'")))
}

pub fn optional_string(args: &ToolArguments, key: &str) -> Result<Option<String>, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(ToolError::invalid_arguments(format!(
            "argument '{key}' must be a string"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ToolErrorKind;

    #[test]
    fn parse_object_and_extract_required_string() {
        let args = parse_json_object("{\"location\":\"Tokyo\"}").expect("args should parse");
        let location = required_string(&args, "location").expect("location should exist");
        assert_eq!(location, "Tokyo");
    }

    #[test]
    fn blank_payload_is_an_empty_object() {
        let args = parse_json_object("  ").expect("blank should parse");
        assert!(args.is_empty());
    }

    #[test]
    fn parse_invalid_json_and_non_objects_return_invalid_arguments() {
        let error = parse_json_object("{").expect_err("json should fail");
        assert_eq!(error.kind, ToolErrorKind::InvalidArguments);

        let error = parse_json_object("[1,2]").expect_err("array should fail");
        assert_eq!(error.message, "expected JSON object arguments");
    }

    #[test]
    fn optional_string_rejects_wrong_type() {
        let args = parse_json_object("{\"unit\":3}").expect("args should parse");
        assert!(optional_string(&args, "unit").is_err());

        let args = parse_json_object("{\"unit\":null}").expect("args should parse");
        assert_eq!(optional_string(&args, "unit").expect("null is absent"), None);
    }
}
