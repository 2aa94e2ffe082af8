//! Argument validation against a tool's declared parameter schema.
//!
//! Only the subset of JSON Schema that function-calling descriptors use is
//! checked: top-level `type: object`, `required`, per-property `type` and
//! `enum`, and `additionalProperties: false`. Other keywords are accepted and
//! ignored.
//!
//! ```rust
//! use wtooling::{ArgumentSchema, parse_json_object};
//!
//! let schema = ArgumentSchema::parse(
//!     r#"{"type":"object","properties":{"location":{"type":"string"}},"required":["location"]}"#,
//! )
//! .expect("schema should parse");
//!
//! let ok = parse_json_object(r#"{"location":"Paris"}"#).expect("args");
//! assert!(schema.validate(&ok).is_ok());
//!
//! let missing = parse_json_object("{}").expect("args");
//! assert!(schema.validate(&missing).is_err());
//! ```

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::{ToolArguments, ToolError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
}

impl JsonType {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "integer" => Some(Self::Integer),
            "boolean" => Some(Self::Boolean),
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            "null" => Some(Self::Null),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Null => "null",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => {
                value.is_i64()
                    || value.is_u64()
                    || value.as_f64().is_some_and(|number| number.fract() == 0.0)
            }
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
            Self::Null => value.is_null(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
struct PropertySchema {
    types: Vec<JsonType>,
    allowed: Option<Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArgumentSchema {
    properties: BTreeMap<String, PropertySchema>,
    required: Vec<String>,
    additional_properties: bool,
}

impl ArgumentSchema {
    /// Schema that accepts any object.
    pub fn permissive() -> Self {
        Self {
            additional_properties: true,
            ..Self::default()
        }
    }

    pub fn parse(schema_json: &str) -> Result<Self, ToolError> {
        let value = serde_json::from_str::<Value>(schema_json)
            .map_err(|err| ToolError::other(format!("parameter schema is not JSON: {err}")))?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, ToolError> {
        let object = value
            .as_object()
            .ok_or_else(|| ToolError::other("parameter schema must be a JSON object"))?;

        if let Some(kind) = object.get("type")
            && kind.as_str() != Some("object")
        {
            return Err(ToolError::other(
                "parameter schema must describe an object",
            ));
        }

        let properties = match object.get("properties") {
            None => BTreeMap::new(),
            Some(Value::Object(properties)) => properties
                .iter()
                .map(|(name, schema)| Ok((name.clone(), parse_property(name, schema)?)))
                .collect::<Result<BTreeMap<_, _>, ToolError>>()?,
            Some(_) => return Err(ToolError::other("'properties' must be an object")),
        };

        let required = match object.get("required") {
            None => Vec::new(),
            Some(Value::Array(names)) => names
                .iter()
                .map(|name| {
                    name.as_str()
                        .map(ToString::to_string)
                        .ok_or_else(|| ToolError::other("'required' entries must be strings"))
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err(ToolError::other("'required' must be an array")),
        };

        let additional_properties = !matches!(
            object.get("additionalProperties"),
            Some(Value::Bool(false))
        );

        Ok(Self {
            properties,
            required,
            additional_properties,
        })
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn validate(&self, args: &ToolArguments) -> Result<(), ToolError> {
        for name in &self.required {
            if !args.contains_key(name) {
                return Err(ToolError::invalid_arguments(format!(
                    "missing required argument '{name}'"
                )));
            }
        }

        for (name, value) in args {
            let Some(property) = self.properties.get(name) else {
                if self.additional_properties {
                    continue;
                }

                return Err(ToolError::invalid_arguments(format!(
                    "unexpected argument '{name}'"
                )));
            };

            if !property.types.is_empty() && !property.types.iter().any(|kind| kind.matches(value))
            {
                let expected = property
                    .types
                    .iter()
                    .map(|kind| kind.as_str())
                    .collect::<Vec<_>>()
                    .join(" or ");
                return Err(ToolError::invalid_arguments(format!(
                    "argument '{name}' must be of type {expected}"
                )));
            }

            if let Some(allowed) = &property.allowed
                && !allowed.contains(value)
            {
                return Err(ToolError::invalid_arguments(format!(
                    "argument '{name}' must be one of {}",
                    Value::Array(allowed.clone())
                )));
            }
        }

        Ok(())
    }
}

fn parse_property(name: &str, schema: &Value) -> Result<PropertySchema, ToolError> {
    let Some(schema) = schema.as_object() else {
        return Err(ToolError::other(format!(
            "schema for property '{name}' must be an object"
        )));
    };

    Ok(PropertySchema {
        types: parse_types(name, schema)?,
        allowed: match schema.get("enum") {
            None => None,
            Some(Value::Array(values)) => Some(values.clone()),
            Some(_) => {
                return Err(ToolError::other(format!(
                    "'enum' for property '{name}' must be an array"
                )));
            }
        },
    })
}

fn parse_types(name: &str, schema: &Map<String, Value>) -> Result<Vec<JsonType>, ToolError> {
    let unknown =
        |kind: &str| ToolError::other(format!("unknown type '{kind}' for property '{name}'"));

    match schema.get("type") {
        None => Ok(Vec::new()),
        Some(Value::String(kind)) => JsonType::parse(kind)
            .map(|kind| vec![kind])
            .ok_or_else(|| unknown(kind)),
        Some(Value::Array(kinds)) => kinds
            .iter()
            .map(|kind| {
                let kind = kind.as_str().unwrap_or_default();
                JsonType::parse(kind).ok_or_else(|| unknown(kind))
            })
            .collect(),
        Some(_) => Err(ToolError::other(format!(
            "'type' for property '{name}' must be a string or array"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ToolErrorKind, parse_json_object};

    fn weather_schema() -> ArgumentSchema {
        ArgumentSchema::parse(
            r#"{
                "type": "object",
                "properties": {
                    "location": {"type": "string", "description": "The city and state"},
                    "unit": {"type": "string", "enum": ["celsius", "fahrenheit"]},
                    "days": {"type": ["integer", "null"]}
                },
                "required": ["location"],
                "additionalProperties": false
            }"#,
        )
        .expect("schema should parse")
    }

    #[test]
    fn accepts_well_formed_arguments() {
        let args = parse_json_object(r#"{"location":"Tokyo","unit":"celsius","days":3}"#)
            .expect("args should parse");
        assert!(weather_schema().validate(&args).is_ok());

        let args = parse_json_object(r#"{"location":"Tokyo","days":null}"#).expect("args");
        assert!(weather_schema().validate(&args).is_ok());
    }

    #[test]
    fn rejects_missing_required_and_wrong_types() {
        let schema = weather_schema();

        let error = schema
            .validate(&parse_json_object("{}").expect("args"))
            .expect_err("missing location should fail");
        assert_eq!(error.kind, ToolErrorKind::InvalidArguments);
        assert_eq!(error.message, "missing required argument 'location'");

        let error = schema
            .validate(&parse_json_object(r#"{"location":42}"#).expect("args"))
            .expect_err("numeric location should fail");
        assert_eq!(error.message, "argument 'location' must be of type string");

        let error = schema
            .validate(&parse_json_object(r#"{"location":"Paris","days":1.5}"#).expect("args"))
            .expect_err("fractional days should fail");
        assert!(error.message.contains("integer or null"));
    }

    #[test]
    fn rejects_enum_violations_and_unexpected_arguments() {
        let schema = weather_schema();

        let error = schema
            .validate(&parse_json_object(r#"{"location":"Paris","unit":"kelvin"}"#).expect("args"))
            .expect_err("kelvin should fail");
        assert!(error.message.contains("must be one of"));

        let error = schema
            .validate(&parse_json_object(r#"{"location":"Paris","verbose":true}"#).expect("args"))
            .expect_err("extra argument should fail");
        assert_eq!(error.message, "unexpected argument 'verbose'");
    }

    #[test]
    fn extra_arguments_pass_when_additional_properties_allowed() {
        let schema = ArgumentSchema::parse(r#"{"type":"object","properties":{}}"#).expect("schema");
        let args = parse_json_object(r#"{"anything":[1,2]}"#).expect("args");
        assert!(schema.validate(&args).is_ok());
        assert!(ArgumentSchema::permissive().validate(&args).is_ok());
    }

    #[test]
    fn rejects_malformed_schemas() {
        assert!(ArgumentSchema::parse(r#"{"type":"string"}"#).is_err());
        assert!(ArgumentSchema::parse(r#"[]"#).is_err());
        assert!(ArgumentSchema::parse(r#"{"properties":{"a":{"type":"decimal"}}}"#).is_err());
        assert!(ArgumentSchema::parse(r#"{"required":"location"}"#).is_err());
    }
}
