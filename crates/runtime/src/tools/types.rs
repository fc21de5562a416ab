//! Tool-related types.

use super::ToolError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Arguments supplied by the model for one tool call.
pub type Arguments = Map<String, Value>;

/// Deserialize call arguments into a typed parameter struct.
pub fn parse_arguments<T: DeserializeOwned>(arguments: &Arguments) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(arguments.clone()))
        .map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// Render a tool's return value as the text the model receives.
pub fn stringify_output(output: Value) -> String {
    match output {
        Value::String(text) => text,
        other => other.to_string(),
    }
}
