//! Tool trait.

use crate::model::ToolSpec;
use crate::tools::{Arguments, ToolError};
use serde_json::Value;

/// A callable tool the model may invoke.
///
/// Implementations describe themselves to the model and execute calls.
/// This is the boundary between the response loop and tool business logic.
pub trait Tool: Send + Sync {
    /// Unique name in `verb_noun` form.
    fn name(&self) -> &str;

    /// Human-readable description shown to the model.
    fn description(&self) -> &str;

    /// JSON Schema for accepted arguments.
    fn input_schema(&self) -> Value;

    /// Execute the tool with the model-supplied arguments.
    fn invoke(&self, arguments: &Arguments) -> Result<Value, ToolError>;

    /// Specification sent to the model when this tool is bound.
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}
