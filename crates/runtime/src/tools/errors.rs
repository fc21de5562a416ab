use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by a tool while executing.
///
/// These never escape the invoker; they are rendered into the tool result
/// the model sees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum ToolError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Execution(String),
}

/// Errors from building a registry or binding tools to a model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// Two tools were registered under the same name.
    #[error("duplicate tool name: {0}")]
    DuplicateTool(String),

    /// A tool name was selected that the registry does not hold.
    #[error("unknown tool: {0}")]
    UnknownTool(String),
}
