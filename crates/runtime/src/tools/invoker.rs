//! Executes single tool calls without letting failures escape.

use tracing::{error, info, warn};

use super::{ToolError, ToolRegistry, stringify_output};
use crate::model::{ToolCall, ToolResult};

/// Execute one tool call against the bound tools.
///
/// Unknown tool names, unreadable arguments and executor failures come back
/// as error results tagged with the call id, so one bad call never aborts
/// its siblings.
pub fn execute(tools: &ToolRegistry, call: &ToolCall) -> ToolResult {
    let arguments = serde_json::Value::Object(call.arguments.clone());
    info!(tool = %call.name, id = %call.id, %arguments, "Executing tool");

    let Some(tool) = tools.lookup(&call.name) else {
        let message = format!("Tool '{}' not found in bound tools", call.name);
        warn!(tool = %call.name, id = %call.id, "{message}");
        return ToolResult::error(&call.id, message);
    };

    let outcome = match &call.argument_error {
        Some(reason) => Err(ToolError::InvalidArguments(reason.clone())),
        None => tool.invoke(&call.arguments),
    };

    match outcome {
        Ok(output) => {
            let content = stringify_output(output);
            info!(tool = %call.name, id = %call.id, "Tool executed successfully");
            ToolResult::success(&call.id, content)
        }
        Err(e) => {
            let message = format!("Error executing tool '{}': {e}", call.name);
            error!(tool = %call.name, id = %call.id, %arguments, "{message}");
            ToolResult::error(&call.id, message)
        }
    }
}
