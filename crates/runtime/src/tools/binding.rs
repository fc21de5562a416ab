//! A model handle with tools attached.

use super::ToolRegistry;
use crate::model::{Backend, Message, ModelError, ModelRequest, ModelResponse, ToolChoice, ToolSpec};

/// A backend bound to an explicit tool list and tool-choice policy.
///
/// The bound model owns the exact tools it was bound with, so the invoker
/// resolves calls against this list and nothing else.
#[derive(Debug)]
pub struct BoundModel<B> {
    backend: B,
    tools: ToolRegistry,
    specs: Vec<ToolSpec>,
    tool_choice: ToolChoice,
    parallel_tool_calls: bool,
}

impl<B: Backend> BoundModel<B> {
    pub(crate) fn new(
        backend: B,
        tools: ToolRegistry,
        tool_choice: ToolChoice,
        parallel_tool_calls: bool,
    ) -> Self {
        let specs = tools.specs();
        Self {
            backend,
            tools,
            specs,
            tool_choice,
            parallel_tool_calls,
        }
    }

    /// A handle with no tools bound.
    pub fn without_tools(backend: B) -> Self {
        Self::new(backend, ToolRegistry::empty(), ToolChoice::Auto, true)
    }

    /// Invoke the model with the current conversation.
    pub async fn invoke(&self, messages: &[Message]) -> Result<ModelResponse, ModelError> {
        let request = ModelRequest {
            messages,
            tools: &self.specs,
            tool_choice: &self.tool_choice,
            parallel_tool_calls: self.parallel_tool_calls,
        };
        self.backend.call(request).await
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn tool_choice(&self) -> &ToolChoice {
        &self.tool_choice
    }

    pub fn parallel_tool_calls(&self) -> bool {
        self.parallel_tool_calls
    }
}
