//! Session management.

use tracing::error;

use crate::history::{ChatTurn, HistoryStore, InMemoryHistory};
use crate::model::Backend;
use crate::respond::{self, DEFAULT_MAX_ITERATIONS};
use crate::tools::BoundModel;
use crate::Result;

/// A conversation session.
///
/// Owns the history store and the bound model, and applies each exchange
/// to the history: the user turn before the response loop runs, the final
/// assistant turn only when it succeeds.
pub struct Session<B, H = InMemoryHistory> {
    history: H,
    model: BoundModel<B>,
    max_iterations: usize,
    use_tools: bool,
}

impl<B: Backend> Session<B, InMemoryHistory> {
    /// Create a session with a fresh in-memory history.
    pub fn new(model: BoundModel<B>, system_prompt: impl Into<String>) -> Self {
        Self::with_history(model, InMemoryHistory::new(system_prompt))
    }

    /// Clear the conversation back to the system prompt.
    pub fn reset(&mut self) {
        self.history.reset();
    }
}

impl<B: Backend, H: HistoryStore> Session<B, H> {
    /// Create a session over an existing history store.
    pub fn with_history(model: BoundModel<B>, history: H) -> Self {
        Self {
            history,
            model,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            use_tools: true,
        }
    }

    /// Set the iteration budget for each exchange.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Disable tool calling; each exchange becomes a single model call.
    pub fn with_tools_enabled(mut self, use_tools: bool) -> Self {
        self.use_tools = use_tools;
        self
    }

    /// Send a user message and get the assistant's response.
    pub async fn chat(&mut self, user_input: &str) -> Result<String> {
        self.history.append(ChatTurn::user(user_input));
        let history = self.history.get();

        let reply = if self.use_tools {
            respond::run(&history, &self.model, self.max_iterations).await
        } else {
            respond::generate_reply(&history, self.model.backend()).await
        };

        match reply {
            Ok(text) => {
                self.history.append(ChatTurn::assistant(&text));
                Ok(text)
            }
            Err(e) => {
                error!(error = %e, "Failed to generate reply");
                Err(e)
            }
        }
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn model(&self) -> &BoundModel<B> {
        &self.model
    }
}
