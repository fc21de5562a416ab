//! Chat history held by the caller between exchanges.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default system prompt seeded into a fresh history.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Role of a stored chat turn.
///
/// Roles the runtime does not know about are kept as [`TurnRole::Other`]
/// so stored histories from newer front-ends still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TurnRole {
    System,
    User,
    Assistant,
    Tool,
    Other(String),
}

impl From<String> for TurnRole {
    fn from(role: String) -> Self {
        match role.as_str() {
            "system" => Self::System,
            "user" => Self::User,
            "assistant" => Self::Assistant,
            "tool" => Self::Tool,
            _ => Self::Other(role),
        }
    }
}

impl From<TurnRole> for String {
    fn from(role: TurnRole) -> Self {
        role.to_string()
    }
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => f.write_str("system"),
            Self::User => f.write_str("user"),
            Self::Assistant => f.write_str("assistant"),
            Self::Tool => f.write_str("tool"),
            Self::Other(role) => f.write_str(role),
        }
    }
}

/// A single stored chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
    /// Call identifier answered by a `tool` turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatTurn {
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_call_id: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(TurnRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TurnRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, content)
    }
}

/// Storage for the chat history of one session.
///
/// The response loop only reads a snapshot; callers append the user turn
/// before an exchange and the final assistant turn after it.
pub trait HistoryStore {
    /// Snapshot of all turns, oldest first.
    fn get(&self) -> Vec<ChatTurn>;

    /// Append one turn.
    fn append(&mut self, turn: ChatTurn);
}

/// In-memory history for the lifetime of one session.
#[derive(Debug, Clone)]
pub struct InMemoryHistory {
    system_prompt: String,
    turns: Vec<ChatTurn>,
}

impl InMemoryHistory {
    /// Create a history seeded with the system prompt as its first turn.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        let system_prompt = system_prompt.into();
        Self {
            turns: vec![ChatTurn::system(&system_prompt)],
            system_prompt,
        }
    }

    /// Drop every turn except a fresh system prompt.
    pub fn reset(&mut self) {
        self.turns = vec![ChatTurn::system(&self.system_prompt)];
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl Default for InMemoryHistory {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT)
    }
}

impl HistoryStore for InMemoryHistory {
    fn get(&self) -> Vec<ChatTurn> {
        self.turns.clone()
    }

    fn append(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }
}
