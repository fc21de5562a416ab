//! Toolchat runtime: a tool-calling response loop over chat models.
//!
//! This crate turns a stored chat history into a final assistant reply,
//! letting the model call locally registered tools along the way.
//!
//! # Overview
//!
//! The runtime is organized around these concepts:
//!
//! - **ChatTurn**: A stored role/content pair held by the caller between exchanges.
//! - **Backend**: A trait abstracting LLM providers (Groq, etc.).
//! - **ToolRegistry**: The named tools available to the model, bound to a
//!   backend as a [`BoundModel`].
//! - **respond**: The loop that alternates model calls and tool execution
//!   until the model answers without requesting tools.
//! - **Session**: A conversation context that owns the history and applies
//!   each exchange to it.
//!
//! # Example
//!
//! ```ignore
//! use runtime::{BindOptions, GroqBackend, Session, ToolRegistry};
//!
//! # async fn example() -> runtime::Result<()> {
//! let backend = GroqBackend::builder("gsk_...", "llama-3.1-8b-instant").build()?;
//! let model = ToolRegistry::empty().bind(backend, BindOptions::default())?;
//!
//! let mut session = Session::new(model, "You are a helpful assistant.");
//! let reply = session.chat("Hello!").await?;
//! println!("{reply}");
//! # Ok(())
//! # }
//! ```

mod error;
pub mod history;
pub mod model;
mod providers;
pub mod respond;
mod session;
pub mod tools;
pub mod translate;

// Error types
pub use error::{Error, Result};

// Conversation state
pub use history::{ChatTurn, DEFAULT_SYSTEM_PROMPT, HistoryStore, InMemoryHistory, TurnRole};
pub use session::Session;

// Model protocol
pub use model::{Backend, Message, ModelError, ToolChoice, ToolSpec};

// Providers
pub use providers::{
    DEFAULT_MODEL, DEFAULT_TEMPERATURE, GROQ_API_URL, GroqBackend, GroqBackendBuilder,
};

// Tools
pub use tools::{
    Arguments, BindOptions, BoundModel, RegistryError, Tool, ToolError, ToolRegistry,
};

// Response loop
pub use respond::{DEFAULT_MAX_ITERATIONS, Exchange};
