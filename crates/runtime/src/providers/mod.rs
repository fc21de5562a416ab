//! LLM provider adapters.
//!
//! Each provider implements the backend trait for its specific API.

mod groq;

pub use groq::{DEFAULT_MODEL, DEFAULT_TEMPERATURE, GROQ_API_URL, GroqBackend, GroqBackendBuilder};
