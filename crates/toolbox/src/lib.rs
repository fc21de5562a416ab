//! Built-in tools available to the chat model.
//!
//! Tool names follow `verb_noun` snake case. The search, weather, time and
//! currency tools return placeholder data; `calculate_math` evaluates real
//! arithmetic.

use std::sync::Arc;

use runtime::{RegistryError, Tool, ToolRegistry};

pub mod calc;
mod data;
mod error;
mod search;
mod utility;

pub use data::{CalculateMath, FetchWeather};
pub use error::CalcError;
pub use search::{SearchDocuments, SearchWeb};
pub use utility::{ConvertCurrency, GetCurrentTime};

/// Every built-in tool, in registration order.
pub fn all_tools() -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(SearchWeb),
        Arc::new(SearchDocuments),
        Arc::new(FetchWeather),
        Arc::new(CalculateMath),
        Arc::new(GetCurrentTime),
        Arc::new(ConvertCurrency),
    ]
}

/// A registry holding every built-in tool.
pub fn default_registry() -> Result<ToolRegistry, RegistryError> {
    ToolRegistry::new(all_tools())
}
