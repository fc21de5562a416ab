//! Tool registry, binding and invocation.

mod binding;
pub mod errors;
pub mod invoker;
pub(crate) mod registry;
mod r#trait;
mod types;

pub use binding::BoundModel;
pub use errors::{RegistryError, ToolError};
pub use registry::{BindOptions, ToolRegistry};
pub use r#trait::Tool;
pub use types::{Arguments, parse_arguments, stringify_output};
