//! CLI error types.

use thiserror::Error;

use crate::config::ConfigError;

/// CLI errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A required environment variable is unset or blank.
    #[error("{0} is not set. Add it to the environment or a .env file")]
    MissingEnv(&'static str),

    /// Configuration could not be read or parsed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// `--args` was not a JSON object.
    #[error("invalid tool arguments: {0}")]
    InvalidArgs(String),

    /// A diagnostic tool call came back as an error result.
    #[error("{0}")]
    ToolFailed(String),

    /// An error occurred in the runtime layer.
    #[error(transparent)]
    Runtime(#[from] runtime::Error),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<runtime::ModelError> for Error {
    fn from(e: runtime::ModelError) -> Self {
        Self::Runtime(e.into())
    }
}

impl From<runtime::RegistryError> for Error {
    fn from(e: runtime::RegistryError) -> Self {
        Self::Runtime(e.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
