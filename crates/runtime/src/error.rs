use thiserror::Error;

use crate::model::ModelError;
use crate::tools::RegistryError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The model produced no usable text and requested no tools.
    #[error("model returned an empty response")]
    EmptyResponse,

    /// The iteration budget ran out before the model produced a final answer.
    #[error("maximum tool calling iterations ({max_iterations}) reached without final answer")]
    ToolLoopExhausted { max_iterations: usize },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

pub type Result<T> = std::result::Result<T, Error>;
