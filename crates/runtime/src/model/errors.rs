use thiserror::Error;

/// Failures talking to the chat model.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModelError {
    /// The request got no HTTP response: connect, TLS, or deadline failures.
    #[error("request to model failed: {0}")]
    Network(String),

    /// The API answered with a non-success status.
    #[error("model api returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The reply did not match the chat completions format.
    #[error("malformed model response: {0}")]
    InvalidResponse(String),

    /// The HTTP client could not be built.
    #[error("cannot build model client: {0}")]
    Config(String),
}
