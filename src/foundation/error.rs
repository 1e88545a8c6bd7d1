/// Convenience result type used across plum.
pub type PlumResult<T> = Result<T, PlumError>;

/// Top-level error taxonomy used by engine APIs.
///
/// The growth engine and scheduler never fail; errors come from the surfaces around them
/// (configuration, rasterization, encoding).
#[derive(thiserror::Error, Debug)]
pub enum PlumError {
    /// Invalid user-provided configuration or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while rasterizing onto a drawing surface.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while streaming frames into a sink.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlumError {
    /// Build a [`PlumError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PlumError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`PlumError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`PlumError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
