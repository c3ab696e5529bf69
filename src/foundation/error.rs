/// Crate-wide result alias.
pub type TensorSpecResult<T> = Result<T, TensorSpecError>;

/// Errors raised while turning tensors into visual geometry.
///
/// None of these are recoverable at this layer: a failing frame aborts the whole timeline build.
#[derive(thiserror::Error, Debug)]
pub enum TensorSpecError {
    /// Tensor rank mismatch, ragged input, or mismatched input-list lengths.
    #[error("shape error: {0}")]
    Shape(String),

    /// Connector edge orientations are not perpendicular.
    #[error("routing error: {0}")]
    Routing(String),

    /// Scratch directory or external renderer/tracer failure.
    #[error("resource error: {0}")]
    Resource(String),

    /// Input that cannot be normalized (for example an empty tensor).
    #[error("degenerate input: {0}")]
    Degenerate(String),

    /// Invalid configuration value or unrecognized option.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped collaborator failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TensorSpecError {
    /// Build a [`TensorSpecError::Shape`].
    pub fn shape(msg: impl Into<String>) -> Self {
        Self::Shape(msg.into())
    }

    /// Build a [`TensorSpecError::Routing`].
    pub fn routing(msg: impl Into<String>) -> Self {
        Self::Routing(msg.into())
    }

    /// Build a [`TensorSpecError::Resource`].
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Build a [`TensorSpecError::Degenerate`].
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::Degenerate(msg.into())
    }

    /// Build a [`TensorSpecError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<std::io::Error> for TensorSpecError {
    fn from(err: std::io::Error) -> Self {
        Self::Resource(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
