/// Convenience result type used across Framestack.
pub type FramestackResult<T> = Result<T, FramestackError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum FramestackError {
    /// Invalid user-provided or model data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while rendering a frame stack.
    #[error("render error: {0}")]
    Render(String),

    /// Fatal errors during an export run.
    #[error("export error: {0}")]
    Export(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FramestackError {
    /// Build a [`FramestackError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FramestackError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`FramestackError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
