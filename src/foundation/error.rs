/// Convenience result type used across Flashguard.
pub type FlashguardResult<T> = Result<T, FlashguardError>;

/// Top-level error taxonomy used by analyzer APIs.
///
/// Only structural input problems are errors. A frame pair with or without a flash is a
/// normal outcome and is reported through [`crate::AnalysisResult`].
#[derive(thiserror::Error, Debug)]
pub enum FlashguardError {
    /// A pixel buffer is malformed (zero dimensions, wrong byte length, wrong analysis size).
    #[error("invalid buffer: {0}")]
    InvalidBuffer(String),

    /// The previous and current frames do not have the same dimensions.
    #[error(
        "shape mismatch: previous frame is {prev_width}x{prev_height}, current frame is {curr_width}x{curr_height}"
    )]
    ShapeMismatch {
        /// Width of the previous frame.
        prev_width: u32,
        /// Height of the previous frame.
        prev_height: u32,
        /// Width of the current frame.
        curr_width: u32,
        /// Height of the current frame.
        curr_height: u32,
    },

    /// Invalid threshold configuration or session options.
    #[error("validation error: {0}")]
    Validation(String),

    /// The session refused the call (for example, it already reached a terminal state).
    #[error("session error: {0}")]
    Session(String),

    /// Errors when serializing or deserializing configuration or reports.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlashguardError {
    /// Build a [`FlashguardError::InvalidBuffer`] value.
    pub fn invalid_buffer(msg: impl Into<String>) -> Self {
        Self::InvalidBuffer(msg.into())
    }

    /// Build a [`FlashguardError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FlashguardError::Session`] value.
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    /// Build a [`FlashguardError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
