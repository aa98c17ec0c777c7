use crate::foundation::core::TemplateId;

/// Convenience result type used across the booth.
pub type BoothResult<T> = Result<T, BoothError>;

/// Top-level error taxonomy used by booth APIs.
#[derive(thiserror::Error, Debug)]
pub enum BoothError {
    /// A single image could not be loaded or decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The Video Source could not deliver a frame.
    #[error("capture error: {0}")]
    Capture(String),

    /// The Video Source has no running stream.
    #[error("no active stream: {0}")]
    NoActiveStream(String),

    /// A template id that is not in the registry.
    #[error("invalid template id {0}")]
    InvalidTemplate(TemplateId),

    /// Invalid caller-provided data or an operation issued in the wrong state.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while encoding the final raster.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors while reading or validating configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BoothError {
    /// Build a [`BoothError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`BoothError::Capture`] value.
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    /// Build a [`BoothError::NoActiveStream`] value.
    pub fn no_active_stream(msg: impl Into<String>) -> Self {
        Self::NoActiveStream(msg.into())
    }

    /// Build a [`BoothError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BoothError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`BoothError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Errors local to one image or one frame. The session survives them and the caller offers a
    /// retry or accepts a gap; everything else needs user-facing recovery.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::Capture(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
