/// Convenience result type used across the crate.
pub type MediaResult<T> = Result<T, MediaError>;

/// Failure taxonomy for decode, codec, and export operations.
///
/// Degrading entry points such as [`crate::load_animation`] never surface these values; they log
/// them and degrade to an empty result. The `try_*` entry points return them unchanged.
#[derive(thiserror::Error, Debug)]
pub enum MediaError {
    /// A file could not be opened, or its header/container could not be parsed.
    #[error("open error: {0}")]
    Open(String),

    /// The codec rejected the bitstream, or a codec session failed to initialise or tear down.
    #[error("codec error: {0}")]
    Codec(String),

    /// The content is well-formed but not something this crate handles.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Writing exported output failed.
    #[error("io error: {0}")]
    Io(String),

    /// Invalid caller-provided parameters (dimensions, buffer sizes, fps).
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MediaError {
    /// Build a [`MediaError::Open`] value.
    pub fn open(msg: impl Into<String>) -> Self {
        Self::Open(msg.into())
    }

    /// Build a [`MediaError::Codec`] value.
    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }

    /// Build a [`MediaError::Unsupported`] value.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Build a [`MediaError::Io`] value.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Build a [`MediaError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
