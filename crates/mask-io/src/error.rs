//! Error types for loading and persistence.

use crate::ImageHandle;
use std::io;
use thiserror::Error;

/// Failure to obtain decoded pixels for an image handle.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The handle does not resolve to anything.
    #[error("image not found: {handle}")]
    NotFound {
        /// Handle that failed to resolve.
        handle: ImageHandle,
    },

    /// File could not be read.
    #[error("failed to read {handle}: {source}")]
    Io {
        /// Handle being read.
        handle: ImageHandle,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The data is not in a supported container format.
    #[error("unsupported format for {handle}: {format}")]
    UnsupportedFormat {
        /// Handle being read.
        handle: ImageHandle,
        /// Detected or claimed format.
        format: String,
    },

    /// Decoding failed.
    #[error("failed to get texture pixel data for {handle}: {reason}")]
    Decode {
        /// Handle being decoded.
        handle: ImageHandle,
        /// Decoder message.
        reason: String,
    },

    /// Decoded data is not a usable 2D image.
    #[error("{handle} is not a valid 2D image: {reason}")]
    InvalidImage {
        /// Handle being decoded.
        handle: ImageHandle,
        /// What was wrong.
        reason: String,
    },

    /// Background decode did not complete.
    #[error("background decode of {handle} was interrupted")]
    Interrupted {
        /// Handle being decoded.
        handle: ImageHandle,
    },
}

impl LoadError {
    /// Returns the handle this error refers to.
    pub fn handle(&self) -> &ImageHandle {
        match self {
            Self::NotFound { handle }
            | Self::Io { handle, .. }
            | Self::UnsupportedFormat { handle, .. }
            | Self::Decode { handle, .. }
            | Self::InvalidImage { handle, .. }
            | Self::Interrupted { handle } => handle,
        }
    }
}

/// Result type for load operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Persistence / encode error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Decoding error.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Encoding error.
    #[error("encode error: {0}")]
    EncodeError(String),

    /// Sidecar metadata could not be serialized.
    #[error("metadata error: {0}")]
    Metadata(#[from] serde_yaml::Error),

    /// Destination path is unusable.
    #[error("invalid asset path: {0}")]
    InvalidPath(String),
}

/// Result type for persistence operations.
pub type IoResult<T> = Result<T, IoError>;
