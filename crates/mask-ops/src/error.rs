//! Error types for mask operations.
//!
//! Every error is fatal to the single operation that raised it: no partial
//! packed image or partial split result is ever returned.

use mask_core::Channel;
use mask_io::{IoError, LoadError};
use std::path::PathBuf;
use thiserror::Error;

/// Resampling failure.
#[derive(Debug, Error)]
pub enum ResizeError {
    /// Requested target has a zero dimension.
    #[error("invalid target size {width}x{height}: dimensions must be > 0")]
    InvalidTarget {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// Source has no pixels to sample from.
    #[error("cannot resample an empty {width}x{height} image")]
    EmptySource {
        /// Source width.
        width: u32,
        /// Source height.
        height: u32,
    },

    /// Result buffer could not be assembled.
    #[error(transparent)]
    Core(#[from] mask_core::Error),
}

/// What went wrong inside one mixer slot.
#[derive(Debug, Error)]
pub enum SlotError {
    /// Source image could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Source image could not be resampled to the target resolution.
    #[error(transparent)]
    Resize(#[from] ResizeError),
}

/// Channel mixing failure.
#[derive(Debug, Error)]
pub enum MixError {
    /// One slot failed; the whole mix is aborted.
    #[error("{slot} slot failed: {source}")]
    Slot {
        /// Output channel whose slot failed.
        slot: Channel,
        /// Underlying failure.
        #[source]
        source: SlotError,
    },

    /// Backend cannot mix.
    #[error("mixing is not implemented: {0}")]
    Unsupported(String),
}

impl MixError {
    /// Wraps a slot failure.
    pub fn slot(slot: Channel, source: impl Into<SlotError>) -> Self {
        Self::Slot {
            slot,
            source: source.into(),
        }
    }

    /// Returns the failing slot, if the error came from one.
    pub fn failed_slot(&self) -> Option<Channel> {
        match self {
            Self::Slot { slot, .. } => Some(*slot),
            Self::Unsupported(_) => None,
        }
    }
}

/// Channel splitting failure.
#[derive(Debug, Error)]
pub enum SplitError {
    /// Source is not square.
    #[error("cannot split non-square image {width}x{height}: only square sources are supported")]
    NonSquare {
        /// Source width.
        width: u32,
        /// Source height.
        height: u32,
    },

    /// Source has a zero dimension.
    #[error("cannot split empty image {width}x{height}")]
    Empty {
        /// Source width.
        width: u32,
        /// Source height.
        height: u32,
    },

    /// Source image could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Backend cannot split.
    #[error("splitting is not implemented: {0}")]
    Unsupported(String),
}

/// Configuration loading or validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file does not exist.
    #[error("config not found: {path}")]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// Config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// YAML is malformed or has wrong types.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Values parsed but are not acceptable.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Any failure of a mask operation, including persistence.
#[derive(Debug, Error)]
pub enum OpsError {
    /// Resampling failure.
    #[error(transparent)]
    Resize(#[from] ResizeError),

    /// Mixing failure.
    #[error(transparent)]
    Mix(#[from] MixError),

    /// Splitting failure.
    #[error(transparent)]
    Split(#[from] SplitError),

    /// Configuration failure.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Persisting a result failed.
    #[error("failed to save asset: {0}")]
    Persist(#[from] IoError),
}

/// Result type for mask operations.
pub type OpsResult<T> = Result<T, OpsError>;
