//! Notification sink for user-facing messages.
//!
//! Operations report load failures, dimension problems, skipped channels and
//! exports through a [`Notifier`] injected by the caller. The default
//! [`TracingNotifier`] forwards them to `tracing`; [`RecordingNotifier`]
//! keeps them for later inspection.

use mask_core::Channel;
use mask_io::ImageHandle;
use std::fmt;
use std::sync::Mutex;
use tracing::{error, info, warn};

/// Something the user should hear about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Pixel data for a source could not be obtained.
    LoadFailed {
        /// Source that failed.
        handle: ImageHandle,
        /// Mixer slot it was assigned to, if any.
        slot: Option<Channel>,
        /// Loader message.
        reason: String,
    },
    /// Source dimensions are not usable.
    DimensionMismatch {
        /// Source width.
        width: u32,
        /// Source height.
        height: u32,
        /// What was expected.
        expected: String,
    },
    /// A constant channel was not emitted.
    ChannelSkipped {
        /// Skipped channel.
        channel: Channel,
    },
    /// A result was persisted.
    Exported {
        /// Destination asset path.
        path: String,
    },
    /// The selected backend cannot perform the operation.
    Unsupported {
        /// Description of what was attempted.
        what: String,
    },
}

impl Notice {
    /// Returns `true` for notices that describe a failed operation.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Notice::LoadFailed { .. } | Notice::DimensionMismatch { .. } | Notice::Unsupported { .. }
        )
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::LoadFailed {
                handle,
                slot: Some(slot),
                reason,
            } => write!(f, "Failed to get texture pixel data for {} ({} slot): {}", handle, slot, reason),
            Notice::LoadFailed { handle, reason, .. } => {
                write!(f, "Failed to get texture pixel data for {}: {}", handle, reason)
            }
            Notice::DimensionMismatch {
                width,
                height,
                expected,
            } => write!(f, "Texture is {}x{}, expected {}", width, height, expected),
            Notice::ChannelSkipped { channel } => {
                write!(f, "{} channel is empty, skipping", channel.letter())
            }
            Notice::Exported { path } => write!(f, "Saved {}", path),
            Notice::Unsupported { what } => write!(f, "{} is not implemented", what),
        }
    }
}

/// Receives notices.
pub trait Notifier: Send + Sync {
    /// Delivers one notice.
    fn notify(&self, notice: Notice);
}

/// Forwards notices to `tracing`: failures as errors or warnings, the rest as info.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match &notice {
            Notice::LoadFailed { .. } | Notice::Unsupported { .. } => error!("{}", notice),
            Notice::DimensionMismatch { .. } => warn!("{}", notice),
            Notice::ChannelSkipped { .. } | Notice::Exported { .. } => info!("{}", notice),
        }
    }
}

/// Keeps every notice it receives.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices received so far, oldest first.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|n| n.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Removes and returns all notices.
    pub fn take(&self) -> Vec<Notice> {
        match self.notices.lock() {
            Ok(mut n) => std::mem::take(&mut *n),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        match self.notices.lock() {
            Ok(mut n) => n.push(notice),
            Err(poisoned) => poisoned.into_inner().push(notice),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording() {
        let rec = RecordingNotifier::new();
        rec.notify(Notice::ChannelSkipped {
            channel: Channel::Green,
        });
        rec.notify(Notice::Exported {
            path: "GeneratedMasks/T_A".into(),
        });
        assert_eq!(rec.notices().len(), 2);
        assert_eq!(rec.take().len(), 2);
        assert!(rec.notices().is_empty());
    }

    #[test]
    fn test_messages_are_distinct() {
        let load = Notice::LoadFailed {
            handle: ImageHandle::new("ao.png"),
            slot: Some(Channel::Red),
            reason: "not found".into(),
        };
        let dims = Notice::DimensionMismatch {
            width: 64,
            height: 32,
            expected: "a square image".into(),
        };
        let skip = Notice::ChannelSkipped {
            channel: Channel::Alpha,
        };
        assert!(load.to_string().contains("pixel data"));
        assert!(dims.to_string().contains("64x32"));
        assert!(skip.to_string().contains("empty"));
        assert!(load.is_failure() && dims.is_failure() && !skip.is_failure());
    }
}
