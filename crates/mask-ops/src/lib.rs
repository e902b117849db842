//! # mask-ops
//!
//! Channel packing and unpacking for mask textures.
//!
//! # Modules
//!
//! - [`resize`] - Resampling with nine named filters plus a configurable default
//! - [`mixer`] - Four sources, one selected channel each, packed into one image
//! - [`splitter`] - One packed image split into per-channel images
//! - [`trivial`] - Detection of channels that only hold 0 and 255
//! - [`backend`] - Pixel-copy, render-target and (unimplemented) shader strategies
//! - [`config`] - YAML configuration
//! - [`notify`] - User-facing notices
//!
//! # Example
//!
//! ```rust
//! use mask_core::{Channel, Image};
//! use mask_io::MemoryLoader;
//! use mask_ops::{ChannelSlot, MaskTools, MixSpec, SplitSpec};
//!
//! let ao = Image::filled(4, 4, [90, 90, 90, 255]);
//! let rough = Image::filled(8, 8, [200, 200, 200, 255]);
//!
//! let spec = MixSpec::new(4)
//!     .with_slot(Channel::Red, ChannelSlot::new(ao, Channel::Red))
//!     .with_slot(Channel::Green, ChannelSlot::new(rough, Channel::Green));
//!
//! let tools = MaskTools::new(MemoryLoader::new());
//! let packed = tools.mix(&spec).unwrap();
//! assert_eq!(packed.pixels()[0], [90, 200, 0, 255]);
//!
//! let split = tools.split(&SplitSpec::new(packed)).unwrap();
//! assert_eq!(split.len(), 2); // blue is all 0, alpha all 255
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backend;
pub mod config;
mod engine;
mod error;
pub mod mixer;
pub mod notify;
pub mod resize;
mod source;
pub mod splitter;
pub mod trivial;

pub use backend::{CreationMethod, MaskBackend, MaterialBackend, PixelCopyBackend, ShaderBackend};
pub use config::{MaskResolution, MaskToolsConfig, MixerConfig, SplitterConfig};
pub use engine::{EngineContext, MaskTools};
pub use error::{
    ConfigError, ConfigResult, MixError, OpsError, OpsResult, ResizeError, SlotError, SplitError,
};
pub use mixer::{ChannelSlot, MixSpec};
pub use notify::{Notice, Notifier, RecordingNotifier, TracingNotifier};
pub use resize::{EdgeMode, Resampler, ResizeFilter};
pub use source::ImageSource;
pub use splitter::{SplitOutput, SplitResult, SplitSpec};
pub use trivial::{TrivialityTracker, is_trivial};
