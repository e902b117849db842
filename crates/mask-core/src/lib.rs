//! # mask-core
//!
//! Core types for packing grayscale textures into mask textures and back.
//!
//! This crate provides the foundational types used by the rest of the workspace:
//!
//! - [`Image`] - Owned, immutable RGBA8 pixel buffer with texture settings
//! - [`Rgba8`] - One 8-bit RGBA pixel
//! - [`Channel`] - Red/Green/Blue/Alpha channel selector
//! - [`TextureSettings`] - Import/cook metadata carried alongside pixels
//!
//! ## Crate Structure
//!
//! ```text
//! mask-core (this crate)
//!    ^
//!    |
//!    +-- mask-io  (loading, PNG codec, persistence)
//!    +-- mask-ops (resampling, mixing, splitting)
//!    +-- mask-cli (masktools binary)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;
pub mod pixel;
pub mod settings;

pub use error::{Error, Result};
pub use image::{quantize, Image};
pub use pixel::{Channel, Rgba8, CHANNEL_MAX, CHANNEL_MIN};
pub use settings::{CompressionIntent, CookTiling, MipGen, TextureSettings};

/// Prelude module for convenient imports.
///
/// ```
/// use mask_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::image::Image;
    pub use crate::pixel::{Channel, Rgba8};
    pub use crate::settings::{CompressionIntent, CookTiling, MipGen, TextureSettings};
}
