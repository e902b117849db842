//! Pixel and channel types.
//!
//! Every image in this workspace stores four 8-bit channels per pixel in
//! R, G, B, A order. [`Channel`] names one of those four planes and is used
//! both as a read selector (which plane of a source to sample) and as a slot
//! identifier (which plane of a packed mask to write).
//!
//! # Example
//!
//! ```rust
//! use mask_core::{Channel, Rgba8};
//!
//! let px: Rgba8 = [10, 20, 30, 255];
//! assert_eq!(Channel::Green.read(px), 20);
//! assert_eq!("a".parse::<Channel>().unwrap(), Channel::Alpha);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One RGBA pixel with 8 bits per channel.
pub type Rgba8 = [u8; 4];

/// Lowest representable channel value.
pub const CHANNEL_MIN: u8 = u8::MIN;

/// Highest representable channel value.
pub const CHANNEL_MAX: u8 = u8::MAX;

/// One of the four color planes of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Red plane (index 0).
    Red,
    /// Green plane (index 1).
    Green,
    /// Blue plane (index 2).
    Blue,
    /// Alpha plane (index 3).
    Alpha,
}

impl Channel {
    /// All channels in storage order.
    pub const ALL: [Channel; 4] = [Channel::Red, Channel::Green, Channel::Blue, Channel::Alpha];

    /// Returns the position of this channel inside an [`Rgba8`].
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
            Channel::Alpha => 3,
        }
    }

    /// Returns the channel stored at `index`, if any.
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Channel::Red),
            1 => Some(Channel::Green),
            2 => Some(Channel::Blue),
            3 => Some(Channel::Alpha),
            _ => None,
        }
    }

    /// Reads this channel from a pixel.
    #[inline]
    pub const fn read(self, pixel: Rgba8) -> u8 {
        pixel[self.index()]
    }

    /// Returns a pixel with `value` in this channel and zero elsewhere.
    #[inline]
    pub const fn isolate(self, value: u8) -> Rgba8 {
        let mut px = [0u8; 4];
        px[self.index()] = value;
        px
    }

    /// Single-letter name (`R`, `G`, `B`, `A`).
    pub const fn letter(self) -> char {
        match self {
            Channel::Red => 'R',
            Channel::Green => 'G',
            Channel::Blue => 'B',
            Channel::Alpha => 'A',
        }
    }

    /// Lowercase display name.
    pub const fn name(self) -> &'static str {
        match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
            Channel::Alpha => "alpha",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "r" | "red" | "0" => Ok(Channel::Red),
            "g" | "green" | "1" => Ok(Channel::Green),
            "b" | "blue" | "2" => Ok(Channel::Blue),
            "a" | "alpha" | "3" => Ok(Channel::Alpha),
            other => Err(format!("unknown channel '{}' (expected r, g, b or a)", other)),
        }
    }
}
