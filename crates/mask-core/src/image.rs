//! Owned RGBA8 image buffer.
//!
//! # Memory Layout
//!
//! Pixels are stored in **row-major** order, top-to-bottom, one [`Rgba8`]
//! per pixel:
//!
//! ```text
//! [RGBA RGBA RGBA ...]  <- Row 0
//! [RGBA RGBA RGBA ...]  <- Row 1
//! ```
//!
//! The buffer lives behind an [`Arc`], so cloning an image is cheap and two
//! clones always observe the same pixels. There is no API that mutates the
//! pixels of an existing image: every operation produces a new one.
//!
//! # Usage
//!
//! ```rust
//! use mask_core::{Channel, Image};
//!
//! let img = Image::filled(4, 4, [255, 0, 0, 255]);
//! assert!(img.is_square());
//! assert!(img.channel(Channel::Red).all(|v| v == 255));
//! ```

use crate::{Channel, Error, Result, Rgba8, TextureSettings};
use std::fmt;
use std::sync::Arc;

/// Owned, immutable RGBA8 image with texture settings.
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    /// Pixel data buffer (Arc for cheap cloning)
    pixels: Arc<Vec<Rgba8>>,
    /// Image width in pixels
    width: u32,
    /// Image height in pixels
    height: u32,
    /// Import/cook metadata
    settings: TextureSettings,
}

impl Image {
    /// Creates an image with every channel of every pixel set to zero.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0; 4])
    }

    /// Creates an image filled with one pixel value.
    pub fn filled(width: u32, height: u32, pixel: Rgba8) -> Self {
        let count = width as usize * height as usize;
        Self {
            pixels: Arc::new(vec![pixel; count]),
            width,
            height,
            settings: TextureSettings::default(),
        }
    }

    /// Creates an image from row-major pixels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferMismatch`] if `pixels.len() != width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgba8>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(Error::buffer_mismatch(expected, pixels.len()));
        }
        Ok(Self {
            pixels: Arc::new(pixels),
            width,
            height,
            settings: TextureSettings::default(),
        })
    }

    /// Creates an image from interleaved `RGBARGBA...` bytes.
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(Error::buffer_mismatch(expected, bytes.len()));
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|c| [c[0], c[1], c[2], c[3]])
            .collect();
        Self::from_pixels(width, height, pixels)
    }

    /// Creates an image by evaluating `f(x, y)` for every pixel in row-major order.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Rgba8) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            pixels: Arc::new(pixels),
            width,
            height,
            settings: TextureSettings::default(),
        }
    }

    /// Creates an image from normalized RGBA float pixels.
    ///
    /// Values are clamped to `[0, 1]` and rounded to the nearest 8-bit step.
    pub fn from_f32(width: u32, height: u32, data: &[[f32; 4]]) -> Result<Self> {
        let pixels = data.iter().map(|px| px.map(quantize)).collect();
        Self::from_pixels(width, height, pixels)
    }

    /// Returns this image with `settings` attached.
    pub fn with_settings(mut self, settings: TextureSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Returns the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the image dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns `true` if width equals height.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Returns `true` if the image has no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// Row-major pixel slice.
    #[inline]
    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    /// Texture settings attached to this image.
    #[inline]
    pub fn settings(&self) -> &TextureSettings {
        &self.settings
    }

    /// Returns the pixel at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Result<Rgba8> {
        if x >= self.width || y >= self.height {
            return Err(Error::out_of_bounds(x, y, self.width, self.height));
        }
        Ok(self.pixels[y as usize * self.width as usize + x as usize])
    }

    /// Iterates one channel's values in row-major order.
    pub fn channel(&self, channel: Channel) -> impl ExactSizeIterator<Item = u8> + '_ {
        self.pixels.iter().map(move |&px| channel.read(px))
    }

    /// Returns interleaved `RGBARGBA...` bytes.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|px| px.iter().copied()).collect()
    }

    /// Returns normalized RGBA float pixels (for resampling).
    pub fn to_f32(&self) -> Vec<[f32; 4]> {
        self.pixels.iter().map(|px| px.map(|v| v as f32 / 255.0)).collect()
    }

    /// Returns `true` if both images share the same pixel buffer allocation.
    #[inline]
    pub fn shares_buffer(&self, other: &Image) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Converts a normalized float to the nearest 8-bit value.
#[inline]
pub fn quantize(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pixels_validates_length() {
        assert!(Image::from_pixels(2, 2, vec![[0; 4]; 3]).is_err());
        assert!(Image::from_pixels(2, 2, vec![[0; 4]; 4]).is_ok());
    }

    #[test]
    fn test_from_fn_is_row_major() {
        let img = Image::from_fn(3, 2, |x, y| [x as u8, y as u8, 0, 255]);
        assert_eq!(img.pixels()[4], [1, 1, 0, 255]);
        assert_eq!(img.pixel(2, 1).unwrap(), [2, 1, 0, 255]);
        assert!(img.pixel(3, 0).is_err());
    }

    #[test]
    fn test_f32_roundtrip_is_exact() {
        let img = Image::from_fn(16, 16, |x, y| [(x * 16) as u8, (y * 16) as u8, 7, 255]);
        let back = Image::from_f32(16, 16, &img.to_f32()).unwrap();
        assert_eq!(back, img);
        assert!(Image::from_f32(2, 2, &[[0.0; 4]; 3]).is_err());
    }

    #[test]
    fn test_quantize_clamps() {
        assert_eq!(quantize(-0.5), 0);
        assert_eq!(quantize(1.5), 255);
        assert_eq!(quantize(0.5), 128);
        assert_eq!(quantize(f32::NAN), 0);
    }

    #[test]
    fn test_zero_sized_image_is_empty() {
        let img = Image::new(0, 4);
        assert!(img.is_empty());
        assert_eq!(img.pixel_count(), 0);
        assert!(Image::from_pixels(0, 0, Vec::new()).is_ok());
        assert!(img.pixel(0, 0).unwrap_err().is_bounds_error());
    }

    #[test]
    fn test_clone_shares_buffer() {
        let a = Image::new(8, 8);
        let b = a.clone();
        assert!(a.shares_buffer(&b));
        assert!(!a.shares_buffer(&Image::new(8, 8)));
    }

    #[test]
    fn test_rgba_bytes_roundtrip() {
        let bytes: Vec<u8> = (0..16).collect();
        let img = Image::from_rgba_bytes(2, 2, &bytes).unwrap();
        assert_eq!(img.pixels()[1], [4, 5, 6, 7]);
        assert_eq!(img.to_rgba_bytes(), bytes);
    }
}
