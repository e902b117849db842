//! Image resampling.
//!
//! Separable two-pass resize (horizontal then vertical) computed in `f32` and
//! quantized back to 8 bits. Weights for each output coordinate are computed
//! once per axis and reused for every row or column.
//!
//! # Filters
//!
//! - [`ResizeFilter::Point`] - Nearest sample, no interpolation
//! - [`ResizeFilter::Box`] - Unweighted average over the footprint
//! - [`ResizeFilter::Triangle`] / [`ResizeFilter::Bilinear`] - Linear falloff
//! - [`ResizeFilter::CubicGaussian`] - Cubic B-spline (B=1, C=0), soft
//! - [`ResizeFilter::CubicSharp`] - Catmull-Rom (B=0, C=0.5), sharp
//! - [`ResizeFilter::CubicMitchell`] - Mitchell-Netravali (B=C=1/3)
//! - [`ResizeFilter::AdaptiveSharp`] - Sharp up, Mitchell down
//! - [`ResizeFilter::AdaptiveSmooth`] - Mitchell up, Gaussian down
//! - [`ResizeFilter::Default`] - Whatever the [`Resampler`] is configured with
//!
//! Adaptive filters pick their kernel per axis, so an axis whose size does
//! not change is left untouched. Resizing to the current size returns the
//! input image itself, whatever the filter.
//!
//! # Example
//!
//! ```rust
//! use mask_core::Image;
//! use mask_ops::resize::{Resampler, ResizeFilter};
//!
//! let src = Image::filled(16, 16, [128, 64, 32, 255]);
//! let dst = Resampler::default().resize(&src, 64, ResizeFilter::CubicMitchell).unwrap();
//! assert_eq!(dst.dimensions(), (64, 64));
//! ```

use crate::ResizeError;
use mask_core::Image;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Filter used when a [`Resampler`] is asked to resolve `Default` and has
/// no concrete default of its own.
pub const FALLBACK_FILTER: ResizeFilter = ResizeFilter::AdaptiveSharp;

/// Named resampling filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeFilter {
    /// Resolved through the resampler's configured default.
    #[default]
    Default,
    /// Nearest neighbour.
    Point,
    /// Box average.
    Box,
    /// Triangle (tent).
    Triangle,
    /// Alias of [`Triangle`](Self::Triangle).
    Bilinear,
    /// Cubic B-spline.
    CubicGaussian,
    /// Catmull-Rom.
    CubicSharp,
    /// Mitchell-Netravali.
    CubicMitchell,
    /// Cubic-sharp when upsampling, cubic-Mitchell when downsampling.
    AdaptiveSharp,
    /// Cubic-Mitchell when upsampling, cubic-Gaussian when downsampling.
    AdaptiveSmooth,
}

impl ResizeFilter {
    /// All filters, `Default` first.
    pub const ALL: [ResizeFilter; 10] = [
        ResizeFilter::Default,
        ResizeFilter::Point,
        ResizeFilter::Box,
        ResizeFilter::Triangle,
        ResizeFilter::Bilinear,
        ResizeFilter::CubicGaussian,
        ResizeFilter::CubicSharp,
        ResizeFilter::CubicMitchell,
        ResizeFilter::AdaptiveSharp,
        ResizeFilter::AdaptiveSmooth,
    ];

    /// Kebab-case name as used in config files and on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Point => "point",
            Self::Box => "box",
            Self::Triangle => "triangle",
            Self::Bilinear => "bilinear",
            Self::CubicGaussian => "cubic-gaussian",
            Self::CubicSharp => "cubic-sharp",
            Self::CubicMitchell => "cubic-mitchell",
            Self::AdaptiveSharp => "adaptive-sharp",
            Self::AdaptiveSmooth => "adaptive-smooth",
        }
    }

    /// Returns `true` for every filter except `Default`.
    pub const fn is_concrete(self) -> bool {
        !matches!(self, Self::Default)
    }

    /// Kernel for one axis going from `src` to `dst` samples.
    ///
    /// `None` means the axis is copied unchanged. Must not be called on
    /// `Default`.
    fn axis_kernel(self, src: usize, dst: usize) -> Option<Kernel> {
        if src == dst {
            return None;
        }
        let upsampling = dst > src;
        Some(match self {
            Self::Point => Kernel::Point,
            Self::Box => Kernel::Box,
            Self::Triangle | Self::Bilinear => Kernel::Triangle,
            Self::CubicGaussian => Kernel::Cubic(CubicParams::GAUSSIAN),
            Self::CubicSharp => Kernel::Cubic(CubicParams::CATMULL_ROM),
            Self::CubicMitchell => Kernel::Cubic(CubicParams::MITCHELL),
            Self::AdaptiveSharp if upsampling => Kernel::Cubic(CubicParams::CATMULL_ROM),
            Self::AdaptiveSharp => Kernel::Cubic(CubicParams::MITCHELL),
            Self::AdaptiveSmooth if upsampling => Kernel::Cubic(CubicParams::MITCHELL),
            Self::AdaptiveSmooth | Self::Default => Kernel::Cubic(CubicParams::GAUSSIAN),
        })
    }
}

impl fmt::Display for ResizeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResizeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.name() == normalized)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|f| f.name()).collect();
                format!("unknown filter '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

/// How samples outside the source are fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeMode {
    /// Repeat the edge sample.
    #[default]
    Clamp,
    /// Wrap around to the opposite edge (tiling textures).
    Wrap,
}

impl EdgeMode {
    /// Kebab-case name.
    pub const fn name(self) -> &'static str {
        match self {
            EdgeMode::Clamp => "clamp",
            EdgeMode::Wrap => "wrap",
        }
    }

    #[inline]
    fn map(self, index: i64, len: usize) -> usize {
        let len = len as i64;
        let mapped = match self {
            EdgeMode::Clamp => index.clamp(0, len - 1),
            EdgeMode::Wrap => index.rem_euclid(len),
        };
        mapped as usize
    }
}

impl fmt::Display for EdgeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EdgeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clamp" => Ok(EdgeMode::Clamp),
            "wrap" | "repeat" => Ok(EdgeMode::Wrap),
            _ => Err(format!("unknown edge mode '{}', expected clamp or wrap", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CubicParams {
    b: f32,
    c: f32,
}

impl CubicParams {
    const GAUSSIAN: Self = Self { b: 1.0, c: 0.0 };
    const CATMULL_ROM: Self = Self { b: 0.0, c: 0.5 };
    const MITCHELL: Self = Self {
        b: 1.0 / 3.0,
        c: 1.0 / 3.0,
    };
}

/// Concrete one-dimensional kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Kernel {
    Point,
    Box,
    Triangle,
    Cubic(CubicParams),
}

impl Kernel {
    #[inline]
    fn support(self) -> f32 {
        match self {
            Kernel::Point | Kernel::Box => 0.5,
            Kernel::Triangle => 1.0,
            Kernel::Cubic(_) => 2.0,
        }
    }

    #[inline]
    fn weight(self, x: f32) -> f32 {
        let ax = x.abs();
        match self {
            Kernel::Point | Kernel::Box => {
                if ax <= 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
            Kernel::Triangle => (1.0 - ax).max(0.0),
            Kernel::Cubic(p) => cubic_weight(ax, p.b, p.c),
        }
    }
}

/// Mitchell-Netravali family, evaluated at `ax = |x|`.
#[inline]
fn cubic_weight(ax: f32, b: f32, c: f32) -> f32 {
    if ax < 1.0 {
        ((12.0 - 9.0 * b - 6.0 * c) * ax * ax * ax
            + (-18.0 + 12.0 * b + 6.0 * c) * ax * ax
            + (6.0 - 2.0 * b))
            / 6.0
    } else if ax < 2.0 {
        ((-b - 6.0 * c) * ax * ax * ax
            + (6.0 * b + 30.0 * c) * ax * ax
            + (-12.0 * b - 48.0 * c) * ax
            + (8.0 * b + 24.0 * c))
            / 6.0
    } else {
        0.0
    }
}

/// Normalized taps `(source index, weight)` for one output coordinate.
type Taps = Vec<(usize, f32)>;

fn axis_taps(src: usize, dst: usize, kernel: Kernel, edge: EdgeMode) -> Vec<Taps> {
    let scale = src as f32 / dst as f32;

    if kernel == Kernel::Point {
        return (0..dst)
            .map(|i| {
                let s = ((i as f32 + 0.5) * scale).floor() as i64;
                vec![(edge.map(s, src), 1.0)]
            })
            .collect();
    }

    // Widen the kernel when minifying so every source sample contributes.
    let filter_scale = scale.max(1.0);
    let support = kernel.support() * filter_scale;

    (0..dst)
        .map(|i| {
            let center = (i as f32 + 0.5) * scale - 0.5;
            let lo = (center - support).floor() as i64;
            let hi = (center + support).ceil() as i64;

            let mut taps: Taps = Vec::with_capacity((hi - lo + 1) as usize);
            let mut total = 0.0f32;
            for s in lo..=hi {
                let w = kernel.weight((s as f32 - center) / filter_scale);
                if w != 0.0 {
                    taps.push((edge.map(s, src), w));
                    total += w;
                }
            }

            if taps.is_empty() || total.abs() < f32::EPSILON {
                let nearest = center.round() as i64;
                return vec![(edge.map(nearest, src), 1.0)];
            }
            for tap in &mut taps {
                tap.1 /= total;
            }
            taps
        })
        .collect()
}

#[inline]
fn accumulate(samples: impl Iterator<Item = ([f32; 4], f32)>) -> [f32; 4] {
    let mut acc = [0.0f32; 4];
    for (px, w) in samples {
        for c in 0..4 {
            acc[c] += px[c] * w;
        }
    }
    acc
}

fn resample_rows(src: &[[f32; 4]], width: usize, dst_width: usize, taps: &[Taps]) -> Vec<[f32; 4]> {
    let height = src.len() / width;
    let mut out = vec![[0.0f32; 4]; dst_width * height];
    let fill = |(y, row): (usize, &mut [[f32; 4]])| {
        let src_row = &src[y * width..(y + 1) * width];
        for (x, px) in row.iter_mut().enumerate() {
            *px = accumulate(taps[x].iter().map(|&(sx, w)| (src_row[sx], w)));
        }
    };

    #[cfg(feature = "parallel")]
    out.par_chunks_mut(dst_width).enumerate().for_each(fill);
    #[cfg(not(feature = "parallel"))]
    out.chunks_mut(dst_width).enumerate().for_each(fill);

    out
}

fn resample_columns(src: &[[f32; 4]], width: usize, dst_height: usize, taps: &[Taps]) -> Vec<[f32; 4]> {
    let mut out = vec![[0.0f32; 4]; width * dst_height];
    let fill = |(y, row): (usize, &mut [[f32; 4]])| {
        for (x, px) in row.iter_mut().enumerate() {
            *px = accumulate(taps[y].iter().map(|&(sy, w)| (src[sy * width + x], w)));
        }
    };

    #[cfg(feature = "parallel")]
    out.par_chunks_mut(width).enumerate().for_each(fill);
    #[cfg(not(feature = "parallel"))]
    out.chunks_mut(width).enumerate().for_each(fill);

    out
}

/// Resizes images with a configurable default filter and edge handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resampler {
    default_filter: ResizeFilter,
    edge_x: EdgeMode,
    edge_y: EdgeMode,
}

impl Default for Resampler {
    fn default() -> Self {
        Self::new(FALLBACK_FILTER)
    }
}

impl Resampler {
    /// Creates a resampler that resolves `Default` to `default_filter`.
    pub fn new(default_filter: ResizeFilter) -> Self {
        Self {
            default_filter,
            edge_x: EdgeMode::Clamp,
            edge_y: EdgeMode::Clamp,
        }
    }

    /// Sets per-axis edge handling.
    pub fn with_edge_modes(mut self, x: EdgeMode, y: EdgeMode) -> Self {
        self.edge_x = x;
        self.edge_y = y;
        self
    }

    /// Configured default filter (may itself be `Default`).
    pub fn default_filter(&self) -> ResizeFilter {
        self.default_filter
    }

    /// Maps `Default` to a concrete filter; other filters pass through.
    pub fn resolve(&self, filter: ResizeFilter) -> ResizeFilter {
        match filter {
            ResizeFilter::Default if self.default_filter.is_concrete() => self.default_filter,
            ResizeFilter::Default => FALLBACK_FILTER,
            concrete => concrete,
        }
    }

    /// Resizes to a square `target` x `target`.
    ///
    /// # Errors
    ///
    /// [`ResizeError::InvalidTarget`] if `target` is 0,
    /// [`ResizeError::EmptySource`] if the source has no pixels.
    pub fn resize(&self, image: &Image, target: u32, filter: ResizeFilter) -> Result<Image, ResizeError> {
        self.resize_to(image, target, target, filter)
    }

    /// Resizes to `width` x `height`.
    pub fn resize_to(
        &self,
        image: &Image,
        width: u32,
        height: u32,
        filter: ResizeFilter,
    ) -> Result<Image, ResizeError> {
        if width == 0 || height == 0 {
            return Err(ResizeError::InvalidTarget { width, height });
        }
        if image.dimensions() == (width, height) {
            return Ok(image.clone());
        }
        if image.is_empty() {
            return Err(ResizeError::EmptySource {
                width: image.width(),
                height: image.height(),
            });
        }

        let filter = self.resolve(filter);
        let (src_w, src_h) = (image.width() as usize, image.height() as usize);
        let (dst_w, dst_h) = (width as usize, height as usize);
        trace!(
            "resize {}x{} -> {}x{} with {}",
            src_w, src_h, dst_w, dst_h, filter
        );

        let mut buf = image.to_f32();

        if let Some(kernel) = filter.axis_kernel(src_w, dst_w) {
            let taps = axis_taps(src_w, dst_w, kernel, self.edge_x);
            buf = resample_rows(&buf, src_w, dst_w, &taps);
        }
        if let Some(kernel) = filter.axis_kernel(src_h, dst_h) {
            let taps = axis_taps(src_h, dst_h, kernel, self.edge_y);
            buf = resample_columns(&buf, dst_w, dst_h, &taps);
        }

        Ok(Image::from_f32(width, height, &buf)?.with_settings(image.settings().clone()))
    }
}

/// Resizes with the built-in fallback as `Default`.
pub fn resize(image: &Image, target: u32, filter: ResizeFilter) -> Result<Image, ResizeError> {
    Resampler::default().resize(image, target, filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn checker(size: u32) -> Image {
        Image::from_fn(size, size, |x, y| {
            let v = if (x + y) % 2 == 0 { 255 } else { 0 };
            [v, 255 - v, (x * 40) as u8, 255]
        })
    }

    #[test]
    fn test_kernel_weights() {
        assert_relative_eq!(Kernel::Triangle.weight(0.0), 1.0);
        assert_relative_eq!(Kernel::Triangle.weight(0.5), 0.5);
        assert_relative_eq!(Kernel::Box.weight(0.4), 1.0);
        assert_relative_eq!(Kernel::Box.weight(0.6), 0.0);

        let cr = Kernel::Cubic(CubicParams::CATMULL_ROM);
        assert_relative_eq!(cr.weight(0.0), 1.0);
        assert_relative_eq!(cr.weight(1.0), 0.0, epsilon = 1e-6);
        assert_relative_eq!(cr.weight(2.0), 0.0);

        let bs = Kernel::Cubic(CubicParams::GAUSSIAN);
        assert_relative_eq!(bs.weight(0.0), 4.0 / 6.0, epsilon = 1e-6);
        assert_relative_eq!(bs.weight(1.0), 1.0 / 6.0, epsilon = 1e-6);
    }

    #[test]
    fn test_taps_are_normalized() {
        for kernel in [
            Kernel::Box,
            Kernel::Triangle,
            Kernel::Cubic(CubicParams::MITCHELL),
            Kernel::Cubic(CubicParams::CATMULL_ROM),
        ] {
            for (src, dst) in [(8, 32), (32, 8), (7, 3)] {
                for taps in axis_taps(src, dst, kernel, EdgeMode::Clamp) {
                    let sum: f32 = taps.iter().map(|t| t.1).sum();
                    assert_relative_eq!(sum, 1.0, epsilon = 1e-5);
                    assert!(taps.iter().all(|t| t.0 < src));
                }
            }
        }
    }

    #[test]
    fn test_identity_for_every_filter() {
        let img = checker(8);
        for filter in ResizeFilter::ALL {
            let out = Resampler::default().resize(&img, 8, filter).unwrap();
            assert_eq!(out, img, "{filter}");
            assert!(out.shares_buffer(&img));
        }
    }

    #[test]
    fn test_zero_target_rejected() {
        let err = resize(&checker(4), 0, ResizeFilter::Box).unwrap_err();
        assert!(matches!(err, ResizeError::InvalidTarget { width: 0, height: 0 }));
    }

    #[test]
    fn test_empty_source_rejected() {
        let err = resize(&Image::new(0, 0), 4, ResizeFilter::Box).unwrap_err();
        assert!(matches!(err, ResizeError::EmptySource { .. }));
    }

    #[test]
    fn test_flat_image_stays_flat() {
        let img = Image::filled(8, 8, [10, 100, 200, 255]);
        for filter in ResizeFilter::ALL {
            for target in [3, 16, 32] {
                let out = resize(&img, target, filter).unwrap();
                assert_eq!(out.dimensions(), (target, target));
                assert!(out.pixels().iter().all(|&p| p == [10, 100, 200, 255]), "{filter} {target}");
            }
        }
    }

    #[test]
    fn test_point_upsample_replicates() {
        let img = Image::from_pixels(2, 1, vec![[0, 0, 0, 255], [255, 255, 255, 255]]).unwrap();
        let out = Resampler::default()
            .resize_to(&img, 4, 1, ResizeFilter::Point)
            .unwrap();
        let reds: Vec<u8> = out.channel(mask_core::Channel::Red).collect();
        assert_eq!(reds, [0, 0, 255, 255]);
    }

    #[test]
    fn test_box_downsample_averages() {
        let img = Image::from_pixels(
            2,
            2,
            vec![[0, 0, 0, 0], [255, 0, 0, 0], [0, 0, 0, 0], [255, 0, 0, 0]],
        )
        .unwrap();
        let out = resize(&img, 1, ResizeFilter::Box).unwrap();
        assert_eq!(out.pixels()[0][0], 128);
    }

    #[test]
    fn test_unchanged_axis_is_untouched() {
        let img = checker(4);
        let out = Resampler::default()
            .resize_to(&img, 4, 8, ResizeFilter::CubicSharp)
            .unwrap();
        // Blue depends on x only.
        for y in 0..8 {
            let row: Vec<u8> = (0..4).map(|x| out.pixel(x, y).unwrap()[2]).collect();
            assert_eq!(row, [0, 40, 80, 120]);
        }
    }

    #[test]
    fn test_default_resolution() {
        let r = Resampler::new(ResizeFilter::Box);
        assert_eq!(r.resolve(ResizeFilter::Default), ResizeFilter::Box);
        assert_eq!(r.resolve(ResizeFilter::Point), ResizeFilter::Point);

        let r = Resampler::new(ResizeFilter::Default);
        assert_eq!(r.resolve(ResizeFilter::Default), FALLBACK_FILTER);
    }

    #[test]
    fn test_wrap_edges_blend_opposite_side() {
        let img = Image::from_pixels(2, 1, vec![[255, 0, 0, 255], [0, 0, 0, 255]]).unwrap();
        let clamp = Resampler::default()
            .resize_to(&img, 4, 1, ResizeFilter::Triangle)
            .unwrap();
        let wrap = Resampler::default()
            .with_edge_modes(EdgeMode::Wrap, EdgeMode::Clamp)
            .resize_to(&img, 4, 1, ResizeFilter::Triangle)
            .unwrap();
        // Left-most sample sits between the red edge and, when wrapping, the black right edge.
        assert_eq!(clamp.pixels()[0][0], 255);
        assert!(wrap.pixels()[0][0] < 255);
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!("cubic-sharp".parse::<ResizeFilter>(), Ok(ResizeFilter::CubicSharp));
        assert_eq!("Adaptive_Smooth".parse::<ResizeFilter>(), Ok(ResizeFilter::AdaptiveSmooth));
        assert!("lanczos".parse::<ResizeFilter>().is_err());
    }

    #[test]
    fn test_parse_edge_mode() {
        assert_eq!("Wrap".parse::<EdgeMode>(), Ok(EdgeMode::Wrap));
        assert_eq!("clamp".parse::<EdgeMode>(), Ok(EdgeMode::Clamp));
        assert!("mirror".parse::<EdgeMode>().is_err());
        assert_eq!(EdgeMode::Wrap.to_string(), "wrap");
    }
}
