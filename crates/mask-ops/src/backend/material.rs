//! Render-target backend.
//!
//! Mixing draws every output texel into an RGBA16F target, splitting draws
//! each channel into its own R16F target. The draw runs row-parallel; the
//! readback then blocks until the whole target is available and converts
//! it back to 8 bits. Half floats hold every `k / 255` closely enough that
//! the readback reproduces the 8-bit input exactly.

use super::{CreationMethod, MaskBackend};
use crate::engine::EngineContext;
use crate::mixer::prepare_slots;
use crate::splitter::{assemble, load_source};
use crate::trivial::is_trivial;
use crate::{MixError, MixSpec, SplitError, SplitResult, SplitSpec};
use half::f16;
use mask_core::{Channel, Image, TextureSettings, quantize};
use tracing::trace;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Draws into half-float render targets and reads them back.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialBackend;

/// Off-screen target of `T` texels.
struct RenderTarget<T> {
    width: u32,
    height: u32,
    texels: Vec<T>,
}

impl<T: Copy + Send + Sync> RenderTarget<T> {
    fn new(width: u32, height: u32, clear: T) -> Self {
        Self {
            width,
            height,
            texels: vec![clear; width as usize * height as usize],
        }
    }

    /// Shades every texel.
    fn draw(&mut self, shade: impl Fn(u32, u32) -> T + Send + Sync) {
        let width = self.width as usize;
        if width == 0 {
            return;
        }
        let fill = |(y, row): (usize, &mut [T])| {
            for (x, texel) in row.iter_mut().enumerate() {
                *texel = shade(x as u32, y as u32);
            }
        };

        #[cfg(feature = "parallel")]
        self.texels.par_chunks_mut(width).enumerate().for_each(fill);
        #[cfg(not(feature = "parallel"))]
        self.texels.chunks_mut(width).enumerate().for_each(fill);
    }

    /// Blocking GPU-to-CPU copy.
    fn read_back<U>(&self, convert: impl Fn(T) -> U) -> Vec<U> {
        trace!("reading back {}x{} target", self.width, self.height);
        self.texels.iter().map(|&t| convert(t)).collect()
    }
}

#[inline]
fn encode(v: u8) -> f16 {
    f16::from_f32(v as f32 / 255.0)
}

#[inline]
fn decode(v: f16) -> u8 {
    quantize(v.to_f32())
}

impl MaskBackend for MaterialBackend {
    fn method(&self) -> CreationMethod {
        CreationMethod::Material
    }

    fn mix(&self, ctx: &EngineContext<'_>, spec: &MixSpec) -> Result<Image, MixError> {
        let slots = prepare_slots(ctx, spec)?;
        let res = spec.resolution();

        let mut target = RenderTarget::new(res, res, [f16::ZERO; 4]);
        target.draw(|x, y| {
            let i = y as usize * res as usize + x as usize;
            Channel::ALL.map(|c| encode(slots[c.index()].value(i)))
        });

        let texels = target.read_back(|t| t.map(decode));
        let packed = Image::from_fn(res, res, |x, y| texels[y as usize * res as usize + x as usize]);
        Ok(packed.with_settings(TextureSettings::packed_mask()))
    }

    fn split(&self, ctx: &EngineContext<'_>, spec: &SplitSpec) -> Result<SplitResult, SplitError> {
        let source = load_source(ctx, spec)?;
        let (width, height) = source.dimensions();
        let pixels = source.pixels();

        let mut planes: [Vec<u8>; 4] = Default::default();
        let mut trivial = [true; 4];
        for channel in Channel::ALL {
            let mut target = RenderTarget::new(width, height, f16::ZERO);
            target.draw(|x, y| {
                let px = pixels[y as usize * width as usize + x as usize];
                encode(channel.read(px))
            });
            let plane = target.read_back(decode);
            trivial[channel.index()] = is_trivial(plane.iter().copied());
            planes[channel.index()] = plane;
        }

        Ok(assemble(ctx, spec, &source, &planes, trivial))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_float_roundtrip_is_exact() {
        for v in 0..=255u8 {
            assert_eq!(decode(encode(v)), v);
        }
    }

    #[test]
    fn test_render_target_draw() {
        let mut target = RenderTarget::new(3, 2, 0u32);
        target.draw(|x, y| x + 10 * y);
        assert_eq!(target.read_back(|t| t), [0, 1, 2, 10, 11, 12]);
    }
}
