//! Direct pixel-copy backend.

use super::{CreationMethod, MaskBackend};
use crate::engine::EngineContext;
use crate::mixer::{prepare_slots, slot_default};
use crate::splitter::{assemble, load_source};
use crate::trivial::TrivialityTracker;
use crate::{MixError, MixSpec, SplitError, SplitResult, SplitSpec};
use mask_core::{Channel, Image, TextureSettings};

/// Reads source pixels into per-channel scalar arrays and writes the result directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct PixelCopyBackend;

impl MaskBackend for PixelCopyBackend {
    fn method(&self) -> CreationMethod {
        CreationMethod::PixelData
    }

    fn mix(&self, ctx: &EngineContext<'_>, spec: &MixSpec) -> Result<Image, MixError> {
        let slots = prepare_slots(ctx, spec)?;
        let arrays: Vec<Vec<u8>> = slots
            .iter()
            .map(|s| s.image.channel(s.selector).collect())
            .collect();

        let res = spec.resolution();
        let packed = Image::from_fn(res, res, |x, y| {
            let i = y as usize * res as usize + x as usize;
            Channel::ALL.map(|c| {
                arrays[c.index()]
                    .get(i)
                    .copied()
                    .unwrap_or(slot_default(c))
            })
        });
        Ok(packed.with_settings(TextureSettings::packed_mask()))
    }

    fn split(&self, ctx: &EngineContext<'_>, spec: &SplitSpec) -> Result<SplitResult, SplitError> {
        let source = load_source(ctx, spec)?;

        let mut planes: [Vec<u8>; 4] =
            std::array::from_fn(|_| Vec::with_capacity(source.pixel_count()));
        let mut trackers = [TrivialityTracker::new(); 4];
        for px in source.pixels() {
            for c in 0..4 {
                planes[c].push(px[c]);
                trackers[c].observe(px[c]);
            }
        }

        let trivial = trackers.map(|t| t.is_trivial());
        Ok(assemble(ctx, spec, &source, &planes, trivial))
    }
}
