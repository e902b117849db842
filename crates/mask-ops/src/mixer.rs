//! Channel mixer: four sources in, one packed mask out.
//!
//! Each output channel has a [`ChannelSlot`] naming a source image, which
//! channel of that source to read, and how to resample it to the target
//! resolution. Slots are independent; two slots may read the same source.
//!
//! An unassigned slot reads a flat 8x8 fallback image whose every channel
//! equals the slot's default (0 for R, G and B, 255 for A), so the output
//! defaults to opaque black whatever selector the slot carries.
//!
//! # Example
//!
//! ```rust
//! use mask_core::{Channel, Image};
//! use mask_io::MemoryLoader;
//! use mask_ops::{ChannelSlot, MaskTools, MixSpec};
//!
//! let red = Image::filled(2, 2, [255, 0, 0, 255]);
//! let spec = MixSpec::new(2).with_slot(Channel::Red, ChannelSlot::new(red, Channel::Red));
//!
//! let packed = MaskTools::new(MemoryLoader::new()).mix(&spec).unwrap();
//! assert!(packed.pixels().iter().all(|&p| p == [255, 0, 0, 255]));
//! ```

use crate::engine::EngineContext;
use crate::notify::Notice;
use crate::resize::{EdgeMode, Resampler, ResizeFilter};
use crate::{ImageSource, MaskToolsConfig, MixError};
use mask_core::{Channel, Image};
use tracing::debug;

/// Side length of the fallback image used for unassigned slots.
pub const FALLBACK_SIZE: u32 = 8;

/// Value an output channel takes when its slot has no source.
pub const fn slot_default(channel: Channel) -> u8 {
    match channel {
        Channel::Alpha => 255,
        _ => 0,
    }
}

/// Flat image substituted for an unassigned slot.
pub fn fallback_image(channel: Channel) -> Image {
    let v = slot_default(channel);
    Image::filled(FALLBACK_SIZE, FALLBACK_SIZE, [v; 4])
}

/// One input position of a mix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSlot {
    /// Source image, or `None` for the fallback.
    pub source: Option<ImageSource>,
    /// Which channel of the source to read.
    pub selector: Channel,
    /// How the source is resampled to the target resolution.
    pub filter: ResizeFilter,
    /// Horizontal edge handling while resampling.
    pub edge_x: EdgeMode,
    /// Vertical edge handling while resampling.
    pub edge_y: EdgeMode,
}

impl Default for ChannelSlot {
    fn default() -> Self {
        Self::empty()
    }
}

impl ChannelSlot {
    /// Slot without a source.
    pub fn empty() -> Self {
        Self {
            source: None,
            selector: Channel::Red,
            filter: ResizeFilter::Default,
            edge_x: EdgeMode::Clamp,
            edge_y: EdgeMode::Clamp,
        }
    }

    /// Slot reading `selector` from `source` with the default filter.
    pub fn new(source: impl Into<ImageSource>, selector: Channel) -> Self {
        Self {
            source: Some(source.into()),
            selector,
            filter: ResizeFilter::Default,
            edge_x: EdgeMode::Clamp,
            edge_y: EdgeMode::Clamp,
        }
    }

    /// Sets the resampling filter.
    pub fn with_filter(mut self, filter: ResizeFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Sets edge handling per axis; tiling sources usually want `Wrap`.
    pub fn with_edge_modes(mut self, x: EdgeMode, y: EdgeMode) -> Self {
        self.edge_x = x;
        self.edge_y = y;
        self
    }

    /// Returns `true` if the slot has no source.
    pub fn is_empty(&self) -> bool {
        self.source.is_none()
    }
}

/// Full description of one mix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixSpec {
    slots: [ChannelSlot; 4],
    resolution: u32,
    default_filter: ResizeFilter,
}

impl MixSpec {
    /// Four empty slots at `resolution` x `resolution`.
    pub fn new(resolution: u32) -> Self {
        Self {
            slots: std::array::from_fn(|_| ChannelSlot::empty()),
            resolution,
            default_filter: crate::resize::FALLBACK_FILTER,
        }
    }

    /// Empty slots using the configured resolution, slot filter, edge modes and default filter.
    pub fn from_config(config: &MaskToolsConfig) -> Self {
        let mut spec = Self::new(config.mixer.resolution).with_default_filter(config.default_filter);
        for slot in &mut spec.slots {
            slot.filter = config.mixer.resize_method;
            slot.edge_x = config.mixer.edge_x;
            slot.edge_y = config.mixer.edge_y;
        }
        spec
    }

    /// Replaces the slot for `channel`.
    pub fn with_slot(mut self, channel: Channel, slot: ChannelSlot) -> Self {
        self.set_slot(channel, slot);
        self
    }

    /// Replaces the slot for `channel` in place.
    pub fn set_slot(&mut self, channel: Channel, slot: ChannelSlot) {
        self.slots[channel.index()] = slot;
    }

    /// Assigns a source to `channel`, keeping the slot's current filter.
    pub fn assign(mut self, channel: Channel, source: impl Into<ImageSource>, selector: Channel) -> Self {
        let slot = &mut self.slots[channel.index()];
        slot.source = Some(source.into());
        slot.selector = selector;
        self
    }

    /// Sets the filter `Default` resolves to.
    pub fn with_default_filter(mut self, filter: ResizeFilter) -> Self {
        self.default_filter = filter;
        self
    }

    /// Sets the target resolution.
    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    /// Slot for `channel`.
    pub fn slot(&self, channel: Channel) -> &ChannelSlot {
        &self.slots[channel.index()]
    }

    /// Slots in R, G, B, A order.
    pub fn slots(&self) -> impl Iterator<Item = (Channel, &ChannelSlot)> {
        Channel::ALL.into_iter().zip(self.slots.iter())
    }

    /// Output side length.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Filter `Default` resolves to.
    pub fn default_filter(&self) -> ResizeFilter {
        self.default_filter
    }
}

/// A slot's source, loaded and resampled to the target resolution.
#[derive(Debug, Clone)]
pub(crate) struct PreparedSlot {
    pub channel: Channel,
    pub image: Image,
    pub selector: Channel,
}

impl PreparedSlot {
    /// Scalar read for output pixel index `i`, or the slot default past the end.
    #[inline]
    pub fn value(&self, i: usize) -> u8 {
        self.image
            .pixels()
            .get(i)
            .map_or(slot_default(self.channel), |&px| self.selector.read(px))
    }
}

/// Loads and resamples every slot, in R, G, B, A order.
///
/// Stops at the first failing slot.
pub(crate) fn prepare_slots(ctx: &EngineContext<'_>, spec: &MixSpec) -> Result<Vec<PreparedSlot>, MixError> {
    for (_, slot) in spec.slots() {
        if let Some(source) = &slot.source {
            source.prefetch(ctx.loader);
        }
    }

    let resampler = Resampler::new(spec.default_filter());
    let mut prepared = Vec::with_capacity(4);
    for (channel, slot) in spec.slots() {
        let source = match &slot.source {
            None => fallback_image(channel),
            Some(source) => source.resolve(ctx.loader).map_err(|e| {
                ctx.notifier.notify(Notice::LoadFailed {
                    handle: e.handle().clone(),
                    slot: Some(channel),
                    reason: e.to_string(),
                });
                MixError::slot(channel, e)
            })?,
        };

        let image = resampler
            .with_edge_modes(slot.edge_x, slot.edge_y)
            .resize(&source, spec.resolution(), slot.filter)
            .map_err(|e| MixError::slot(channel, e))?;
        debug!(
            "{} slot: {}x{} -> {}x{}, reading {}",
            channel,
            source.width(),
            source.height(),
            image.width(),
            image.height(),
            slot.selector
        );

        prepared.push(PreparedSlot {
            channel,
            image,
            selector: slot.selector,
        });
    }
    Ok(prepared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;
    use mask_io::{ImageHandle, MemoryLoader};

    #[test]
    fn test_fallback_defaults() {
        assert_eq!(slot_default(Channel::Red), 0);
        assert_eq!(slot_default(Channel::Alpha), 255);
        let img = fallback_image(Channel::Alpha);
        assert_eq!(img.dimensions(), (8, 8));
        assert!(img.pixels().iter().all(|&p| p == [255; 4]));
    }

    #[test]
    fn test_spec_builders() {
        let img = Image::filled(4, 4, [1, 2, 3, 4]);
        let spec = MixSpec::new(16)
            .with_slot(
                Channel::Green,
                ChannelSlot::new(img.clone(), Channel::Blue).with_filter(ResizeFilter::Box),
            )
            .assign(Channel::Alpha, img, Channel::Red);

        assert!(spec.slot(Channel::Red).is_empty());
        assert_eq!(spec.slot(Channel::Green).selector, Channel::Blue);
        assert_eq!(spec.slot(Channel::Green).filter, ResizeFilter::Box);
        assert_eq!(spec.slot(Channel::Alpha).filter, ResizeFilter::Default);
        assert_eq!(spec.slots().count(), 4);
    }

    #[test]
    fn test_from_config_sets_edge_modes() {
        let mut config = MaskToolsConfig::default();
        config.mixer.edge_x = EdgeMode::Wrap;
        let spec = MixSpec::from_config(&config);
        for (_, slot) in spec.slots() {
            assert_eq!((slot.edge_x, slot.edge_y), (EdgeMode::Wrap, EdgeMode::Clamp));
        }
    }

    #[test]
    fn test_prepare_reports_failing_slot() {
        let loader = MemoryLoader::new();
        let notifier = RecordingNotifier::new();
        let ctx = EngineContext::new(&loader, &notifier);
        let spec = MixSpec::new(4).assign(Channel::Blue, ImageHandle::new("missing.png"), Channel::Red);

        let err = prepare_slots(&ctx, &spec).unwrap_err();
        assert_eq!(err.failed_slot(), Some(Channel::Blue));
        assert!(matches!(
            notifier.notices().as_slice(),
            [Notice::LoadFailed { slot: Some(Channel::Blue), .. }]
        ));
    }

    #[test]
    fn test_prepared_value_past_end_uses_default() {
        let slot = PreparedSlot {
            channel: Channel::Alpha,
            image: Image::filled(1, 1, [0, 0, 0, 7]),
            selector: Channel::Alpha,
        };
        assert_eq!(slot.value(0), 7);
        assert_eq!(slot.value(5), 255);
    }
}
