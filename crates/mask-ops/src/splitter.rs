//! Channel splitter: one packed texture in, up to four channel textures out.
//!
//! Each emitted image keeps its values in the channel they came from (red
//! values land in the red channel of an otherwise zero image) and inherits
//! the source's cook settings. Constant channels, where every value is 0 or
//! 255, are dropped when `discard_empty_channels` is set.
//!
//! Only square sources are supported.

use crate::engine::EngineContext;
use crate::notify::Notice;
use crate::{ImageSource, MaskToolsConfig, SplitError};
use mask_core::{Channel, Image, TextureSettings};
use tracing::debug;

/// Full description of one split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitSpec {
    /// Packed texture to split.
    pub source: ImageSource,
    /// Drop channels that hold only 0 and 255.
    pub discard_empty_channels: bool,
}

impl SplitSpec {
    /// Splits `source`, discarding empty channels.
    pub fn new(source: impl Into<ImageSource>) -> Self {
        Self {
            source: source.into(),
            discard_empty_channels: true,
        }
    }

    /// Uses the configured discard flag.
    pub fn from_config(source: impl Into<ImageSource>, config: &MaskToolsConfig) -> Self {
        Self::new(source).with_discard_empty(config.splitter.discard_empty_channels)
    }

    /// Sets whether constant channels are dropped.
    pub fn with_discard_empty(mut self, discard: bool) -> Self {
        self.discard_empty_channels = discard;
        self
    }
}

/// One emitted channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOutput {
    /// Source channel.
    pub channel: Channel,
    /// Channel image at the source's resolution.
    pub image: Image,
}

/// Emitted channels in R, G, B, A order, plus the ones skipped as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitResult {
    outputs: Vec<SplitOutput>,
    skipped: Vec<Channel>,
}

impl SplitResult {
    /// Emitted channels in order.
    pub fn outputs(&self) -> &[SplitOutput] {
        &self.outputs
    }

    /// Channels dropped because they were constant.
    pub fn skipped(&self) -> &[Channel] {
        &self.skipped
    }

    /// Image emitted for `channel`, if any.
    pub fn get(&self, channel: Channel) -> Option<&Image> {
        self.outputs
            .iter()
            .find(|o| o.channel == channel)
            .map(|o| &o.image)
    }

    /// Emitted channels in order.
    pub fn channels(&self) -> impl Iterator<Item = Channel> + '_ {
        self.outputs.iter().map(|o| o.channel)
    }

    /// Number of emitted channels.
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Returns `true` if nothing was emitted.
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

impl IntoIterator for SplitResult {
    type Item = SplitOutput;
    type IntoIter = std::vec::IntoIter<SplitOutput>;

    fn into_iter(self) -> Self::IntoIter {
        self.outputs.into_iter()
    }
}

/// Loads the source and checks it is non-empty and square.
pub(crate) fn load_source(ctx: &EngineContext<'_>, spec: &SplitSpec) -> Result<Image, SplitError> {
    spec.source.prefetch(ctx.loader);
    let image = spec.source.resolve(ctx.loader).map_err(|e| {
        ctx.notifier.notify(Notice::LoadFailed {
            handle: e.handle().clone(),
            slot: None,
            reason: e.to_string(),
        });
        SplitError::from(e)
    })?;

    let (width, height) = image.dimensions();
    if image.is_empty() {
        ctx.notifier.notify(Notice::DimensionMismatch {
            width,
            height,
            expected: "a non-empty image".into(),
        });
        return Err(SplitError::Empty { width, height });
    }
    if !image.is_square() {
        ctx.notifier.notify(Notice::DimensionMismatch {
            width,
            height,
            expected: "a square image".into(),
        });
        return Err(SplitError::NonSquare { width, height });
    }
    Ok(image)
}

/// Image holding `values` in `channel` and zero everywhere else.
pub(crate) fn channel_image(channel: Channel, values: &[u8], source: &Image) -> Image {
    let width = source.width() as usize;
    Image::from_fn(source.width(), source.height(), |x, y| {
        channel.isolate(values[y as usize * width + x as usize])
    })
    .with_settings(TextureSettings::split_channel(source.settings()))
}

/// Builds the result from per-channel planes and their triviality flags.
pub(crate) fn assemble(
    ctx: &EngineContext<'_>,
    spec: &SplitSpec,
    source: &Image,
    planes: &[Vec<u8>; 4],
    trivial: [bool; 4],
) -> SplitResult {
    let mut result = SplitResult::default();
    for channel in Channel::ALL {
        let i = channel.index();
        if spec.discard_empty_channels && trivial[i] {
            ctx.notifier.notify(Notice::ChannelSkipped { channel });
            result.skipped.push(channel);
            continue;
        }
        debug!("emitting {} channel", channel);
        result.outputs.push(SplitOutput {
            channel,
            image: channel_image(channel, &planes[i], source),
        });
    }
    result
}
