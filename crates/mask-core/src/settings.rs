//! Texture import/cook settings carried alongside pixel data.
//!
//! These fields never influence pixel math. They exist so that an image
//! produced by an operation can be persisted with the same cooking
//! behaviour as its source (see [`TextureSettings::inherit_cook_settings`]).

use serde::{Deserialize, Serialize};

/// How the host should compress a persisted texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompressionIntent {
    /// Regular color texture.
    #[default]
    Default,
    /// Packed mask: linear, every channel independent, alpha meaningful.
    Masks,
    /// Single grayscale signal.
    Grayscale,
}

/// Mip chain generation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MipGen {
    /// Follow the texture group's policy.
    #[default]
    FromTextureGroup,
    /// Single mip level only.
    NoMipmaps,
}

/// Platform tiling policy used when cooking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CookTiling {
    /// Follow the texture group's policy.
    #[default]
    FromTextureGroup,
    /// Force tiled layout.
    Tiled,
    /// Force linear layout.
    Untiled,
}

/// Metadata passthrough for an [`Image`](crate::Image).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureSettings {
    /// Compression intent.
    pub compression: CompressionIntent,
    /// Mip generation policy.
    pub mip_gen: MipGen,
    /// Whether pixel values are sRGB-encoded.
    pub srgb: bool,
    /// Mip bias applied at load time.
    pub lod_bias: i32,
    /// Maximum cooked size in pixels, 0 for unlimited.
    pub max_texture_size: u32,
    /// Keep border pixels when generating mips.
    pub preserve_border: bool,
    /// Disable texture streaming.
    pub never_stream: bool,
    /// Platform tiling policy.
    pub cook_platform_tiling: CookTiling,
    /// Ask the encoder to preserve 0 and 255 exactly.
    pub oodle_preserve_extremes: bool,
}

impl Default for TextureSettings {
    fn default() -> Self {
        Self {
            compression: CompressionIntent::Default,
            mip_gen: MipGen::FromTextureGroup,
            srgb: true,
            lod_bias: 0,
            max_texture_size: 0,
            preserve_border: false,
            never_stream: false,
            cook_platform_tiling: CookTiling::FromTextureGroup,
            oodle_preserve_extremes: false,
        }
    }
}

impl TextureSettings {
    /// Settings for a packed mask texture: linear, no mips.
    pub fn packed_mask() -> Self {
        Self {
            compression: CompressionIntent::Masks,
            mip_gen: MipGen::NoMipmaps,
            srgb: false,
            ..Self::default()
        }
    }

    /// Settings for one channel split out of `source`.
    ///
    /// Compression becomes grayscale and sRGB is turned off; the cook fields
    /// are copied verbatim from the source.
    pub fn split_channel(source: &TextureSettings) -> Self {
        Self {
            compression: CompressionIntent::Grayscale,
            srgb: false,
            ..Self::default()
        }
        .inherit_cook_settings(source)
    }

    /// Copies mip/streaming/cook fields from `source` onto `self`.
    pub fn inherit_cook_settings(mut self, source: &TextureSettings) -> Self {
        self.mip_gen = source.mip_gen;
        self.lod_bias = source.lod_bias;
        self.max_texture_size = source.max_texture_size;
        self.preserve_border = source.preserve_border;
        self.never_stream = source.never_stream;
        self.cook_platform_tiling = source.cook_platform_tiling;
        self.oodle_preserve_extremes = source.oodle_preserve_extremes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_mask_is_linear() {
        let s = TextureSettings::packed_mask();
        assert_eq!(s.compression, CompressionIntent::Masks);
        assert_eq!(s.mip_gen, MipGen::NoMipmaps);
        assert!(!s.srgb);
    }

    #[test]
    fn test_split_channel_copies_cook_fields() {
        let source = TextureSettings {
            compression: CompressionIntent::Default,
            mip_gen: MipGen::NoMipmaps,
            srgb: true,
            lod_bias: 2,
            max_texture_size: 1024,
            preserve_border: true,
            never_stream: true,
            cook_platform_tiling: CookTiling::Untiled,
            oodle_preserve_extremes: true,
        };
        let split = TextureSettings::split_channel(&source);

        assert_eq!(split.compression, CompressionIntent::Grayscale);
        assert!(!split.srgb);
        assert_eq!(split.mip_gen, MipGen::NoMipmaps);
        assert_eq!(split.lod_bias, 2);
        assert_eq!(split.max_texture_size, 1024);
        assert!(split.preserve_border);
        assert!(split.never_stream);
        assert_eq!(split.cook_platform_tiling, CookTiling::Untiled);
        assert!(split.oodle_preserve_extremes);
    }
}
