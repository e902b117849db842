//! Tool configuration.
//!
//! Loaded from YAML, never read ambiently: callers pass it to
//! [`MixSpec::from_config`](crate::MixSpec::from_config),
//! [`SplitSpec::from_config`](crate::SplitSpec::from_config) and
//! [`MaskTools::from_config`](crate::MaskTools::from_config).
//!
//! # Example
//!
//! ```rust
//! use mask_ops::{MaskToolsConfig, ResizeFilter};
//!
//! let config = MaskToolsConfig::from_yaml_str("mixer:\n  resolution: 1024\n").unwrap();
//! assert_eq!(config.mixer.resolution, 1024);
//! assert_eq!(config.default_filter, ResizeFilter::AdaptiveSharp);
//! ```
//!
//! Missing keys take their defaults:
//!
//! ```yaml
//! default_filter: adaptive-sharp
//! mixer:
//!   creation_method: pixel-data
//!   resize_method: default
//!   edge_x: clamp
//!   edge_y: clamp
//!   resolution: 512
//!   prefix: T
//!   name: GeneratedMask
//!   suffix: Mask
//!   add_prefix: true
//!   add_suffix: true
//!   save_path: GeneratedMasks
//! splitter:
//!   creation_method: pixel-data
//!   discard_empty_channels: true
//! ```

use crate::backend::CreationMethod;
use crate::resize::{EdgeMode, FALLBACK_FILTER, ResizeFilter};
use crate::{ConfigError, ConfigResult};
use mask_io::MaskNaming;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Target resolutions offered for packed masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum MaskResolution {
    /// 32x32
    R32,
    /// 64x64
    R64,
    /// 128x128
    R128,
    /// 256x256
    R256,
    /// 512x512
    #[default]
    R512,
    /// 1024x1024
    R1024,
    /// 2048x2048
    R2048,
    /// 4096x4096
    R4096,
    /// 8192x8192
    R8192,
}

impl MaskResolution {
    /// All resolutions, smallest first.
    pub const ALL: [MaskResolution; 9] = [
        Self::R32,
        Self::R64,
        Self::R128,
        Self::R256,
        Self::R512,
        Self::R1024,
        Self::R2048,
        Self::R4096,
        Self::R8192,
    ];

    /// Side length in pixels.
    pub const fn pixels(self) -> u32 {
        32 << (self as u32)
    }
}

impl fmt::Display for MaskResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let px = self.pixels();
        write!(f, "{}x{}", px, px)
    }
}

impl TryFrom<u32> for MaskResolution {
    type Error = ConfigError;

    fn try_from(px: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|r| r.pixels() == px)
            .ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "unsupported resolution {}, expected a power of two from 32 to 8192",
                    px
                ))
            })
    }
}

/// Channel mixer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixerConfig {
    /// Backend used for mixing.
    pub creation_method: CreationMethod,
    /// Filter given to each slot unless the caller picks one.
    pub resize_method: ResizeFilter,
    /// Horizontal edge handling given to each slot.
    pub edge_x: EdgeMode,
    /// Vertical edge handling given to each slot.
    pub edge_y: EdgeMode,
    /// Output side length.
    pub resolution: u32,
    /// Name prefix.
    pub prefix: String,
    /// Main name.
    pub name: String,
    /// Name suffix.
    pub suffix: String,
    /// Include the prefix.
    pub add_prefix: bool,
    /// Include the suffix.
    pub add_suffix: bool,
    /// Export folder.
    pub save_path: PathBuf,
}

impl Default for MixerConfig {
    fn default() -> Self {
        let naming = MaskNaming::default();
        Self {
            creation_method: CreationMethod::PixelData,
            resize_method: ResizeFilter::Default,
            edge_x: EdgeMode::Clamp,
            edge_y: EdgeMode::Clamp,
            resolution: MaskResolution::default().pixels(),
            prefix: naming.prefix,
            name: naming.name,
            suffix: naming.suffix,
            add_prefix: naming.add_prefix,
            add_suffix: naming.add_suffix,
            save_path: naming.folder,
        }
    }
}

impl MixerConfig {
    /// Naming fields for exported masks.
    pub fn naming(&self) -> MaskNaming {
        MaskNaming {
            prefix: self.prefix.clone(),
            name: self.name.clone(),
            suffix: self.suffix.clone(),
            add_prefix: self.add_prefix,
            add_suffix: self.add_suffix,
            folder: self.save_path.clone(),
        }
    }
}

/// Channel splitter settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// Backend used for splitting.
    pub creation_method: CreationMethod,
    /// Drop channels holding only 0 and 255.
    pub discard_empty_channels: bool,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            creation_method: CreationMethod::PixelData,
            discard_empty_channels: true,
        }
    }
}

/// Complete tool configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskToolsConfig {
    /// Concrete filter `Default` resolves to.
    pub default_filter: ResizeFilter,
    /// Mixer settings.
    pub mixer: MixerConfig,
    /// Splitter settings.
    pub splitter: SplitterConfig,
}

impl Default for MaskToolsConfig {
    fn default() -> Self {
        Self {
            default_filter: FALLBACK_FILTER,
            mixer: MixerConfig::default(),
            splitter: SplitterConfig::default(),
        }
    }
}

impl MaskToolsConfig {
    /// Loads and validates a YAML config file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&content)?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parses and validates YAML.
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        // An empty document is a valid, all-defaults config.
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Serializes to YAML.
    pub fn to_yaml_string(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Checks values serde cannot.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.default_filter.is_concrete() {
            return Err(ConfigError::Invalid(
                "default_filter must name a concrete filter, not 'default'".into(),
            ));
        }
        MaskResolution::try_from(self.mixer.resolution)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolutions() {
        assert_eq!(MaskResolution::R32.pixels(), 32);
        assert_eq!(MaskResolution::R8192.pixels(), 8192);
        assert_eq!(MaskResolution::try_from(2048).unwrap(), MaskResolution::R2048);
        assert!(MaskResolution::try_from(500).is_err());
        assert_eq!(MaskResolution::default().to_string(), "512x512");
    }

    #[test]
    fn test_defaults() {
        let config = MaskToolsConfig::default();
        assert_eq!(config.mixer.resolution, 512);
        assert_eq!(config.mixer.resize_method, ResizeFilter::Default);
        assert!(config.splitter.discard_empty_channels);
        assert_eq!(config.mixer.naming().asset_name(), "T_GeneratedMask_Mask");
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_yaml() {
        let config = MaskToolsConfig::from_yaml_str(
            "default_filter: cubic-mitchell\nmixer:\n  creation_method: material\n  prefix: M\nsplitter:\n  discard_empty_channels: false\n",
        )
        .unwrap();
        assert_eq!(config.default_filter, ResizeFilter::CubicMitchell);
        assert_eq!(config.mixer.creation_method, CreationMethod::Material);
        assert_eq!(config.mixer.prefix, "M");
        assert_eq!(config.mixer.edge_x, EdgeMode::Clamp);
        assert_eq!(config.mixer.suffix, "Mask");
        assert!(!config.splitter.discard_empty_channels);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(MaskToolsConfig::from_yaml_str("").unwrap(), MaskToolsConfig::default());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut config = MaskToolsConfig::default();
        config.mixer.resolution = 4096;
        let yaml = config.to_yaml_string().unwrap();
        assert!(yaml.contains("adaptive-sharp"));
        assert_eq!(MaskToolsConfig::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn test_validation() {
        let err = MaskToolsConfig::from_yaml_str("default_filter: default\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = MaskToolsConfig::from_yaml_str("mixer:\n  resolution: 100\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = MaskToolsConfig::from_yaml_str("mixer:\n  creation_method: gpu\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = MaskToolsConfig::from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("masktools.yaml");
        std::fs::write(&path, "mixer:\n  resolution: 1024\n  edge_y: wrap\n  save_path: Masks/Rock\n").unwrap();

        let config = MaskToolsConfig::from_file(&path).unwrap();
        assert_eq!(config.mixer.resolution, 1024);
        assert_eq!(config.mixer.edge_y, EdgeMode::Wrap);
        assert_eq!(config.mixer.naming().asset_path().to_string(), "Masks/Rock/T_GeneratedMask_Mask");
    }
}
