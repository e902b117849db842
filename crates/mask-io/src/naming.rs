//! Destination naming for persisted masks.
//!
//! Packed masks are named `<prefix>_<name>_<suffix>` inside an export folder.
//! Split channels are named after their source plus a fixed per-channel
//! suffix (`_R`, `_G`, `_B`, `_A`) and land next to the source.
//!
//! ```rust
//! use mask_io::{MaskNaming, ImageHandle, AssetPath};
//! use mask_core::Channel;
//!
//! let path = MaskNaming::default().asset_path();
//! assert_eq!(path.to_string(), "GeneratedMasks/T_GeneratedMask_Mask");
//!
//! let split = AssetPath::for_split_channel(&ImageHandle::new("rock/T_Rock_ORM.png"), Channel::Green);
//! assert_eq!(split.to_string(), "rock/T_Rock_ORM_G");
//! ```

use crate::ImageHandle;
use mask_core::Channel;
use std::fmt;
use std::path::{Path, PathBuf};

/// Name used when the configured mask name is blank.
pub const FALLBACK_MASK_NAME: &str = "GeneratedMask";

/// Suffix appended to a split channel's asset name.
pub const fn channel_suffix(channel: Channel) -> &'static str {
    match channel {
        Channel::Red => "_R",
        Channel::Green => "_G",
        Channel::Blue => "_B",
        Channel::Alpha => "_A",
    }
}

/// Folder-relative asset destination, without file extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetPath {
    folder: PathBuf,
    name: String,
}

impl AssetPath {
    /// Creates a destination from folder and asset name.
    ///
    /// Characters outside `[A-Za-z0-9_-]` in `name` are replaced by `_`.
    pub fn new(folder: impl Into<PathBuf>, name: &str) -> Self {
        Self {
            folder: folder.into(),
            name: sanitize(name),
        }
    }

    /// Destination for one channel split out of `source`.
    pub fn for_split_channel(source: &ImageHandle, channel: Channel) -> Self {
        let name = format!("{}{}", source.asset_name(), channel_suffix(channel));
        Self::new(source.folder(), &name)
    }

    /// Folder part.
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Asset name part.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Same folder, different name.
    pub fn with_name(&self, name: &str) -> Self {
        Self::new(self.folder.clone(), name)
    }

    /// Folder joined with name.
    pub fn to_path(&self) -> PathBuf {
        self.folder.join(&self.name)
    }
}

impl fmt::Display for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.folder.as_os_str().is_empty() {
            f.write_str(&self.name)
        } else {
            // Forward slashes on every platform: these are asset paths, not OS paths.
            let folder = self.folder.to_string_lossy().replace('\\', "/");
            write!(f, "{}/{}", folder.trim_end_matches('/'), self.name)
        }
    }
}

/// Naming fields for a packed mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskNaming {
    /// Leading name part, e.g. `T`.
    pub prefix: String,
    /// Main name part.
    pub name: String,
    /// Trailing name part, e.g. `Mask`.
    pub suffix: String,
    /// Whether to include the prefix.
    pub add_prefix: bool,
    /// Whether to include the suffix.
    pub add_suffix: bool,
    /// Export folder relative to the store root.
    pub folder: PathBuf,
}

impl Default for MaskNaming {
    fn default() -> Self {
        Self {
            prefix: "T".into(),
            name: FALLBACK_MASK_NAME.into(),
            suffix: "Mask".into(),
            add_prefix: true,
            add_suffix: true,
            folder: PathBuf::from("GeneratedMasks"),
        }
    }
}

impl MaskNaming {
    /// Asset name: enabled, non-blank parts joined by `_`.
    pub fn asset_name(&self) -> String {
        let name = self.name.trim();
        let name = if name.is_empty() { FALLBACK_MASK_NAME } else { name };

        let mut parts = Vec::with_capacity(3);
        if self.add_prefix && !self.prefix.trim().is_empty() {
            parts.push(self.prefix.trim());
        }
        parts.push(name);
        if self.add_suffix && !self.suffix.trim().is_empty() {
            parts.push(self.suffix.trim());
        }
        parts.join("_")
    }

    /// Full destination.
    pub fn asset_path(&self) -> AssetPath {
        AssetPath::new(self.folder.clone(), &self.asset_name())
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_naming() {
        assert_eq!(MaskNaming::default().asset_name(), "T_GeneratedMask_Mask");
    }

    #[test]
    fn test_disabled_and_blank_parts_are_skipped() {
        let naming = MaskNaming {
            prefix: "  ".into(),
            name: "".into(),
            suffix: "ORM".into(),
            add_prefix: true,
            add_suffix: false,
            folder: PathBuf::new(),
        };
        assert_eq!(naming.asset_name(), "GeneratedMask");
        assert_eq!(naming.asset_path().to_string(), "GeneratedMask");
    }

    #[test]
    fn test_sanitize() {
        let p = AssetPath::new("out", "rock mask.v2");
        assert_eq!(p.name(), "rock_mask_v2");
    }

    #[test]
    fn test_split_suffixes() {
        let src = ImageHandle::new("T_Rock.png");
        let names: Vec<String> = Channel::ALL
            .iter()
            .map(|&c| AssetPath::for_split_channel(&src, c).name().to_string())
            .collect();
        assert_eq!(names, ["T_Rock_R", "T_Rock_G", "T_Rock_B", "T_Rock_A"]);
    }
}
