//! Opaque image handles.

use std::fmt;
use std::path::{Path, PathBuf};

/// Identifies an image to an [`ImageLoader`](crate::ImageLoader).
///
/// A handle is a path-like asset reference. Loaders decide how to resolve it;
/// [`FileLoader`](crate::FileLoader) treats relative handles as relative to
/// its root directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageHandle(PathBuf);

impl ImageHandle {
    /// Creates a handle from any path-like value.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Returns the handle as a path.
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Asset name without folder or extension (`textures/T_Rock.png` -> `T_Rock`).
    pub fn asset_name(&self) -> String {
        self.0
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Folder part of the handle, empty for a bare name.
    pub fn folder(&self) -> &Path {
        self.0.parent().unwrap_or_else(|| Path::new(""))
    }
}

impl fmt::Display for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<&str> for ImageHandle {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ImageHandle {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for ImageHandle {
    fn from(p: PathBuf) -> Self {
        Self(p)
    }
}

impl From<&Path> for ImageHandle {
    fn from(p: &Path) -> Self {
        Self(p.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_name_and_folder() {
        let h = ImageHandle::new("textures/rock/T_Rock_AO.png");
        assert_eq!(h.asset_name(), "T_Rock_AO");
        assert_eq!(h.folder(), Path::new("textures/rock"));
        assert_eq!(ImageHandle::new("T_Bare").folder(), Path::new(""));
    }
}
