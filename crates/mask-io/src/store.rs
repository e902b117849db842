//! Asset persistence.
//!
//! An [`AssetStore`] takes a finished image and a requested [`AssetPath`],
//! picks a free name (appending `_1`, `_2`, ... on collision), saves the
//! image and registers it in an [`AssetIndex`].
//!
//! [`FileStore`] writes `<root>/<folder>/<name>.png` plus a
//! `<name>.meta.yaml` sidecar with the image's [`TextureSettings`], which
//! [`FileLoader`](crate::FileLoader) reads back on load.

use crate::{AssetPath, IoError, IoResult};
use mask_core::{Image, TextureSettings};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Extension of the texture settings sidecar written next to each image.
pub const SIDECAR_EXTENSION: &str = "meta.yaml";

/// Upper bound on `_N` suffixes tried before giving up.
const MAX_UNIQUE_ATTEMPTS: u32 = 10_000;

/// Record of one persisted asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    /// Image dimensions.
    pub width: u32,
    /// Image dimensions.
    pub height: u32,
    /// Settings saved with the image.
    pub settings: TextureSettings,
}

/// Registry of assets created through a store, keyed by asset path.
#[derive(Debug, Clone, Default)]
pub struct AssetIndex {
    entries: BTreeMap<String, AssetEntry>,
}

impl AssetIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `image` under `path`.
    pub fn register(&mut self, path: &AssetPath, image: &Image) {
        self.entries.insert(
            path.to_string(),
            AssetEntry {
                width: image.width(),
                height: image.height(),
                settings: image.settings().clone(),
            },
        );
    }

    /// Returns `true` if `path` is registered.
    pub fn contains(&self, path: &AssetPath) -> bool {
        self.entries.contains_key(&path.to_string())
    }

    /// Looks up a registered asset.
    pub fn get(&self, path: &AssetPath) -> Option<&AssetEntry> {
        self.entries.get(&path.to_string())
    }

    /// Registered asset paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of registered assets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Destination for finished images.
pub trait AssetStore {
    /// Saves `image` at `path` or, if taken, at the first free `path_N`.
    ///
    /// Returns the path actually used.
    fn persist(&mut self, image: &Image, path: &AssetPath) -> IoResult<AssetPath>;

    /// Assets persisted so far.
    fn index(&self) -> &AssetIndex;
}

impl<S: AssetStore + ?Sized> AssetStore for &mut S {
    fn persist(&mut self, image: &Image, path: &AssetPath) -> IoResult<AssetPath> {
        (**self).persist(image, path)
    }

    fn index(&self) -> &AssetIndex {
        (**self).index()
    }
}

/// Finds the first candidate name for which `taken` returns false.
fn unique_path(path: &AssetPath, mut taken: impl FnMut(&AssetPath) -> bool) -> IoResult<AssetPath> {
    if !taken(path) {
        return Ok(path.clone());
    }
    for n in 1..=MAX_UNIQUE_ATTEMPTS {
        let candidate = path.with_name(&format!("{}_{}", path.name(), n));
        if !taken(&candidate) {
            return Ok(candidate);
        }
    }
    Err(IoError::InvalidPath(format!(
        "no free name for {} after {} attempts",
        path, MAX_UNIQUE_ATTEMPTS
    )))
}

/// Writes PNG files and settings sidecars under a root directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    index: AssetIndex,
}

impl FileStore {
    /// Creates a store rooted at `root`. Directories are created on demand.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            index: AssetIndex::new(),
        }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Image file location for an asset path.
    pub fn image_path(&self, path: &AssetPath) -> PathBuf {
        self.root.join(path.to_path()).with_extension("png")
    }

    /// Sidecar file location for an asset path.
    pub fn sidecar_path(&self, path: &AssetPath) -> PathBuf {
        self.root.join(path.to_path()).with_extension(SIDECAR_EXTENSION)
    }
}

impl AssetStore for FileStore {
    fn persist(&mut self, image: &Image, path: &AssetPath) -> IoResult<AssetPath> {
        if path.name().is_empty() {
            return Err(IoError::InvalidPath("empty asset name".into()));
        }
        let index = &self.index;
        let root = &self.root;
        let unique = unique_path(path, |p| {
            index.contains(p) || root.join(p.to_path()).with_extension("png").exists()
        })?;
        if unique != *path {
            debug!("{} is taken, using {}", path, unique);
        }

        let file = self.image_path(&unique);
        if let Some(dir) = file.parent() {
            std::fs::create_dir_all(dir)?;
        }
        crate::png::write(&file, image)?;
        std::fs::write(
            self.sidecar_path(&unique),
            serde_yaml::to_string(image.settings())?,
        )?;

        self.index.register(&unique, image);
        info!(
            "saved {} ({}x{}) to {}",
            unique,
            image.width(),
            image.height(),
            file.display()
        );
        Ok(unique)
    }

    fn index(&self) -> &AssetIndex {
        &self.index
    }
}

/// Keeps persisted images in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    images: HashMap<AssetPath, Image>,
    index: AssetIndex,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a persisted image.
    pub fn get(&self, path: &AssetPath) -> Option<&Image> {
        self.images.get(path)
    }

    /// Number of persisted images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Returns `true` if nothing has been persisted.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl AssetStore for MemoryStore {
    fn persist(&mut self, image: &Image, path: &AssetPath) -> IoResult<AssetPath> {
        if path.name().is_empty() {
            return Err(IoError::InvalidPath("empty asset name".into()));
        }
        let unique = unique_path(path, |p| self.images.contains_key(p))?;
        self.images.insert(unique.clone(), image.clone());
        self.index.register(&unique, image);
        debug!("stored {} in memory", unique);
        Ok(unique)
    }

    fn index(&self) -> &AssetIndex {
        &self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_unique_names() {
        let mut store = MemoryStore::new();
        let img = Image::filled(2, 2, [1, 2, 3, 4]);
        let path = AssetPath::new("out", "T_Mask");

        let a = store.persist(&img, &path).unwrap();
        let b = store.persist(&img, &path).unwrap();
        let c = store.persist(&img, &path).unwrap();

        assert_eq!(a.name(), "T_Mask");
        assert_eq!(b.name(), "T_Mask_1");
        assert_eq!(c.name(), "T_Mask_2");
        assert_eq!(store.len(), 3);
        assert_eq!(store.index().len(), 3);
        assert!(store.get(&b).unwrap().shares_buffer(&img));
    }

    #[test]
    fn test_index_records_settings() {
        let mut store = MemoryStore::new();
        let img = Image::filled(4, 2, [0; 4]).with_settings(TextureSettings::packed_mask());
        let path = store.persist(&img, &AssetPath::new("", "M")).unwrap();

        let entry = store.index().get(&path).unwrap();
        assert_eq!((entry.width, entry.height), (4, 2));
        assert!(!entry.settings.srgb);
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut store = MemoryStore::new();
        let err = store
            .persist(&Image::new(1, 1), &AssetPath::new("out", ""))
            .unwrap_err();
        assert!(matches!(err, IoError::InvalidPath(_)));
    }

    #[test]
    fn test_file_store_paths() {
        let store = FileStore::new("/content");
        let p = AssetPath::new("GeneratedMasks", "T_A");
        assert_eq!(
            store.image_path(&p),
            PathBuf::from("/content/GeneratedMasks/T_A.png")
        );
        assert_eq!(
            store.sidecar_path(&p),
            PathBuf::from("/content/GeneratedMasks/T_A.meta.yaml")
        );
    }
}
