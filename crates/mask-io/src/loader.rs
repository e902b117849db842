//! Image loaders.
//!
//! An [`ImageLoader`] turns an [`ImageHandle`] into a fully decoded
//! [`Image`]. `load` never returns partially decoded data: if decoding is
//! still in flight, it blocks until it is done.
//!
//! # Loaders
//!
//! - [`FileLoader`] - decodes PNG files synchronously
//! - [`MemoryLoader`] - serves images the host already decoded
//! - [`StreamingLoader`](crate::StreamingLoader) - background decode, blocking `load`

use crate::store::SIDECAR_EXTENSION;
use crate::{Format, ImageHandle, IoError, LoadError, LoadResult};
use mask_core::{Image, TextureSettings};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Source of decoded pixel data.
pub trait ImageLoader {
    /// Returns the fully decoded image behind `handle`.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the handle does not resolve to a valid 2D
    /// image or decoding fails.
    fn load(&self, handle: &ImageHandle) -> LoadResult<Image>;

    /// Hints that `handle` will be loaded soon.
    ///
    /// Loaders that decode asynchronously start work here so a later
    /// [`load`](Self::load) has less to wait for. The default does nothing.
    fn request_residency(&self, _handle: &ImageHandle) {}

    /// Marks the end of one mix or split.
    ///
    /// Loaders that keep decoded images resident drop them here, together
    /// with prefetches nobody collected, so the next operation sees the
    /// current data. The default does nothing.
    fn end_operation(&self) {}
}

impl<L: ImageLoader + ?Sized> ImageLoader for &L {
    fn load(&self, handle: &ImageHandle) -> LoadResult<Image> {
        (**self).load(handle)
    }

    fn request_residency(&self, handle: &ImageHandle) {
        (**self).request_residency(handle)
    }

    fn end_operation(&self) {
        (**self).end_operation()
    }
}

impl<L: ImageLoader + ?Sized> ImageLoader for std::sync::Arc<L> {
    fn load(&self, handle: &ImageHandle) -> LoadResult<Image> {
        (**self).load(handle)
    }

    fn request_residency(&self, handle: &ImageHandle) {
        (**self).request_residency(handle)
    }

    fn end_operation(&self) {
        (**self).end_operation()
    }
}

/// Decodes image files from disk.
///
/// Relative handles resolve against `root`. When a `<name>.meta.yaml`
/// sidecar written by [`FileStore`](crate::FileStore) sits next to the image,
/// its texture settings are attached to the decoded image.
#[derive(Debug, Clone)]
pub struct FileLoader {
    root: PathBuf,
}

impl Default for FileLoader {
    fn default() -> Self {
        Self::new(".")
    }
}

impl FileLoader {
    /// Creates a loader resolving relative handles against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory for relative handles.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a handle to a filesystem path.
    pub fn resolve(&self, handle: &ImageHandle) -> PathBuf {
        let path = handle.as_path();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn read_sidecar(path: &Path) -> Option<TextureSettings> {
        let sidecar = path.with_extension(SIDECAR_EXTENSION);
        let text = std::fs::read_to_string(&sidecar).ok()?;
        match serde_yaml::from_str(&text) {
            Ok(settings) => Some(settings),
            Err(e) => {
                warn!("ignoring unreadable sidecar {}: {}", sidecar.display(), e);
                None
            }
        }
    }
}

impl ImageLoader for FileLoader {
    fn load(&self, handle: &ImageHandle) -> LoadResult<Image> {
        let path = self.resolve(handle);
        trace!("loading {} from {}", handle, path.display());

        let bytes = std::fs::read(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                LoadError::NotFound {
                    handle: handle.clone(),
                }
            } else {
                LoadError::Io {
                    handle: handle.clone(),
                    source,
                }
            }
        })?;

        let format = Format::detect(&path, &bytes);
        if format != Format::Png {
            return Err(LoadError::UnsupportedFormat {
                handle: handle.clone(),
                format: format.to_string(),
            });
        }

        let image = crate::png::decode(&bytes).map_err(|e| match e {
            IoError::DecodeError(reason) => LoadError::Decode {
                handle: handle.clone(),
                reason,
            },
            other => LoadError::Decode {
                handle: handle.clone(),
                reason: other.to_string(),
            },
        })?;

        if image.is_empty() {
            return Err(LoadError::InvalidImage {
                handle: handle.clone(),
                reason: format!("zero-sized image {}x{}", image.width(), image.height()),
            });
        }

        debug!("loaded {} ({}x{})", handle, image.width(), image.height());
        Ok(match Self::read_sidecar(&path) {
            Some(settings) => image.with_settings(settings),
            None => image,
        })
    }
}

/// Serves already-decoded images.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    images: HashMap<ImageHandle, Image>,
}

impl MemoryLoader {
    /// Creates an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `image` under `handle`, replacing any previous entry.
    pub fn insert(&mut self, handle: impl Into<ImageHandle>, image: Image) {
        self.images.insert(handle.into(), image);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, handle: impl Into<ImageHandle>, image: Image) -> Self {
        self.insert(handle, image);
        self
    }

    /// Number of registered images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Returns `true` if no images are registered.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl ImageLoader for MemoryLoader {
    fn load(&self, handle: &ImageHandle) -> LoadResult<Image> {
        self.images
            .get(handle)
            .cloned()
            .ok_or_else(|| LoadError::NotFound {
                handle: handle.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_loader() {
        let loader = MemoryLoader::new().with("red", Image::filled(2, 2, [255, 0, 0, 255]));
        assert_eq!(loader.len(), 1);

        let img = loader.load(&ImageHandle::new("red")).unwrap();
        assert_eq!(img.pixels()[0], [255, 0, 0, 255]);

        let err = loader.load(&ImageHandle::new("blue")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
        assert_eq!(err.handle(), &ImageHandle::new("blue"));
    }

    #[test]
    fn test_file_loader_resolve() {
        let loader = FileLoader::new("/content");
        assert_eq!(
            loader.resolve(&ImageHandle::new("a/b.png")),
            PathBuf::from("/content/a/b.png")
        );
        assert_eq!(
            loader.resolve(&ImageHandle::new("/abs/c.png")),
            PathBuf::from("/abs/c.png")
        );
    }

    #[test]
    fn test_file_loader_missing_file() {
        let loader = FileLoader::new(std::env::temp_dir());
        let err = loader
            .load(&ImageHandle::new("mask_io_definitely_missing.png"))
            .unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }
}
