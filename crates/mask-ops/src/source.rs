//! Where an operation's input pixels come from.

use mask_core::Image;
use mask_io::{ImageHandle, ImageLoader, LoadResult};

/// An image that is either already decoded or still behind a handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Decoded pixels supplied by the caller.
    Image(Image),
    /// Resolved through the operation's [`ImageLoader`].
    Handle(ImageHandle),
}

impl ImageSource {
    /// Handle, when the source must be loaded.
    pub fn handle(&self) -> Option<&ImageHandle> {
        match self {
            ImageSource::Handle(h) => Some(h),
            ImageSource::Image(_) => None,
        }
    }

    /// Asks the loader to start decoding ahead of [`resolve`](Self::resolve).
    pub fn prefetch(&self, loader: &dyn ImageLoader) {
        if let ImageSource::Handle(h) = self {
            loader.request_residency(h);
        }
    }

    /// Returns fully decoded pixels.
    pub fn resolve(&self, loader: &dyn ImageLoader) -> LoadResult<Image> {
        match self {
            ImageSource::Image(image) => Ok(image.clone()),
            ImageSource::Handle(h) => loader.load(h),
        }
    }
}

impl From<Image> for ImageSource {
    fn from(image: Image) -> Self {
        ImageSource::Image(image)
    }
}

impl From<ImageHandle> for ImageSource {
    fn from(handle: ImageHandle) -> Self {
        ImageSource::Handle(handle)
    }
}
