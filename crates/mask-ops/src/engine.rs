//! Operation entry points.
//!
//! [`MaskTools`] owns the loader, the notification sink and one backend per
//! operation, selected once from configuration. Every call produces freshly
//! owned results, and ends by telling the loader the operation is over, so
//! images decoded for one call are never served to the next.
//!
//! # Example
//!
//! ```rust,ignore
//! use mask_io::{FileLoader, FileStore, ImageHandle};
//! use mask_ops::{MaskTools, MaskToolsConfig, SplitSpec};
//!
//! let config = MaskToolsConfig::default();
//! let tools = MaskTools::from_config(FileLoader::new("content"), &config);
//! let mut store = FileStore::new("content");
//!
//! let source = ImageHandle::new("rock/T_Rock_ORM.png");
//! let spec = SplitSpec::from_config(source.clone(), &config);
//! let saved = tools.export_split(&spec, &source, &mut store)?;
//! ```

use crate::backend::{CreationMethod, MaskBackend};
use crate::notify::{Notice, Notifier, TracingNotifier};
use crate::{MaskToolsConfig, MixError, MixSpec, OpsResult, SplitError, SplitResult, SplitSpec};
use mask_core::{Channel, Image};
use mask_io::{AssetPath, AssetStore, ImageHandle, ImageLoader, MaskNaming};
use std::sync::Arc;
use tracing::info;

/// Collaborators a backend needs for one operation.
#[derive(Clone, Copy)]
pub struct EngineContext<'a> {
    /// Source of decoded pixels.
    pub loader: &'a dyn ImageLoader,
    /// Where user-facing messages go.
    pub notifier: &'a dyn Notifier,
}

impl<'a> EngineContext<'a> {
    /// Bundles a loader and a notifier.
    pub fn new(loader: &'a dyn ImageLoader, notifier: &'a dyn Notifier) -> Self {
        Self { loader, notifier }
    }
}

/// Mixer and splitter over one loader.
pub struct MaskTools<L> {
    loader: L,
    notifier: Arc<dyn Notifier>,
    mix_backend: Box<dyn MaskBackend>,
    split_backend: Box<dyn MaskBackend>,
}

impl<L: ImageLoader> MaskTools<L> {
    /// Pixel-copy backends, notices to `tracing`.
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            notifier: Arc::new(TracingNotifier),
            mix_backend: CreationMethod::PixelData.backend(),
            split_backend: CreationMethod::PixelData.backend(),
        }
    }

    /// Backends chosen by the mixer and splitter creation methods.
    pub fn from_config(loader: L, config: &MaskToolsConfig) -> Self {
        Self::new(loader)
            .with_mix_method(config.mixer.creation_method)
            .with_split_method(config.splitter.creation_method)
    }

    /// Replaces the notification sink.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Uses `method` for both operations.
    pub fn with_method(self, method: CreationMethod) -> Self {
        self.with_mix_method(method).with_split_method(method)
    }

    /// Uses `method` for mixing.
    pub fn with_mix_method(mut self, method: CreationMethod) -> Self {
        self.mix_backend = method.backend();
        self
    }

    /// Uses `method` for splitting.
    pub fn with_split_method(mut self, method: CreationMethod) -> Self {
        self.split_backend = method.backend();
        self
    }

    /// The loader.
    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Methods in use for mixing and splitting.
    pub fn methods(&self) -> (CreationMethod, CreationMethod) {
        (self.mix_backend.method(), self.split_backend.method())
    }

    fn context(&self) -> EngineContext<'_> {
        EngineContext::new(&self.loader, self.notifier.as_ref())
    }

    /// Packs four slots into one image.
    ///
    /// # Errors
    ///
    /// [`MixError`] naming the first slot that failed to load or resample.
    pub fn mix(&self, spec: &MixSpec) -> Result<Image, MixError> {
        let result = self.mix_backend.mix(&self.context(), spec);
        self.loader.end_operation();
        result
    }

    /// Splits one image into channel images.
    ///
    /// # Errors
    ///
    /// [`SplitError`] for load failures, empty or non-square sources.
    pub fn split(&self, spec: &SplitSpec) -> Result<SplitResult, SplitError> {
        let result = self.split_backend.split(&self.context(), spec);
        self.loader.end_operation();
        result
    }

    /// Mixes and persists the result under the name built by `naming`.
    ///
    /// Returns the asset path actually used.
    pub fn export_mix(
        &self,
        spec: &MixSpec,
        naming: &MaskNaming,
        store: &mut dyn AssetStore,
    ) -> OpsResult<AssetPath> {
        let packed = self.mix(spec)?;
        let saved = store.persist(&packed, &naming.asset_path())?;
        self.notifier.notify(Notice::Exported {
            path: saved.to_string(),
        });
        Ok(saved)
    }

    /// Splits and persists every emitted channel next to `base` with a
    /// `_R`, `_G`, `_B` or `_A` suffix.
    pub fn export_split(
        &self,
        spec: &SplitSpec,
        base: &ImageHandle,
        store: &mut dyn AssetStore,
    ) -> OpsResult<Vec<(Channel, AssetPath)>> {
        let result = self.split(spec)?;
        let mut saved = Vec::with_capacity(result.len());
        for output in result {
            let path = store.persist(&output.image, &AssetPath::for_split_channel(base, output.channel))?;
            self.notifier.notify(Notice::Exported {
                path: path.to_string(),
            });
            saved.push((output.channel, path));
        }
        info!("split {} into {} textures", base, saved.len());
        Ok(saved)
    }
}
