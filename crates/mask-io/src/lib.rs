//! # mask-io
//!
//! Image loading and asset persistence for mask texture packing.
//!
//! The processing engine in `mask-ops` never touches files directly. It asks
//! an [`ImageLoader`] for fully decoded pixels and hands finished images to
//! an [`AssetStore`]. This crate provides both seams plus the stock
//! implementations:
//!
//! - [`FileLoader`] - Synchronous PNG decode from disk
//! - [`MemoryLoader`] - Already-decoded images keyed by handle
//! - [`StreamingLoader`] - Background decode with a blocking `load`
//! - [`FileStore`] / [`MemoryStore`] - Persistence with an asset index
//! - [`naming`] - Destination paths built from prefix/name/suffix/folder
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use mask_io::{FileLoader, ImageHandle, ImageLoader};
//!
//! let loader = FileLoader::new("textures");
//! let image = loader.load(&ImageHandle::new("T_Rock_AO.png"))?;
//! println!("{}x{}", image.width(), image.height());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod detect;
mod error;
mod handle;
pub mod loader;
pub mod naming;
pub mod png;
pub mod store;
pub mod streaming;

pub use detect::Format;
pub use error::{IoError, IoResult, LoadError, LoadResult};
pub use handle::ImageHandle;
pub use loader::{FileLoader, ImageLoader, MemoryLoader};
pub use naming::{AssetPath, MaskNaming};
pub use store::{AssetIndex, AssetStore, FileStore, MemoryStore};
pub use streaming::StreamingLoader;
