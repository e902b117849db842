//! Background decoding with a blocking read.
//!
//! [`StreamingLoader`] wraps another loader. [`request_residency`] starts
//! decoding a handle on a worker thread; [`load`] then waits for that
//! worker to finish instead of decoding again. Finished images stay
//! resident until [`end_operation`], so reading the same handle twice
//! within one operation always returns the same pixels, and the next
//! operation decodes again.
//!
//! There is no timeout or cancellation: `load` blocks until the decode
//! finishes or fails. Prefetches still running at `end_operation` are
//! detached and their results discarded.
//!
//! [`request_residency`]: crate::ImageLoader::request_residency
//! [`load`]: crate::ImageLoader::load
//! [`end_operation`]: crate::ImageLoader::end_operation
//!
//! # Example
//!
//! ```rust,ignore
//! use mask_io::{FileLoader, ImageHandle, ImageLoader, StreamingLoader};
//!
//! let loader = StreamingLoader::new(FileLoader::new("textures"));
//! let handles = [ImageHandle::new("ao.png"), ImageHandle::new("rough.png")];
//! for h in &handles {
//!     loader.request_residency(h); // decodes in parallel
//! }
//! let ao = loader.load(&handles[0])?; // blocks until ready
//! ```

use crate::{ImageHandle, ImageLoader, LoadError, LoadResult};
use mask_core::Image;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use tracing::{debug, trace};

type DecodeJob = JoinHandle<LoadResult<Image>>;

/// Loader that decodes ahead of time on worker threads.
pub struct StreamingLoader<L> {
    inner: Arc<L>,
    pending: Mutex<HashMap<ImageHandle, DecodeJob>>,
    resident: Mutex<HashMap<ImageHandle, Image>>,
}

impl<L> StreamingLoader<L>
where
    L: ImageLoader + Send + Sync + 'static,
{
    /// Wraps `inner`.
    pub fn new(inner: L) -> Self {
        Self {
            inner: Arc::new(inner),
            pending: Mutex::new(HashMap::new()),
            resident: Mutex::new(HashMap::new()),
        }
    }

    /// Returns `true` if `handle` has finished decoding and is cached.
    pub fn is_resident(&self, handle: &ImageHandle) -> bool {
        lock(&self.resident).contains_key(handle)
    }

    /// Returns `true` if a background decode for `handle` has been started
    /// and not yet collected.
    pub fn is_pending(&self, handle: &ImageHandle) -> bool {
        lock(&self.pending).contains_key(handle)
    }

}

impl<L> ImageLoader for StreamingLoader<L>
where
    L: ImageLoader + Send + Sync + 'static,
{
    fn load(&self, handle: &ImageHandle) -> LoadResult<Image> {
        if let Some(image) = lock(&self.resident).get(handle) {
            trace!("{} already resident", handle);
            return Ok(image.clone());
        }

        let job = lock(&self.pending).remove(handle);
        let image = match job {
            Some(job) => {
                debug!("waiting for background decode of {}", handle);
                job.join().map_err(|_| LoadError::Interrupted {
                    handle: handle.clone(),
                })??
            }
            None => self.inner.load(handle)?,
        };

        lock(&self.resident).insert(handle.clone(), image.clone());
        Ok(image)
    }

    fn request_residency(&self, handle: &ImageHandle) {
        if self.is_resident(handle) {
            return;
        }
        let mut pending = lock(&self.pending);
        if pending.contains_key(handle) {
            return;
        }

        let inner = Arc::clone(&self.inner);
        let job_handle = handle.clone();
        trace!("starting background decode of {}", handle);
        let job = thread::spawn(move || inner.load(&job_handle));
        pending.insert(handle.clone(), job);
    }

    fn end_operation(&self) {
        let dropped = lock(&self.pending).drain().count();
        let evicted = {
            let mut resident = lock(&self.resident);
            let n = resident.len();
            resident.clear();
            n
        };
        if dropped > 0 || evicted > 0 {
            debug!("released {} resident image(s), {} uncollected decode(s)", evicted, dropped);
        }
    }
}

/// Locks a mutex, recovering the data if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
