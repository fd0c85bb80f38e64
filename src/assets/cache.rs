use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assets::decode;

/// Decoded raster source in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct SourceImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Bounded read-through cache of decoded source images, keyed by file path.
///
/// The key is the path only — crop/scale variants are derived downstream. A
/// miss decodes synchronously. Eviction is FIFO on the insertion order: the
/// oldest-inserted entry goes first, and a cache hit does not refresh an
/// entry's age. The cache is an explicitly owned object passed by handle into
/// rendering and export paths; it is never a process-wide global.
#[derive(Debug)]
pub struct ImageCache {
    capacity: usize,
    entries: HashMap<PathBuf, Arc<SourceImage>>,
    order: VecDeque<PathBuf>,
}

impl ImageCache {
    /// Default entry capacity.
    pub const DEFAULT_CAPACITY: usize = 500;

    /// New cache holding at most `capacity` decoded images.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// New cache with [`ImageCache::DEFAULT_CAPACITY`].
    pub fn with_default_capacity() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }

    /// Fetch a decoded image, loading it on a miss.
    ///
    /// Returns `None` when the path is unreadable or undecodable; the failure
    /// is logged and not cached, so a later retry can succeed.
    pub fn get(&mut self, path: &Path) -> Option<Arc<SourceImage>> {
        if let Some(hit) = self.entries.get(path) {
            return Some(hit.clone());
        }

        let decoded = match decode::load_image(path) {
            Ok(img) => Arc::new(img),
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "image load failed");
                return None;
            }
        };

        self.insert(path.to_path_buf(), decoded.clone());
        Some(decoded)
    }

    /// Decode several paths up front.
    pub fn preload<'a>(&mut self, paths: impl IntoIterator<Item = &'a Path>) {
        for path in paths {
            let _ = self.get(path);
        }
    }

    /// Whether `path` is currently cached.
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    /// Drop one cached entry.
    pub fn remove(&mut self, path: &Path) {
        if self.entries.remove(path).is_some() {
            self.order.retain(|p| p != path);
        }
    }

    /// Drop every cached entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of cached entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn insert(&mut self, path: PathBuf, image: Arc<SourceImage>) {
        while self.entries.len() >= self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }
        self.order.push_back(path.clone());
        self.entries.insert(path, image);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/cache.rs"]
mod tests;
