//! LRU cache of decoded observation images, keyed by source path.
//!
//! The coherent-index builder and the panorama tiler both re-visit the same
//! source observation many times (once per leaf, once per tile); decoding
//! PNG/JPEG on every visit would dominate runtime, so both go through one
//! shared cache instead.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::{Image, Result};

struct Inner {
    capacity: usize,
    order: VecDeque<PathBuf>,
    entries: std::collections::HashMap<PathBuf, Arc<Image>>,
}

/// A bounded, path-keyed LRU cache of decoded [`Image`]s.
///
/// Cheap to clone: internally `Arc<Mutex<..>>`, so every clone shares the
/// same backing cache.
#[derive(Clone)]
pub struct ImageCache {
    inner: Arc<Mutex<Inner>>,
}

impl ImageCache {
    /// Creates an empty cache holding at most `capacity` images.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                capacity: capacity.max(1),
                order: VecDeque::new(),
                entries: std::collections::HashMap::new(),
            })),
        }
    }

    /// Returns the cached image for `path`, decoding and inserting it via
    /// [`Image::read`] on a miss.
    pub fn get_or_load(&self, path: impl AsRef<Path>) -> Result<Arc<Image>> {
        let path = path.as_ref();
        {
            let mut inner = self.inner.lock();
            if let Some(img) = inner.entries.get(path).cloned() {
                inner.order.retain(|p| p != path);
                inner.order.push_back(path.to_path_buf());
                return Ok(img);
            }
        }
        let img = Arc::new(Image::read(path)?);
        let mut inner = self.inner.lock();
        inner.order.push_back(path.to_path_buf());
        inner.entries.insert(path.to_path_buf(), img.clone());
        while inner.order.len() > inner.capacity {
            if let Some(evict) = inner.order.pop_front() {
                inner.entries.remove(&evict);
            }
        }
        Ok(img)
    }

    /// Number of images currently resident.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// `true` if the cache holds nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_test_png(path: &Path) {
        let img = image::RgbaImage::new(2, 2);
        img.save(path).unwrap();
    }

    #[test]
    fn test_cache_evicts_oldest() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = Vec::new();
        for i in 0..3 {
            let p = dir.path().join(format!("{i}.png"));
            write_test_png(&p);
            paths.push(p);
        }
        let cache = ImageCache::new(2);
        for p in &paths {
            cache.get_or_load(p).unwrap();
        }
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_cache_hit_returns_same_arc() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        write_test_png(&path);
        let cache = ImageCache::new(4);
        let a = cache.get_or_load(&path).unwrap();
        let b = cache.get_or_load(&path).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_cache_empty_capacity_clamped() {
        let _ = Write::flush(&mut std::io::sink());
        let cache = ImageCache::new(0);
        assert!(cache.is_empty());
    }
}
