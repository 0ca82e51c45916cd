use std::collections::HashMap;

use bytes::Bytes;
use parking_lot::RwLock;

use super::ImageCache;

/// Process-lifetime map from image URL to bytes. No eviction.
#[derive(Default)]
pub struct MemoryImageCache {
    entries: RwLock<HashMap<String, Bytes>>,
}

impl MemoryImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl ImageCache for MemoryImageCache {
    fn get(&self, key: &str) -> Option<Bytes> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, image: Bytes) {
        self.entries.write().insert(key.to_string(), image);
    }
}
