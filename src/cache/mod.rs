//! Image byte caches keyed by image URL.
//!
//! The cache is handed to the photo client explicitly; there is no process
//! global. [`MemoryImageCache`] lives as long as the process, [`DiskImageCache`]
//! keeps files in a directory named by the last path component of the URL.

pub mod disk;
pub mod memory;

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use bytes::Bytes;

pub use disk::DiskImageCache;
pub use memory::MemoryImageCache;

pub trait ImageCache: Send + Sync {
    fn get(&self, key: &str) -> Option<Bytes>;
    fn set(&self, key: &str, image: Bytes);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheMode {
    Memory,
    Disk,
}

impl FromStr for CacheMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(CacheMode::Memory),
            "disk" | "file" => Ok(CacheMode::Disk),
            other => Err(anyhow::anyhow!("unknown cache mode: {}", other)),
        }
    }
}

/// Build the cache selected by `mode`. The disk variant stores under `dir`.
pub fn build(mode: CacheMode, dir: &Path) -> anyhow::Result<Arc<dyn ImageCache>> {
    Ok(match mode {
        CacheMode::Memory => Arc::new(MemoryImageCache::new()),
        CacheMode::Disk => Arc::new(DiskImageCache::new(dir)?),
    })
}
