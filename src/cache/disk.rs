use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use bytes::Bytes;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::ImageCache;

/// Image files kept in one directory. The file name is the last path
/// component of the URL (`<id>_<secret>.jpg` for Flickr), so two URLs that
/// share it share an entry.
pub struct DiskImageCache {
    dir: PathBuf,
}

impl DiskImageCache {
    pub fn new(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self { dir: dir.to_path_buf() })
    }

    fn file_for(&self, key: &str) -> Option<PathBuf> {
        let name = key.rsplit('/').next()?;
        if name.is_empty() || name == "." || name == ".." {
            return None;
        }
        Some(self.dir.join(name))
    }

    // Readers see the old file or the complete new one, never a partial write.
    fn write_whole(&self, path: &Path, image: &[u8]) -> Result<()> {
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(image)?;
        tmp.persist(path)?;
        Ok(())
    }
}

impl ImageCache for DiskImageCache {
    fn get(&self, key: &str) -> Option<Bytes> {
        let path = self.file_for(key)?;
        match std::fs::read(&path) {
            Ok(data) => Some(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Failed to read cached image {:?}: {}", path, e);
                None
            }
        }
    }

    fn set(&self, key: &str, image: Bytes) {
        let Some(path) = self.file_for(key) else {
            debug!("No cache file name for key {}", key);
            return;
        };
        if let Err(e) = self.write_whole(&path, &image) {
            warn!("Failed to write cached image {:?}: {}", path, e);
        }
    }
}
