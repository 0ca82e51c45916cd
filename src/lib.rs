pub mod utils;
pub mod stats;
pub mod models;
pub mod db;
pub mod cache;
pub mod flickr;
pub mod pagination;
pub mod album;
pub mod api;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rusqlite::Connection;

use crate::cache::ImageCache;
use crate::flickr::FlickrClient;

#[derive(Clone)]
pub struct AppPaths {
    pub db_path: PathBuf,
    pub image_cache: PathBuf,
}

impl AppPaths {
    pub fn under(data: &Path) -> Self {
        Self {
            db_path: data.join("db").join("tourist.db"),
            image_cache: data.join("images"),
        }
    }
}

/// Everything a request needs. The photo cache and the random source are
/// owned here and handed down, so nothing depends on process globals.
#[derive(Clone)]
pub struct AppState {
    pub started_at: std::time::Instant,
    pub paths: AppPaths,
    pub stats: Arc<stats::Stats>,
    pub db: Arc<Mutex<Connection>>,
    pub flickr: FlickrClient,
    pub image_cache: Arc<dyn ImageCache>,
    pub rng: Arc<Mutex<StdRng>>,
}

impl AppState {
    pub fn new(paths: AppPaths, db: Connection, flickr: FlickrClient, image_cache: Arc<dyn ImageCache>) -> Self {
        Self {
            started_at: std::time::Instant::now(),
            paths,
            stats: Arc::new(stats::Stats::new()),
            db: Arc::new(Mutex::new(db)),
            flickr,
            image_cache,
            rng: Arc::new(Mutex::new(StdRng::from_entropy())),
        }
    }

    /// Replace the entropy-seeded page picker, e.g. with a fixed seed.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Arc::new(Mutex::new(rng));
        self
    }

    /// Run `f` against the shared connection on the blocking pool.
    pub async fn with_db<T, F>(&self, f: F) -> anyhow::Result<T>
    where
        F: FnOnce(&Connection) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || {
            let conn = db.lock();
            f(&*conn)
        })
        .await
        .map_err(|e| anyhow::anyhow!("database task failed: {}", e))?
    }
}
