use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::Serialize;

/// Request counters for the Flickr-facing operations.
pub struct Stats {
    searches: AtomicU64,
    search_failures: AtomicU64,
    photos_stored: AtomicU64,
    images_served: AtomicU64,
    image_failures: AtomicU64,
    last_search_at: parking_lot::Mutex<Option<Instant>>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct StatsSnapshot {
    pub searches: u64,
    pub search_failures: u64,
    pub photos_stored: u64,
    pub images_served: u64,
    pub image_failures: u64,
    pub seconds_since_last_search: Option<f64>,
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    pub fn new() -> Self {
        Self {
            searches: AtomicU64::new(0),
            search_failures: AtomicU64::new(0),
            photos_stored: AtomicU64::new(0),
            images_served: AtomicU64::new(0),
            image_failures: AtomicU64::new(0),
            last_search_at: parking_lot::Mutex::new(None),
        }
    }
    pub fn inc_searches(&self) {
        self.searches.fetch_add(1, Ordering::Relaxed);
        *self.last_search_at.lock() = Some(Instant::now());
    }
    pub fn inc_search_failures(&self) { self.search_failures.fetch_add(1, Ordering::Relaxed); }
    pub fn inc_photos_stored(&self, n: u64) { self.photos_stored.fetch_add(n, Ordering::Relaxed); }
    pub fn inc_images_served(&self) { self.images_served.fetch_add(1, Ordering::Relaxed); }
    pub fn inc_image_failures(&self) { self.image_failures.fetch_add(1, Ordering::Relaxed); }

    pub fn searches(&self) -> u64 { self.searches.load(Ordering::Relaxed) }
    pub fn search_failures(&self) -> u64 { self.search_failures.load(Ordering::Relaxed) }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            searches: self.searches(),
            search_failures: self.search_failures(),
            photos_stored: self.photos_stored.load(Ordering::Relaxed),
            images_served: self.images_served.load(Ordering::Relaxed),
            image_failures: self.image_failures.load(Ordering::Relaxed),
            seconds_since_last_search: self.last_search_at.lock().map(|t| t.elapsed().as_secs_f64()),
        }
    }
}
