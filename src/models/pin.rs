use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Finite and within the WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A saved map coordinate. `total_pages` is the pagination cursor: the page
/// count Flickr reported for this spot on the last successful search.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Pin {
    pub id: i64,
    pub uuid: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub total_pages: Option<i64>,
    pub created_at: i64,
}

impl Pin {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}
