use serde::{Deserialize, Serialize};

pub const KEY_CENTER_LATITUDE: &str = "region.center.latitude";
pub const KEY_CENTER_LONGITUDE: &str = "region.center.longitude";
pub const KEY_SPAN_LATITUDE_DELTA: &str = "region.span.latitudeDelta";
pub const KEY_SPAN_LONGITUDE_DELTA: &str = "region.span.longitudeDelta";

/// The last map viewport the user looked at.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct MapRegion {
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl MapRegion {
    /// A region is only worth restoring when every component was set; a zero
    /// anywhere means it was never saved.
    pub fn is_restorable(&self) -> bool {
        self.center_latitude != 0.0
            && self.center_longitude != 0.0
            && self.latitude_delta != 0.0
            && self.longitude_delta != 0.0
    }

    pub fn is_valid(&self) -> bool {
        [self.center_latitude, self.center_longitude, self.latitude_delta, self.longitude_delta]
            .iter()
            .all(|v| v.is_finite())
            && self.latitude_delta >= 0.0
            && self.longitude_delta >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(a: f64, b: f64, c: f64, d: f64) -> MapRegion {
        MapRegion { center_latitude: a, center_longitude: b, latitude_delta: c, longitude_delta: d }
    }

    #[test]
    fn restorable_requires_all_components() {
        assert!(region(48.1, 17.1, 0.5, 0.5).is_restorable());
        assert!(!region(0.0, 17.1, 0.5, 0.5).is_restorable());
        assert!(!region(48.1, 0.0, 0.5, 0.5).is_restorable());
        assert!(!region(48.1, 17.1, 0.0, 0.5).is_restorable());
        assert!(!region(48.1, 17.1, 0.5, 0.0).is_restorable());
    }

    #[test]
    fn negative_span_is_invalid() {
        assert!(region(1.0, 1.0, 1.0, 1.0).is_valid());
        assert!(!region(1.0, 1.0, -1.0, 1.0).is_valid());
        assert!(!region(f64::NAN, 1.0, 1.0, 1.0).is_valid());
    }
}
