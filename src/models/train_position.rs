use serde::{Deserialize, Serialize};

/// Normalized, display-facing state of a single train
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TrainPosition {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    /// Degrees clockwise from north, 0-360
    pub heading: f64,
    pub speed: f64,
    pub service: String,
    pub operator: String,
    pub destination: String,
    /// Minutes behind schedule
    pub delay: f64,
}

impl TrainPosition {
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.speed > 0.0
    }

    #[must_use]
    pub fn is_delayed(&self) -> bool {
        self.delay > 0.0
    }

    /// `[lat, lng]` pair in the order the map layer expects
    #[must_use]
    pub fn coordinate(&self) -> [f64; 2] {
        [self.lat, self.lng]
    }

    /// Heading normalized into `[0, 360)`
    #[must_use]
    pub fn normalized_heading(&self) -> f64 {
        if self.heading.is_finite() {
            self.heading.rem_euclid(360.0)
        } else {
            0.0
        }
    }
}
