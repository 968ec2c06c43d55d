//! Position-history samples.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One point in a flight's track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    /// When the sample was recorded.
    pub timestamp: DateTime<Utc>,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Altitude in feet, 0 when the feed value was unparsable.
    pub altitude: i32,
    /// Ground speed in knots, 0 when the feed value was unparsable.
    pub speed: i32,
    /// Receiver network tag for this sample.
    pub source: Option<String>,
}
