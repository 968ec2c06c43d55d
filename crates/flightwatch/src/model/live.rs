//! Live feed snapshot records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The receiver network category that produced a live position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InfoSource {
    /// Multilateration.
    Mlat,
    /// ADS-B ground receiver.
    Adsb,
    /// Universal Access Transceiver.
    Uat,
    /// Airport surface detection.
    Asdex,
    /// Satellite ADS-B.
    Sate,
    /// FLARM glider transponder.
    Flarm,
    /// FAA ASDI feed.
    Asdi,
    /// Oceanic position reports.
    Ocea,
    /// HF data link.
    Hfdl,
    /// Australian ATC feed.
    Aust,
    /// Estimated track (no live receiver).
    Esti,
    /// A tag the feed added after this list was written.
    Other(String),
}

impl InfoSource {
    /// Parse a feed source tag.
    ///
    /// Returns `None` for a blank tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let source = match tag {
            "" => return None,
            "MLAT" => Self::Mlat,
            "ADSB" => Self::Adsb,
            "UAT" => Self::Uat,
            "ASDEX" => Self::Asdex,
            "SATE" => Self::Sate,
            "FLARM" => Self::Flarm,
            "ASDI" => Self::Asdi,
            "OCEA" => Self::Ocea,
            "HFDL" => Self::Hfdl,
            "AUST" => Self::Aust,
            "ESTI" => Self::Esti,
            other => Self::Other(other.to_string()),
        };
        Some(source)
    }

    /// The tag as the feed spells it.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Mlat => "MLAT",
            Self::Adsb => "ADSB",
            Self::Uat => "UAT",
            Self::Asdex => "ASDEX",
            Self::Sate => "SATE",
            Self::Flarm => "FLARM",
            Self::Asdi => "ASDI",
            Self::Ocea => "OCEA",
            Self::Hfdl => "HFDL",
            Self::Aust => "AUST",
            Self::Esti => "ESTI",
            Self::Other(tag) => tag,
        }
    }
}

impl std::fmt::Display for InfoSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

/// One end of a flight's route as the live feed reports it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteEndpoint {
    /// IATA airport code (may be empty when unknown).
    pub iata: String,
    /// Actual departure time for the origin, estimated arrival for the destination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Airport position, when the feed includes it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

/// One aircraft's current snapshot from the live feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveFlightRecord {
    /// Feed-assigned identifier, unique within one batch.
    pub id: String,
    /// Commercial flight number (may be empty).
    pub flight_number: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Time of the position report.
    pub timestamp: DateTime<Utc>,
    /// Altitude in feet.
    pub altitude: Option<i32>,
    /// ICAO aircraft type designator.
    pub model: String,
    /// Ground speed in knots.
    pub ground_speed: Option<i32>,
    /// Track in degrees.
    pub heading: Option<i32>,
    /// Receiver network that produced the position.
    pub source: Option<InfoSource>,
    /// Aircraft registration mark.
    pub registration: String,
    /// Departure end of the route.
    pub origin: RouteEndpoint,
    /// Arrival end of the route.
    pub destination: RouteEndpoint,
    /// Airline ICAO code.
    pub airline: String,
    /// Vertical rate in feet per minute.
    pub vertical_speed: Option<i32>,
    /// Reporting receiver station.
    pub station: Option<String>,
    /// Flight phase as the feed reports it.
    pub status: Option<String>,
    /// Whether the aircraft is on the ground.
    pub on_ground: bool,
    /// Airframe status text.
    pub aircraft_status: Option<String>,
    /// Transponder code.
    pub squawk: Option<String>,
    /// Airport the flight diverted to.
    pub diverted_airport: Option<String>,
    /// Distance left to the destination.
    pub estimated_distance_remaining: Option<f64>,
    /// Time left to the destination.
    pub estimated_time_remaining: Option<String>,
    /// 24-bit ICAO transponder address.
    pub icao24_address: String,
    /// Airframe photo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Airline logo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airline_image_url: Option<String>,
}

impl LiveFlightRecord {
    /// Position as a coordinate pair.
    #[must_use]
    pub fn position(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_source_from_tag() {
        assert_eq!(InfoSource::from_tag("ADSB"), Some(InfoSource::Adsb));
        assert_eq!(InfoSource::from_tag("ESTI"), Some(InfoSource::Esti));
        assert_eq!(InfoSource::from_tag(""), None);
        assert_eq!(
            InfoSource::from_tag("RADAR"),
            Some(InfoSource::Other("RADAR".to_string()))
        );
    }

    #[test]
    fn test_info_source_display_round_trips_tag() {
        for tag in [
            "MLAT", "ADSB", "UAT", "ASDEX", "SATE", "FLARM", "ASDI", "OCEA", "HFDL", "AUST", "ESTI",
        ] {
            let source = InfoSource::from_tag(tag).unwrap();
            assert_eq!(source.to_string(), tag);
        }
    }

    #[test]
    fn test_route_endpoint_serialize_skips_missing() {
        let endpoint = RouteEndpoint {
            iata: "SFO".to_string(),
            time: None,
            coordinates: None,
        };
        let json = serde_json::to_string(&endpoint).unwrap();
        assert_eq!(json, r#"{"iata":"SFO"}"#);
    }
}
