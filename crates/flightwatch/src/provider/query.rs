//! Live-feed query options.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Geographic bounding box given as two corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Latitude of the first corner.
    pub lat1: f64,
    /// Longitude of the first corner.
    pub lon1: f64,
    /// Latitude of the second corner.
    pub lat2: f64,
    /// Longitude of the second corner.
    pub lon2: f64,
}

impl Bounds {
    /// Corners in the `lat2,lon2,lat1,lon1` order the feed expects.
    #[must_use]
    pub fn to_feed_param(&self) -> String {
        format!("{},{},{},{}", self.lat2, self.lon2, self.lat1, self.lon1)
    }
}

impl FromStr for Bounds {
    type Err = Error;

    /// Parse `lat1,lon1,lat2,lon2`.
    fn from_str(s: &str) -> Result<Self> {
        let parts = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::ConfigValidation {
                message: format!("invalid bounds {s:?}: {e}"),
            })?;

        match parts.as_slice() {
            &[lat1, lon1, lat2, lon2] => Ok(Self {
                lat1,
                lon1,
                lat2,
                lon2,
            }),
            _ => Err(Error::ConfigValidation {
                message: format!("bounds need four values lat1,lon1,lat2,lon2, got {s:?}"),
            }),
        }
    }
}

/// Aircraft category filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AircraftClass {
    /// Passenger airliners.
    Airliner,
    /// Freighters.
    Cargo,
    /// Business jets.
    BusinessJet,
    /// Light aircraft.
    GeneralAviation,
    /// Rotorcraft.
    Helicopter,
    /// Military.
    Military,
}

impl AircraftClass {
    /// Every class, in feed order.
    pub const ALL: [Self; 6] = [
        Self::Airliner,
        Self::Cargo,
        Self::BusinessJet,
        Self::GeneralAviation,
        Self::Helicopter,
        Self::Military,
    ];

    /// Feed code for this class.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Airliner => "A",
            Self::Cargo => "AC",
            Self::BusinessJet => "B",
            Self::GeneralAviation => "G",
            Self::Helicopter => "HG",
            Self::Military => "M",
        }
    }
}

impl fmt::Display for AircraftClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for AircraftClass {
    type Err = Error;

    /// Accepts either the feed code (`HG`) or a name (`helicopter`).
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|class| class.code().eq_ignore_ascii_case(wanted))
            .or_else(|| match wanted.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
                "airliner" => Some(Self::Airliner),
                "cargo" => Some(Self::Cargo),
                "businessjet" | "bizjet" => Some(Self::BusinessJet),
                "generalaviation" | "ga" => Some(Self::GeneralAviation),
                "helicopter" | "heli" => Some(Self::Helicopter),
                "military" => Some(Self::Military),
                _ => None,
            })
            .ok_or_else(|| Error::ConfigValidation {
                message: format!("unknown aircraft class {s:?}"),
            })
    }
}

/// Filters for one live-feed snapshot. All fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveQuery {
    /// Bounding box.
    pub bounds: Option<Bounds>,
    /// Map zoom level.
    pub zoom: Option<u8>,
    /// Flight number, e.g. `DL933`.
    pub flight_number: Option<String>,
    /// Airport code.
    pub airport: Option<String>,
    /// Airline code.
    pub airline: Option<String>,
    /// Aircraft classes to include.
    pub aircraft_class: Vec<AircraftClass>,
}

impl LiveQuery {
    /// An unfiltered query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a bounding box.
    #[must_use]
    pub fn bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Set the zoom level.
    #[must_use]
    pub fn zoom(mut self, zoom: u8) -> Self {
        self.zoom = Some(zoom);
        self
    }

    /// Filter by flight number.
    #[must_use]
    pub fn flight_number(mut self, flight_number: impl Into<String>) -> Self {
        self.flight_number = Some(flight_number.into());
        self
    }

    /// Filter by airport.
    #[must_use]
    pub fn airport(mut self, airport: impl Into<String>) -> Self {
        self.airport = Some(airport.into());
        self
    }

    /// Filter by airline.
    #[must_use]
    pub fn airline(mut self, airline: impl Into<String>) -> Self {
        self.airline = Some(airline.into());
        self
    }

    /// Add an aircraft class.
    #[must_use]
    pub fn class(mut self, class: AircraftClass) -> Self {
        if !self.aircraft_class.contains(&class) {
            self.aircraft_class.push(class);
        }
        self
    }
}
