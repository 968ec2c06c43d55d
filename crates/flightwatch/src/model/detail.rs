//! Full per-flight detail records.
//!
//! Every optional sub-object is either fully present or absent. The decoder
//! gates each one on an anchor field (airline ICAO code, airport name, ...)
//! so a consumer never sees a half-filled airline or airport.

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use super::live::Coordinates;

/// A photo of the airframe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightImage {
    /// Photographer or agency credited for the image.
    pub source: Option<String>,
    /// Link to the photographer's page.
    pub source_url: Option<String>,
    /// Direct URL of the image.
    pub url: String,
}

/// The receiver station that is currently reporting the flight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceStation {
    /// Receiver network tag (`ADSB`, `MLAT`, ...).
    pub source_type: Option<String>,
    /// Station name.
    pub station: Option<String>,
    /// City of the station.
    pub city: Option<String>,
    /// Country of the station.
    pub country: Option<String>,
    /// Station position.
    pub coordinates: Option<Coordinates>,
    /// Distance from the station to the aircraft.
    pub distance: Option<f64>,
}

/// Operating airline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirlineInfo {
    /// ICAO airline code.
    pub icao: String,
    /// IATA airline code.
    pub iata: Option<String>,
    /// Airline name.
    pub name: Option<String>,
    /// Airline logo.
    pub image_url: String,
}

/// An airport at one end of the route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportInfo {
    /// Airport name.
    pub name: String,
    /// ICAO airport code.
    pub icao: Option<String>,
    /// IATA airport code.
    pub iata: Option<String>,
    /// City served.
    pub city: Option<String>,
    /// Airport position.
    pub coordinates: Option<Coordinates>,
    /// Terminal, when known.
    pub terminal: Option<String>,
    /// Gate, when known.
    pub gate: Option<String>,
    /// Take-off runway for the origin, landing runway for the destination.
    pub runway: Option<String>,
}

/// The airframe flying the route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AircraftInfo {
    /// ICAO type designator.
    pub icao: Option<String>,
    /// Human-readable type name.
    pub name: Option<String>,
    /// Aircraft class code (see [`crate::provider::AircraftClass`]).
    pub class: Option<String>,
    /// Registration mark.
    pub registration: Option<String>,
    /// 24-bit ICAO transponder address.
    pub icao24_address: Option<String>,
    /// Manufacturer serial number.
    pub serial_number: Option<String>,
    /// Airframe age.
    pub age: Option<String>,
    /// Date of first flight.
    pub first_flight: Option<String>,
    /// Registration country.
    pub country: Option<String>,
    /// Flag of the registration country.
    pub country_flag_image_url: Option<String>,
}

/// Timezone of one airport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimezoneInfo {
    /// Abbreviation (`PST`).
    pub short: Option<String>,
    /// Full name.
    pub long: Option<String>,
    /// Offset from UTC as the feed reports it.
    pub offset: Option<String>,
}

/// Scheduled, estimated and actual times for one leg end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegTimes {
    /// Scheduled time.
    pub scheduled: Option<String>,
    /// Estimated time.
    pub estimated: Option<String>,
    /// Actual time.
    pub actual: Option<String>,
    /// Human-readable relative time ("in 25 minutes").
    pub relative: Option<String>,
    /// Timezone of the airport.
    pub timezone: TimezoneInfo,
}

/// Departure and arrival times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightTimes {
    /// Departure end.
    pub departure: Option<LegTimes>,
    /// Arrival end.
    pub arrival: Option<LegTimes>,
    /// Scheduled block time.
    pub duration: Option<String>,
    /// Delay in minutes.
    pub delay: Option<i64>,
}

/// Cabin seat counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatConfiguration {
    /// First class.
    pub first: u32,
    /// Business class.
    pub business: u32,
    /// Premium economy.
    pub premium: u32,
    /// Economy.
    pub economy: u32,
}

impl SeatConfiguration {
    /// Total seats across all cabins.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.first + self.business + self.premium + self.economy
    }
}

/// Seat map for the operating aircraft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatMap {
    /// Seat map page.
    pub link: Option<String>,
    /// Twin-aisle cabin.
    pub is_wide_body: bool,
    /// Seats per cabin.
    pub configuration: SeatConfiguration,
}

/// Full record for one selected or enriched flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightDetail {
    /// Feed-assigned identifier.
    pub id: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Time of the last position report.
    pub timestamp: Option<DateTime<Utc>>,
    /// ATC callsign.
    pub callsign: Option<String>,
    /// Commercial flight number.
    pub flight_number: Option<String>,
    /// Airframe photos.
    pub images: Vec<FlightImage>,
    /// Route string (`SFO-JFK`).
    pub route: Option<String>,
    /// Altitude in feet.
    pub altitude: Option<i32>,
    /// Transponder code.
    pub squawk_code: Option<String>,
    /// Track in degrees.
    pub heading: Option<i32>,
    /// Ground speed in knots.
    pub ground_speed: Option<i32>,
    /// Route progress in percent.
    pub progress: Option<f64>,
    /// Reporting receiver.
    pub source: SourceStation,
    /// Operating airline, when the feed names one.
    pub airline: Option<AirlineInfo>,
    /// Departure airport.
    pub origin: Option<AirportInfo>,
    /// Arrival airport.
    pub destination: Option<AirportInfo>,
    /// Operating airframe.
    pub aircraft: AircraftInfo,
    /// Schedule and actual times.
    pub times: Option<FlightTimes>,
    /// Flight status text.
    pub status: Option<String>,
    /// Route distance.
    pub distance: Option<f64>,
    /// Whether the aircraft is on the ground.
    pub on_ground: bool,
    /// Flight information region the aircraft is in.
    pub fir: Option<String>,
    /// Days the route is flown.
    pub days_of_operation: Option<Vec<Weekday>>,
    /// Cabin layout, when known.
    pub seat_map: Option<SeatMap>,
}

impl FlightDetail {
    /// Best display label: flight number, falling back to callsign, then id.
    #[must_use]
    pub fn label(&self) -> &str {
        self.flight_number
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.callsign.as_deref().filter(|c| !c.is_empty()))
            .unwrap_or(&self.id)
    }
}
