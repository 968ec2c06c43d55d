//! Typed records produced by the decoders.

mod detail;
mod live;
mod position;

pub use detail::{
    AircraftInfo, AirlineInfo, AirportInfo, FlightDetail, FlightImage, FlightTimes, LegTimes,
    SeatConfiguration, SeatMap, SourceStation, TimezoneInfo,
};
pub use live::{Coordinates, InfoSource, LiveFlightRecord, RouteEndpoint};
pub use position::PositionSample;
