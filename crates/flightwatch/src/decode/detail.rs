//! Per-flight detail decoding.
//!
//! The detail endpoint answers with one flat object of short keys. Each
//! optional sub-object is gated on its anchor: the airline on its ICAO code,
//! each airport on its name, the times block on any scheduled, estimated
//! or actual time, the seat map on the `seatmaps` object.

use chrono::Weekday;
use serde_json::Value;

use super::value::Fields;
use super::MediaUrls;
use crate::error::{Error, Result};
use crate::model::{
    AircraftInfo, AirlineInfo, AirportInfo, FlightDetail, FlightImage, FlightTimes, LegTimes,
    SeatConfiguration, SeatMap, SourceStation, TimezoneInfo,
};

/// Decode a detail payload.
///
/// An absent payload (`None` or JSON `null`) decodes to `Ok(None)`.
///
/// # Errors
///
/// Returns a decode error if the payload is not an object, lacks the flight
/// id or position, or carries a wrongly typed value.
pub fn decode_detail(raw: Option<&Value>, urls: &MediaUrls) -> Result<Option<FlightDetail>> {
    let Some(raw) = raw.filter(|v| !v.is_null()) else {
        return Ok(None);
    };
    let map = raw
        .as_object()
        .ok_or_else(|| Error::decode("flight detail", "expected an object"))?;

    let id = match map.get("fid") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(Error::decode("flight detail", "missing `fid`")),
    };
    let context = format!("flight detail {id}");
    let f = Fields::new(&context, map);

    Ok(Some(FlightDetail {
        latitude: f.f64("la")?,
        longitude: f.f64("lo")?,
        timestamp: f.opt_timestamp("svd")?,
        callsign: f.opt_text("cs")?,
        flight_number: f.opt_text("fnia")?,
        images: images(&f, urls)?,
        route: f.opt_text("route")?,
        altitude: f.opt_i32("alt")?,
        squawk_code: f.opt_text("sq")?,
        heading: f.opt_i32("hd")?,
        ground_speed: f.opt_i32("gs")?,
        progress: f.opt_f64("pr")?,
        source: SourceStation {
            source_type: f.opt_text("so")?,
            station: f.opt_text("st")?,
            city: f.opt_text("stci")?,
            country: f.opt_text("stco")?,
            coordinates: f.lat_lon_pair("stconla", "stconlo")?,
            distance: f.opt_f64("stdis")?,
        },
        airline: airline(&f, urls)?,
        origin: airport(&f, AirportKeys::ORIGIN)?,
        destination: airport(&f, AirportKeys::DESTINATION)?,
        aircraft: aircraft(&f, urls)?,
        times: times(&f)?,
        status: f.opt_text("status")?,
        distance: f.opt_f64("distance")?,
        on_ground: f.flag("ground"),
        fir: f.opt_text("fir")?,
        days_of_operation: days_of_operation(&f)?,
        seat_map: seat_map(&f)?,
        id,
    }))
}

fn images(f: &Fields<'_>, urls: &MediaUrls) -> Result<Vec<FlightImage>> {
    let Some(raw) = f.raw("phs") else {
        return Ok(Vec::new());
    };
    let photos = raw
        .as_array()
        .ok_or_else(|| f.error("phs", "expected an array"))?;

    photos
        .iter()
        .filter_map(Value::as_object)
        .map(|photo| {
            let p = Fields::new("flight detail photo", photo);
            let thumbnail = p.string("th")?;
            Ok(FlightImage {
                source: p.opt_text("ph")?,
                source_url: p.opt_text("phu")?,
                url: urls.photo(&thumbnail),
            })
        })
        .collect()
}

fn airline(f: &Fields<'_>, urls: &MediaUrls) -> Result<Option<AirlineInfo>> {
    if !f.is_present("alic") {
        return Ok(None);
    }
    let icao = f.string("alic")?;
    Ok(Some(AirlineInfo {
        image_url: urls.airline_logo(&icao),
        icao,
        iata: f.opt_text("alia")?,
        name: f.opt_text("alna")?,
    }))
}

/// Raw key names for one end of the route.
struct AirportKeys {
    name: &'static str,
    icao: &'static str,
    iata: &'static str,
    city: &'static str,
    lat: &'static str,
    lon: &'static str,
    terminal: &'static str,
    gate: &'static str,
    runway: &'static str,
}

impl AirportKeys {
    const ORIGIN: Self = Self {
        name: "aporgna",
        icao: "aporgic",
        iata: "aporgia",
        city: "aporgci",
        lat: "aporgla",
        lon: "aporglo",
        terminal: "depterm",
        gate: "depgate",
        runway: "tkorw",
    };

    const DESTINATION: Self = Self {
        name: "apdstna",
        icao: "apdstic",
        iata: "apdstia",
        city: "apdstci",
        lat: "apdstla",
        lon: "apdstlo",
        terminal: "arrterm",
        gate: "arrgate",
        runway: "lngrw",
    };
}

fn airport(f: &Fields<'_>, keys: AirportKeys) -> Result<Option<AirportInfo>> {
    if !f.is_present(keys.name) {
        return Ok(None);
    }
    Ok(Some(AirportInfo {
        name: f.string(keys.name)?,
        icao: f.opt_text(keys.icao)?,
        iata: f.opt_text(keys.iata)?,
        city: f.opt_text(keys.city)?,
        coordinates: f.lat_lon_pair(keys.lat, keys.lon)?,
        terminal: f.opt_text(keys.terminal)?,
        gate: f.opt_text(keys.gate)?,
        runway: f.opt_text(keys.runway)?,
    }))
}

fn aircraft(f: &Fields<'_>, urls: &MediaUrls) -> Result<AircraftInfo> {
    let country = f.opt_text("accountry")?;
    Ok(AircraftInfo {
        icao: f.opt_text("act")?,
        name: f.opt_text("acd")?,
        class: f.opt_text("accl")?,
        registration: f.opt_text("acr")?,
        icao24_address: f.opt_text("ms")?,
        serial_number: f.opt_text("accn")?,
        age: f.opt_text("acff")?,
        first_flight: f.opt_text("acffdate")?,
        country_flag_image_url: country.as_deref().map(|c| urls.country_flag(c)),
        country,
    })
}

/// Raw key names for one leg end's times.
struct LegKeys {
    scheduled: &'static str,
    estimated: &'static str,
    actual: &'static str,
    relative: &'static str,
    tz_short: &'static str,
    tz_long: &'static str,
    tz_offset: &'static str,
}

impl LegKeys {
    const DEPARTURE: Self = Self {
        scheduled: "deps",
        estimated: "depe",
        actual: "depa",
        relative: "departureRelative",
        tz_short: "aporgtzns",
        tz_long: "aporgtznl",
        tz_offset: "aporgtz",
    };

    const ARRIVAL: Self = Self {
        scheduled: "arrs",
        estimated: "arre",
        actual: "arra",
        relative: "arrivalRelative",
        tz_short: "apdsttzns",
        tz_long: "apdsttznl",
        tz_offset: "apdsttz",
    };
}

fn leg(f: &Fields<'_>, keys: &LegKeys) -> Result<Option<LegTimes>> {
    let anchored = [keys.scheduled, keys.estimated, keys.actual]
        .iter()
        .any(|key| f.is_present(key));
    if !anchored {
        return Ok(None);
    }
    Ok(Some(LegTimes {
        scheduled: f.opt_text(keys.scheduled)?,
        estimated: f.opt_text(keys.estimated)?,
        actual: f.opt_text(keys.actual)?,
        relative: f.opt_text(keys.relative)?,
        timezone: TimezoneInfo {
            short: f.opt_text(keys.tz_short)?,
            long: f.opt_text(keys.tz_long)?,
            offset: f.opt_text(keys.tz_offset)?,
        },
    }))
}

fn times(f: &Fields<'_>) -> Result<Option<FlightTimes>> {
    let departure = leg(f, &LegKeys::DEPARTURE)?;
    let arrival = leg(f, &LegKeys::ARRIVAL)?;
    if departure.is_none() && arrival.is_none() {
        return Ok(None);
    }
    Ok(Some(FlightTimes {
        departure,
        arrival,
        duration: f.opt_text("duration")?,
        delay: f.opt_i64("delayed")?,
    }))
}

/// Feed days run 1 (Sunday) to 7 (Saturday).
fn days_of_operation(f: &Fields<'_>) -> Result<Option<Vec<Weekday>>> {
    let Some(raw) = f.raw("dooperation") else {
        return Ok(None);
    };
    let days = raw
        .as_array()
        .ok_or_else(|| f.error("dooperation", "expected an array"))?;

    days.iter()
        .map(|day| match day.as_u64() {
            Some(n @ 1..=7) => Ok(weekday_from_sunday(n - 1)),
            _ => Err(f.error("dooperation", format!("day {day} out of range 1..=7"))),
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

fn weekday_from_sunday(offset: u64) -> Weekday {
    match offset {
        0 => Weekday::Sun,
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        _ => Weekday::Sat,
    }
}

fn seat_map(f: &Fields<'_>) -> Result<Option<SeatMap>> {
    let Some(raw) = f.raw("seatmaps") else {
        return Ok(None);
    };
    let map = raw
        .as_object()
        .ok_or_else(|| f.error("seatmaps", "expected an object"))?;
    let s = Fields::new("flight detail seat map", map);

    let conf = s.string("seatsConf")?;
    let counts = conf
        .split('|')
        .map(|part| {
            let part = part.trim();
            if part.is_empty() {
                Ok(0)
            } else {
                part.parse::<u32>()
                    .map_err(|_| s.error("seatsConf", format!("bad seat count {part:?}")))
            }
        })
        .collect::<Result<Vec<u32>>>()?;
    let [first, business, premium, economy] = counts[..] else {
        return Err(s.error("seatsConf", format!("expected 4 cabins, got {conf:?}")));
    };

    Ok(Some(SeatMap {
        link: s.opt_text("link")?,
        is_wide_body: matches!(s.raw("isWideBody"), Some(Value::String(v)) if v == "1"),
        configuration: SeatConfiguration {
            first,
            business,
            premium,
            economy,
        },
    }))
}
