//! FlightRadar24 feed client.
//!
//! The live feed is the same shape as RadarBox (id to positional array) and
//! goes through the same zip, with its own single key table. Detail and
//! track both come from the click-handler endpoint, which answers with a
//! nested object deserialized through serde.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{FlightProvider, LiveQuery};
use crate::config::FeedConfig;
use crate::decode::layout::zip;
use crate::decode::value::{parse_timestamp, Fields};
use crate::decode::MediaUrls;
use crate::error::{Error, Result};
use crate::model::{
    AircraftInfo, AirlineInfo, AirportInfo, Coordinates, FlightDetail, FlightImage, FlightTimes,
    LegTimes, LiveFlightRecord, PositionSample, RouteEndpoint, SourceStation, TimezoneInfo,
};
use crate::transport::{Query, Reply, Transport};

/// Slot names of one feed record.
const FEED_KEYS: &[&str] = &[
    "icaoAddress",
    "latitude",
    "longitude",
    "track",
    "altitude",
    "groundSpeed",
    "squawk",
    "station",
    "model",
    "registration",
    "timestamp",
    "origin",
    "destination",
    "flightNumber",
    "onGround",
    "verticalSpeed",
    "callsign",
    "_",
    "airline",
];

/// Client for the FlightRadar24 feed and click-handler endpoints.
#[derive(Debug)]
pub struct Fr24Provider<T> {
    transport: T,
    feed_url: String,
    detail_url: String,
    urls: MediaUrls,
}

impl<T: Transport> Fr24Provider<T> {
    /// Create a provider over `transport` using the endpoints in `feed`.
    pub fn new(transport: T, feed: &FeedConfig) -> Self {
        Self {
            transport,
            feed_url: feed.fr24_feed_url.clone(),
            detail_url: feed.fr24_detail_url.clone(),
            urls: MediaUrls::from_config(feed),
        }
    }

    /// Feed parameters. Only the bounding box is applied upstream.
    #[must_use]
    pub fn feed_params(query: &LiveQuery) -> Query {
        let mut params = Query::new();
        if let Some(b) = &query.bounds {
            // north,south,west,east
            params.push((
                "bounds".to_string(),
                format!(
                    "{},{},{},{}",
                    b.lat1.max(b.lat2),
                    b.lat1.min(b.lat2),
                    b.lon1.min(b.lon2),
                    b.lon1.max(b.lon2)
                ),
            ));
        }
        params
    }

    async fn click_handler(&self, id: &str) -> Result<Reply> {
        let query = vec![("flight".to_string(), id.to_string())];
        self.transport.get(&self.detail_url, &query, &[]).await
    }
}

/// Apply the filters the feed does not take as parameters.
fn matches(record: &LiveFlightRecord, query: &LiveQuery) -> bool {
    let same = |a: &str, b: &str| a.eq_ignore_ascii_case(b);
    query
        .flight_number
        .as_deref()
        .map_or(true, |n| same(&record.flight_number, n))
        && query
            .airline
            .as_deref()
            .map_or(true, |a| same(&record.airline, a))
        && query.airport.as_deref().map_or(true, |a| {
            same(&record.origin.iata, a) || same(&record.destination.iata, a)
        })
}

fn decode_feed_entry(id: &str, values: &[Value], urls: &MediaUrls) -> Result<LiveFlightRecord> {
    let context = format!("fr24 record {id}");
    let map = zip(&context, FEED_KEYS, values)?;
    let f = Fields::new(&context, &map);
    let airline = f.string("airline")?;

    Ok(LiveFlightRecord {
        id: id.to_string(),
        flight_number: f.string("flightNumber")?,
        latitude: f.f64("latitude")?,
        longitude: f.f64("longitude")?,
        timestamp: f.timestamp("timestamp")?,
        altitude: f.opt_i32("altitude")?,
        model: f.string("model")?,
        ground_speed: f.opt_i32("groundSpeed")?,
        heading: f.opt_i32("track")?,
        source: None,
        registration: f.string("registration")?,
        origin: RouteEndpoint {
            iata: f.string("origin")?,
            time: None,
            coordinates: None,
        },
        destination: RouteEndpoint {
            iata: f.string("destination")?,
            time: None,
            coordinates: None,
        },
        vertical_speed: f.opt_i32("verticalSpeed")?,
        station: f.opt_text("station")?,
        status: None,
        on_ground: f.flag("onGround"),
        aircraft_status: None,
        squawk: f.opt_text("squawk")?,
        diverted_airport: None,
        estimated_distance_remaining: None,
        estimated_time_remaining: None,
        icao24_address: f.string("icaoAddress")?,
        image_url: None,
        airline_image_url: (!airline.is_empty()).then(|| urls.airline_logo(&airline)),
        airline,
    })
}

/// Decode a feed response, skipping the non-record keys (`full_count`, `version`, ...).
fn decode_feed(response: &Value, urls: &MediaUrls) -> Result<Vec<LiveFlightRecord>> {
    let entries = response
        .as_object()
        .ok_or_else(|| Error::decode("fr24 feed", "expected an object"))?;

    entries
        .iter()
        .filter_map(|(id, raw)| raw.as_array().map(|values| (id, values)))
        .map(|(id, values)| decode_feed_entry(id, values, urls))
        .collect()
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ClickHandler {
    identification: Identification,
    status: Option<Status>,
    aircraft: Option<Aircraft>,
    airline: Option<Airline>,
    airport: Airports,
    time: Option<Times>,
    trail: Vec<TrailPoint>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Identification {
    id: Option<String>,
    number: FlightNumber,
    callsign: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FlightNumber {
    default: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Status {
    live: bool,
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Aircraft {
    model: Option<Model>,
    registration: Option<String>,
    hex: Option<String>,
    msn: Option<String>,
    age: Option<Value>,
    images: Option<Images>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Model {
    code: Option<String>,
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Images {
    thumbnails: Vec<Image>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Image {
    src: String,
    link: Option<String>,
    copyright: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Code {
    iata: Option<String>,
    icao: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Airline {
    name: Option<String>,
    code: Code,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Airports {
    origin: Option<Airport>,
    destination: Option<Airport>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Airport {
    name: Option<String>,
    code: Code,
    position: Option<AirportPosition>,
    timezone: Option<Timezone>,
    info: Option<AirportGate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AirportPosition {
    latitude: Option<f64>,
    longitude: Option<f64>,
    region: Option<Region>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Region {
    city: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
#[serde(rename_all = "camelCase")]
struct Timezone {
    name: Option<String>,
    offset: Option<i64>,
    abbr: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AirportGate {
    terminal: Option<String>,
    gate: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Times {
    scheduled: Option<LegEpochs>,
    estimated: Option<LegEpochs>,
    real: Option<LegEpochs>,
    historical: Option<Historical>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LegEpochs {
    departure: Option<i64>,
    arrival: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Historical {
    flighttime: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
struct TrailPoint {
    lat: f64,
    lng: f64,
    alt: i32,
    spd: i32,
    ts: i64,
    hd: i32,
}

fn epoch_text(epoch: Option<i64>) -> Option<String> {
    epoch
        .and_then(|e| parse_timestamp(&Value::from(e)))
        .map(|dt| dt.to_rfc3339())
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}

fn airport(raw: Option<Airport>) -> Option<AirportInfo> {
    let raw = raw?;
    let name = non_empty(raw.name)?;
    let (coordinates, city) = match raw.position {
        Some(p) => (
            p.latitude
                .zip(p.longitude)
                .map(|(latitude, longitude)| Coordinates {
                    latitude,
                    longitude,
                }),
            p.region.and_then(|r| non_empty(r.city)),
        ),
        None => (None, None),
    };
    let info = raw.info.unwrap_or_default();
    Some(AirportInfo {
        name,
        icao: non_empty(raw.code.icao),
        iata: non_empty(raw.code.iata),
        city,
        coordinates,
        terminal: non_empty(info.terminal),
        gate: non_empty(info.gate),
        runway: None,
    })
}

fn leg(
    scheduled: Option<i64>,
    estimated: Option<i64>,
    actual: Option<i64>,
    timezone: Option<&Timezone>,
) -> Option<LegTimes> {
    if scheduled.is_none() && estimated.is_none() && actual.is_none() {
        return None;
    }
    Some(LegTimes {
        scheduled: epoch_text(scheduled),
        estimated: epoch_text(estimated),
        actual: epoch_text(actual),
        relative: None,
        timezone: timezone
            .map(|tz| TimezoneInfo {
                short: tz.abbr.clone(),
                long: tz.name.clone(),
                offset: tz.offset.map(|o| o.to_string()),
            })
            .unwrap_or_default(),
    })
}

fn trail_timestamp(point: &TrailPoint) -> Result<DateTime<Utc>> {
    parse_timestamp(&Value::from(point.ts))
        .ok_or_else(|| Error::decode("fr24 trail", format!("timestamp {} out of range", point.ts)))
}

fn to_detail(raw: ClickHandler, fallback_id: &str, urls: &MediaUrls) -> Result<Option<FlightDetail>> {
    // Newest trail point carries the current position.
    let Some(newest) = raw.trail.iter().max_by_key(|p| p.ts).copied() else {
        debug!(id = fallback_id, "No trail in click-handler reply");
        return Ok(None);
    };

    let aircraft = raw.aircraft.unwrap_or_default();
    let images = aircraft
        .images
        .map(|images| {
            images
                .thumbnails
                .into_iter()
                .filter(|image| !image.src.is_empty())
                .map(|image| FlightImage {
                    source: image.copyright,
                    source_url: image.link,
                    url: image.src,
                })
                .collect()
        })
        .unwrap_or_default();

    let airline = raw.airline.and_then(|a| {
        let icao = non_empty(a.code.icao)?;
        Some(AirlineInfo {
            image_url: urls.airline_logo(&icao),
            icao,
            iata: non_empty(a.code.iata),
            name: non_empty(a.name),
        })
    });

    let origin_tz = raw.airport.origin.as_ref().and_then(|a| a.timezone.as_ref());
    let destination_tz = raw
        .airport
        .destination
        .as_ref()
        .and_then(|a| a.timezone.as_ref());
    let t = raw.time.unwrap_or_default();
    let scheduled = t.scheduled.unwrap_or_default();
    let estimated = t.estimated.unwrap_or_default();
    let real = t.real.unwrap_or_default();
    let departure = leg(scheduled.departure, estimated.departure, real.departure, origin_tz);
    let arrival = leg(scheduled.arrival, estimated.arrival, real.arrival, destination_tz);
    let times = (departure.is_some() || arrival.is_some()).then(|| FlightTimes {
        departure,
        arrival,
        duration: t.historical.and_then(|h| non_empty(h.flighttime)),
        delay: None,
    });

    let status = raw.status.unwrap_or_default();
    let (icao, name) = aircraft
        .model
        .map_or((None, None), |m| (non_empty(m.code), non_empty(m.text)));

    Ok(Some(FlightDetail {
        id: non_empty(raw.identification.id).unwrap_or_else(|| fallback_id.to_string()),
        latitude: newest.lat,
        longitude: newest.lng,
        timestamp: Some(trail_timestamp(&newest)?),
        callsign: non_empty(raw.identification.callsign),
        flight_number: non_empty(raw.identification.number.default),
        images,
        route: None,
        altitude: Some(newest.alt),
        squawk_code: None,
        heading: Some(newest.hd),
        ground_speed: Some(newest.spd),
        progress: None,
        source: SourceStation::default(),
        airline,
        origin: airport(raw.airport.origin),
        destination: airport(raw.airport.destination),
        aircraft: AircraftInfo {
            icao,
            name,
            registration: non_empty(aircraft.registration),
            icao24_address: non_empty(aircraft.hex),
            serial_number: non_empty(aircraft.msn),
            age: aircraft.age.filter(|v| !v.is_null()).map(|v| match v {
                Value::String(s) => s,
                other => other.to_string(),
            }),
            ..AircraftInfo::default()
        },
        times,
        on_ground: !status.live || newest.alt <= 0,
        status: non_empty(status.text),
        distance: None,
        fir: None,
        days_of_operation: None,
        seat_map: None,
    }))
}

fn to_positions(trail: Vec<TrailPoint>) -> Result<Vec<PositionSample>> {
    let mut samples = trail
        .into_iter()
        .map(|point| {
            Ok((
                point.ts,
                PositionSample {
                    timestamp: trail_timestamp(&point)?,
                    latitude: point.lat,
                    longitude: point.lng,
                    altitude: point.alt,
                    speed: point.spd,
                    source: None,
                },
            ))
        })
        .collect::<Result<Vec<_>>>()?;
    samples.sort_by_key(|(ts, _)| *ts);
    Ok(samples.into_iter().map(|(_, sample)| sample).collect())
}

#[async_trait]
impl<T: Transport> FlightProvider for Fr24Provider<T> {
    async fn fetch_live(&self, query: &LiveQuery) -> Result<Vec<LiveFlightRecord>> {
        let reply = self
            .transport
            .get(&self.feed_url, &Self::feed_params(query), &[])
            .await?;
        if !reply.is_success() {
            return Err(Error::HttpStatus {
                status: reply.status,
                url: self.feed_url.clone(),
            });
        }
        if query.zoom.is_some() || !query.aircraft_class.is_empty() {
            debug!("Zoom and aircraft class filters are not supported by this feed");
        }

        let records: Vec<_> = decode_feed(&reply.json()?, &self.urls)?
            .into_iter()
            .filter(|record| matches(record, query))
            .collect();
        debug!(count = records.len(), "Decoded fr24 feed");
        Ok(records)
    }

    async fn fetch_detail(&self, id: &str) -> Result<Option<FlightDetail>> {
        let reply = self.click_handler(id).await?;
        if !reply.is_success() || reply.is_empty() {
            debug!(id, status = reply.status, "No detail available");
            return Ok(None);
        }
        let raw: ClickHandler = serde_json::from_slice(&reply.body)?;
        to_detail(raw, id, &self.urls)
    }

    async fn fetch_positions(&self, id: &str) -> Result<Vec<PositionSample>> {
        let reply = self.click_handler(id).await?;
        if !reply.is_success() {
            return Err(Error::HttpStatus {
                status: reply.status,
                url: self.detail_url.clone(),
            });
        }
        let raw: ClickHandler = serde_json::from_slice(&reply.body)?;
        to_positions(raw.trail)
    }
}
