//! Live-feed record decoding.

use serde_json::{Map, Value};
use tracing::debug;

use super::layout::{detect_layout, zip};
use super::value::Fields;
use super::MediaUrls;
use crate::error::{Error, Result};
use crate::model::{InfoSource, LiveFlightRecord, RouteEndpoint};

/// Decode the full live-feed response: `[records, metadata...]`.
///
/// # Errors
///
/// Returns a decode error if the response is not an array whose first
/// element is the id-to-record mapping, or if any record is malformed.
pub fn decode_live_response(response: &Value, urls: &MediaUrls) -> Result<Vec<LiveFlightRecord>> {
    let entries = response
        .as_array()
        .and_then(|parts| parts.first())
        .and_then(Value::as_object)
        .ok_or_else(|| Error::decode("live feed response", "expected [records, ...]"))?;
    decode_live(entries, urls)
}

/// Decode a mapping of feed id to positional record.
///
/// Each entry picks its own layout, so one batch may mix standard and
/// estimated-track records. An empty mapping gives an empty sequence.
///
/// # Errors
///
/// Returns a decode error for the first malformed record; no partial batch
/// is returned.
pub fn decode_live(entries: &Map<String, Value>, urls: &MediaUrls) -> Result<Vec<LiveFlightRecord>> {
    let records = entries
        .iter()
        .map(|(id, raw)| decode_live_entry(id, raw, urls))
        .collect::<Result<Vec<_>>>()?;
    debug!(count = records.len(), "Decoded live batch");
    Ok(records)
}

/// Decode one positional record.
///
/// # Errors
///
/// Returns a decode error if the record is not an array, is shorter than its
/// layout, or carries a value of the wrong type in a typed slot.
pub fn decode_live_entry(id: &str, raw: &Value, urls: &MediaUrls) -> Result<LiveFlightRecord> {
    let context = format!("live record {id}");
    let values = raw
        .as_array()
        .ok_or_else(|| Error::decode(&context, "expected a positional array"))?;

    let layout = detect_layout(values);
    let map = zip(&context, layout.keys, values)?;
    let f = Fields::new(&context, &map);

    let image_slug = f.string("imageSlug")?;
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
        heading: f.opt_i32("heading")?,
        source: f.opt_text("source")?.and_then(|tag| InfoSource::from_tag(&tag)),
        registration: f.string("registration")?,
        origin: RouteEndpoint {
            iata: f.string("origin")?,
            time: f.opt_text("actualDeparture")?,
            coordinates: f.lon_lat("originCoordinates")?,
        },
        destination: RouteEndpoint {
            iata: f.string("destination")?,
            time: f.opt_text("estimatedArrival")?,
            coordinates: f.lon_lat("destinationCoordinates")?,
        },
        vertical_speed: f.opt_i32("verticalSpeed")?,
        station: f.opt_text("station")?,
        status: f.opt_text("status")?,
        on_ground: f.flag("onGround"),
        aircraft_status: f.opt_text("aircraftStatus")?,
        squawk: f.opt_text("squawk")?,
        diverted_airport: f.opt_text("divertedAirport")?,
        estimated_distance_remaining: f.opt_f64("estimatedDistanceRemaining")?,
        estimated_time_remaining: f.opt_text("estimatedTimeRemaining")?,
        icao24_address: f.string("icao24BitAddress")?,
        image_url: (!image_slug.is_empty()).then(|| urls.photo(&image_slug)),
        airline_image_url: (!airline.is_empty()).then(|| urls.airline_logo(&airline)),
        airline,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn delta_raw() -> Value {
        json!([
            "DL933", 37.6, -122.4, 1_700_000_000, 35000, "B738", 450, 270, "ADSB", "N123DL", "SFO",
            "JFK", "DAL", 0, "", "", 0, [-122.4, 37.6], [-73.8, 40.6], "", "", "", "", "", null,
            null, null, "A1B2C3"
        ])
    }

    fn estimated_raw() -> Value {
        json!([
            "UA1", 40.0, -100.0, 1_700_000_000, 31000, "B739", 430, 90, "ESTI", "N37501", "DEN",
            "ORD", "UAL", -500, "estimated", "SATE", 0, null, null, "", "7421", "", "abc.jpg", "",
            null, null, null, "A4F2B1"
        ])
    }

    #[test]
    fn test_decode_standard_record() {
        let record = decode_live_entry("abc123", &delta_raw(), &MediaUrls::default()).unwrap();

        assert_eq!(record.id, "abc123");
        assert_eq!(record.flight_number, "DL933");
        assert_eq!(record.origin.iata, "SFO");
        assert_eq!(record.destination.iata, "JFK");
        assert!(!record.on_ground);
        assert_eq!(record.altitude, Some(35000));
        assert_eq!(record.source, Some(InfoSource::Adsb));
        assert_eq!(record.station, None);
        assert_eq!(record.status, None);
        assert_eq!(record.icao24_address, "A1B2C3");
        assert_eq!(record.timestamp.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_decode_reverses_endpoint_coordinates() {
        let record = decode_live_entry("abc123", &delta_raw(), &MediaUrls::default()).unwrap();
        let origin = record.origin.coordinates.unwrap();
        assert!((origin.latitude - 37.6).abs() < f64::EPSILON);
        assert!((origin.longitude - (-122.4)).abs() < f64::EPSILON);
        let destination = record.destination.coordinates.unwrap();
        assert!((destination.latitude - 40.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_decode_estimated_record_remaps_slots() {
        let record = decode_live_entry("est1", &estimated_raw(), &MediaUrls::default()).unwrap();

        assert_eq!(record.station.as_deref(), Some("ESTI"));
        assert_eq!(record.status.as_deref(), Some("estimated"));
        assert_eq!(record.source, Some(InfoSource::Sate));
        assert_eq!(record.vertical_speed, Some(-500));
        assert_eq!(record.squawk.as_deref(), Some("7421"));
    }

    #[test]
    fn test_decode_standard_record_reads_station_and_status_from_default_slots() {
        let mut raw = delta_raw();
        raw[14] = json!("KSFO1");
        raw[15] = json!("live");
        let record = decode_live_entry("abc123", &raw, &MediaUrls::default()).unwrap();
        assert_eq!(record.station.as_deref(), Some("KSFO1"));
        assert_eq!(record.status.as_deref(), Some("live"));
        assert_eq!(record.source, Some(InfoSource::Adsb));
    }

    #[test]
    fn test_image_urls_only_when_slug_and_airline_present() {
        let urls = MediaUrls::default();
        let record = decode_live_entry("abc123", &delta_raw(), &urls).unwrap();
        assert_eq!(record.image_url, None);
        assert_eq!(
            record.airline_image_url.as_deref(),
            Some("https://cdn.radarbox.com/airlines/sq/DAL.png")
        );

        let mut raw = estimated_raw();
        raw[12] = json!("");
        let record = decode_live_entry("est1", &raw, &urls).unwrap();
        assert_eq!(
            record.image_url.as_deref(),
            Some("https://cdn.radarbox.com/photo/abc.jpg")
        );
        assert_eq!(record.airline_image_url, None);
    }

    #[test]
    fn test_blank_numeric_slots_decode_to_none() {
        let mut raw = delta_raw();
        raw[4] = Value::Null;
        raw[6] = json!("");
        raw[7] = json!("");
        let record = decode_live_entry("abc123", &raw, &MediaUrls::default()).unwrap();
        assert_eq!(record.altitude, None);
        assert_eq!(record.ground_speed, None);
        assert_eq!(record.heading, None);
    }

    #[test]
    fn test_on_ground_flag() {
        let mut raw = delta_raw();
        raw[16] = json!(1);
        let record = decode_live_entry("abc123", &raw, &MediaUrls::default()).unwrap();
        assert!(record.on_ground);
    }

    #[test]
    fn test_short_record_fails() {
        let raw = json!(["DL933", 37.6, -122.4]);
        let err = decode_live_entry("abc123", &raw, &MediaUrls::default()).unwrap_err();
        assert!(err.is_decode());
        assert!(err.to_string().contains("abc123"));
    }

    #[test]
    fn test_non_array_record_fails() {
        let err = decode_live_entry("abc123", &json!({"fn": "DL933"}), &MediaUrls::default())
            .unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_mixed_batch_decodes_each_entry_with_its_own_layout() {
        let mut entries = Map::new();
        entries.insert("abc123".to_string(), delta_raw());
        entries.insert("est1".to_string(), estimated_raw());

        let records = decode_live(&entries, &MediaUrls::default()).unwrap();
        assert_eq!(records.len(), 2);

        let delta = records.iter().find(|r| r.id == "abc123").unwrap();
        assert_eq!(delta.source, Some(InfoSource::Adsb));
        let est = records.iter().find(|r| r.id == "est1").unwrap();
        assert_eq!(est.source, Some(InfoSource::Sate));
        assert_eq!(est.station.as_deref(), Some("ESTI"));
    }

    #[test]
    fn test_one_bad_entry_fails_the_batch() {
        let mut entries = Map::new();
        entries.insert("abc123".to_string(), delta_raw());
        entries.insert("bad".to_string(), json!([1, 2]));
        assert!(decode_live(&entries, &MediaUrls::default()).is_err());
    }

    #[test]
    fn test_empty_batch_is_empty() {
        let records = decode_live(&Map::new(), &MediaUrls::default()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_decode_live_response_unwraps_first_element() {
        let response = json!([{ "abc123": delta_raw() }, { "total": 1 }]);
        let records = decode_live_response(&response, &MediaUrls::default()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "abc123");
    }

    #[test]
    fn test_batch_keeps_feed_entry_order() {
        let mut first = delta_raw();
        first[0] = json!("FIRST");
        let mut second = delta_raw();
        second[0] = json!("SECOND");
        let body = format!(r#"[{{"9": {first}, "10": {second}}}]"#);
        let response: Value = serde_json::from_str(&body).unwrap();

        let records = decode_live_response(&response, &MediaUrls::default()).unwrap();
        let order: Vec<_> = records
            .iter()
            .map(|r| (r.id.as_str(), r.flight_number.as_str()))
            .collect();
        assert_eq!(order, [("9", "FIRST"), ("10", "SECOND")]);
    }

    #[test]
    fn test_decode_live_response_rejects_wrong_shape() {
        assert!(decode_live_response(&json!({}), &MediaUrls::default()).is_err());
        assert!(decode_live_response(&json!([]), &MediaUrls::default()).is_err());
    }
}
