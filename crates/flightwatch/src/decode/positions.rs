//! Position-history decoding.

use serde_json::{Map, Value};

use super::value::{leading_int, parse_timestamp};
use crate::error::{Error, Result};
use crate::model::PositionSample;

const CONTEXT: &str = "position history";

/// Decode a position-history response: `{"pos": {"<epoch secs>": [lat, lon, alt, speed, source]}}`.
///
/// Samples are sorted by numeric timestamp; the mapping's own key order is
/// never trusted. A missing or empty `pos` gives an empty track.
///
/// # Errors
///
/// Returns a decode error if a key is not an epoch, or a sample is not an
/// array with numeric latitude and longitude.
pub fn decode_positions(response: &Value) -> Result<Vec<PositionSample>> {
    let response = response
        .as_object()
        .ok_or_else(|| Error::decode(CONTEXT, "expected an object"))?;

    match response.get("pos") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) if items.is_empty() => Ok(Vec::new()),
        Some(Value::Object(samples)) => decode_samples(samples),
        Some(other) => Err(Error::decode(CONTEXT, format!("unexpected `pos` value {other}"))),
    }
}

fn decode_samples(samples: &Map<String, Value>) -> Result<Vec<PositionSample>> {
    let mut keyed = samples
        .iter()
        .map(|(key, raw)| {
            let epoch = key
                .trim()
                .parse::<i64>()
                .map_err(|_| Error::decode(CONTEXT, format!("non-numeric timestamp key {key:?}")))?;
            decode_sample(epoch, raw).map(|sample| (epoch, sample))
        })
        .collect::<Result<Vec<_>>>()?;

    keyed.sort_by_key(|(epoch, _)| *epoch);
    Ok(keyed.into_iter().map(|(_, sample)| sample).collect())
}

fn decode_sample(epoch: i64, raw: &Value) -> Result<PositionSample> {
    let values = raw
        .as_array()
        .ok_or_else(|| Error::decode(CONTEXT, format!("sample {epoch} is not an array")))?;

    let coordinate = |index: usize, name: &str| {
        values
            .get(index)
            .and_then(Value::as_f64)
            .ok_or_else(|| Error::decode(CONTEXT, format!("sample {epoch} has no numeric {name}")))
    };

    let timestamp = parse_timestamp(&Value::from(epoch))
        .ok_or_else(|| Error::decode(CONTEXT, format!("timestamp {epoch} out of range")))?;

    Ok(PositionSample {
        timestamp,
        latitude: coordinate(0, "latitude")?,
        longitude: coordinate(1, "longitude")?,
        altitude: values.get(2).map_or(0, leading_int),
        speed: values.get(3).map_or(0, leading_int),
        source: values
            .get(4)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_samples_sorted_by_numeric_timestamp() {
        let response = json!({"pos": {
            "1700000100": [37.0, -122.0, "35000", "450", "ADSB"],
            "1700000000": [36.9, -121.9, "34000", "440", "ADSB"]
        }});
        let samples = decode_positions(&response).unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].timestamp.timestamp(), 1_700_000_000);
        assert_eq!(samples[0].altitude, 34000);
        assert_eq!(samples[0].speed, 440);
        assert_eq!(samples[1].timestamp.timestamp(), 1_700_000_100);
        assert_eq!(samples[1].source.as_deref(), Some("ADSB"));
    }

    #[test]
    fn test_sort_is_numeric_not_lexical() {
        // Lexically "999999999" sorts after "1700000000".
        let response = json!({"pos": {
            "1700000000": [1.0, 1.0, 0, 0, ""],
            "999999999": [2.0, 2.0, 0, 0, ""]
        }});
        let samples = decode_positions(&response).unwrap();
        assert_eq!(samples[0].timestamp.timestamp(), 999_999_999);
        assert!(samples
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp));
    }

    #[test]
    fn test_unparsable_altitude_and_speed_become_zero() {
        let response = json!({"pos": {"1700000000": [36.9, -121.9, "", null, "MLAT"]}});
        let samples = decode_positions(&response).unwrap();
        assert_eq!(samples[0].altitude, 0);
        assert_eq!(samples[0].speed, 0);
    }

    #[test]
    fn test_short_sample_defaults_trailing_fields() {
        let response = json!({"pos": {"1700000000": [36.9, -121.9]}});
        let samples = decode_positions(&response).unwrap();
        assert_eq!(samples[0].altitude, 0);
        assert_eq!(samples[0].source, None);
    }

    #[test]
    fn test_missing_or_empty_pos_is_empty_track() {
        assert!(decode_positions(&json!({})).unwrap().is_empty());
        assert!(decode_positions(&json!({"pos": []})).unwrap().is_empty());
        assert!(decode_positions(&json!({"pos": {}})).unwrap().is_empty());
    }

    #[test]
    fn test_bad_key_fails() {
        let response = json!({"pos": {"yesterday": [1.0, 1.0]}});
        assert!(decode_positions(&response).unwrap_err().is_decode());
    }

    #[test]
    fn test_missing_coordinates_fail() {
        let response = json!({"pos": {"1700000000": ["x"]}});
        assert!(decode_positions(&response).is_err());
    }

    #[test]
    fn test_non_object_response_fails() {
        assert!(decode_positions(&json!([1])).is_err());
    }
}
