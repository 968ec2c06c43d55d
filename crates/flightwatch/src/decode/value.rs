//! Typed accessors over a decoded JSON object.
//!
//! The feed mixes numbers, numeric strings and `""` blanks in the same slots,
//! so every accessor states which of those it tolerates. Anything else is a
//! shape surprise and fails the decode.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::model::Coordinates;

/// Epoch values at or above this are milliseconds, below are seconds.
const EPOCH_MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// Named view over one raw record.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Fields<'a> {
    context: &'a str,
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(context: &'a str, map: &'a Map<String, Value>) -> Self {
        Self { context, map }
    }

    pub(crate) fn error(&self, key: &str, message: impl std::fmt::Display) -> Error {
        Error::decode(self.context, format!("field `{key}`: {message}"))
    }

    /// The raw value, treating JSON `null` as missing.
    pub(crate) fn raw(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    /// Whether the value is truthy: present, not blank, not zero, not false.
    pub(crate) fn is_present(&self, key: &str) -> bool {
        self.raw(key).is_some_and(is_truthy)
    }

    pub(crate) fn f64(&self, key: &str) -> Result<f64> {
        self.opt_f64(key)?
            .ok_or_else(|| self.error(key, "missing required number"))
    }

    pub(crate) fn opt_f64(&self, key: &str) -> Result<Option<f64>> {
        match self.raw(key) {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64()),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| self.error(key, format!("expected a number, got {s:?}"))),
            Some(other) => Err(self.error(key, format!("expected a number, got {other}"))),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn opt_i32(&self, key: &str) -> Result<Option<i32>> {
        Ok(self.opt_f64(key)?.map(|v| v.round() as i32))
    }

    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn opt_i64(&self, key: &str) -> Result<Option<i64>> {
        Ok(self.opt_f64(key)?.map(|v| v.round() as i64))
    }

    /// A string slot; `null` or missing reads as empty.
    pub(crate) fn string(&self, key: &str) -> Result<String> {
        match self.raw(key) {
            None => Ok(String::new()),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(self.error(key, format!("expected a string, got {other}"))),
        }
    }

    /// A free-text slot; numbers are rendered, blanks read as `None`.
    pub(crate) fn opt_text(&self, key: &str) -> Result<Option<String>> {
        match self.raw(key) {
            None => Ok(None),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(other) => Err(self.error(key, format!("expected text, got {other}"))),
        }
    }

    /// A boolean carried as `true`/`false` or `1`/`0`.
    pub(crate) fn flag(&self, key: &str) -> bool {
        self.is_present(key)
    }

    /// A `[longitude, latitude]` pair, reversed into named coordinates.
    pub(crate) fn lon_lat(&self, key: &str) -> Result<Option<Coordinates>> {
        match self.raw(key) {
            None => Ok(None),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(Value::Array(pair)) if pair.is_empty() => Ok(None),
            Some(Value::Array(pair)) => match (pair.first(), pair.get(1)) {
                (Some(Value::Number(lon)), Some(Value::Number(lat))) => Ok(lon
                    .as_f64()
                    .zip(lat.as_f64())
                    .map(|(longitude, latitude)| Coordinates {
                        latitude,
                        longitude,
                    })),
                _ => Err(self.error(key, "expected a [lon, lat] pair")),
            },
            Some(other) => Err(self.error(key, format!("expected a [lon, lat] pair, got {other}"))),
        }
    }

    /// Two separate latitude/longitude fields combined.
    pub(crate) fn lat_lon_pair(&self, lat_key: &str, lon_key: &str) -> Result<Option<Coordinates>> {
        Ok(self
            .opt_f64(lat_key)?
            .zip(self.opt_f64(lon_key)?)
            .map(|(latitude, longitude)| Coordinates {
                latitude,
                longitude,
            }))
    }

    pub(crate) fn timestamp(&self, key: &str) -> Result<DateTime<Utc>> {
        self.opt_timestamp(key)?
            .ok_or_else(|| self.error(key, "missing required timestamp"))
    }

    pub(crate) fn opt_timestamp(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        match self.raw(key) {
            None => Ok(None),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(value) => parse_timestamp(value)
                .map(Some)
                .ok_or_else(|| self.error(key, format!("unrecognised timestamp {value}"))),
        }
    }
}

/// Parse an epoch (seconds or milliseconds) or ISO-8601 timestamp.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .and_then(from_epoch),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(epoch) = s.parse::<i64>() {
                return from_epoch(epoch);
            }
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                        .ok()
                        .map(|naive| Utc.from_utc_datetime(&naive))
                })
        }
        _ => None,
    }
}

fn from_epoch(epoch: i64) -> Option<DateTime<Utc>> {
    if epoch.abs() >= EPOCH_MILLIS_THRESHOLD {
        DateTime::from_timestamp_millis(epoch)
    } else {
        DateTime::from_timestamp(epoch, 0)
    }
}

/// Leading integer of a number or string, 0 when there is none.
///
/// `"35000"` and `35000.4` both give 35000, `"12ft"` gives 12, `"n/a"` gives 0.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn leading_int(value: &Value) -> i32 {
    match value {
        Value::Number(n) => n.as_f64().map_or(0, |f| f.trunc() as i32),
        Value::String(s) => {
            let s = s.trim_start();
            let (sign, digits) = match s.strip_prefix('-') {
                Some(rest) => (-1, rest),
                None => (1, s.strip_prefix('+').unwrap_or(s)),
            };
            let end = digits
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(digits.len());
            digits[..end].parse::<i32>().map_or(0, |n| sign * n)
        }
        _ => 0,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
