//! Positional field layouts for array-encoded feed records.
//!
//! A live record is a fixed-order array. Which name belongs to which slot
//! depends on the record itself: estimated-track entries carry `ESTI` in the
//! slot that normally holds the source tag, and shift `station`, `status`
//! and `source` around. Each layout is a row in [`LIVE_LAYOUTS`]; detection
//! picks the first row whose sentinel matches and [`zip`] does the rest.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Slot names for the standard live-feed layout.
pub(crate) const STANDARD_KEYS: &[&str] = &[
    "flightNumber",
    "latitude",
    "longitude",
    "timestamp",
    "altitude",
    "model",
    "groundSpeed",
    "heading",
    "source",
    "registration",
    "origin",
    "destination",
    "airline",
    "verticalSpeed",
    "station",
    "status",
    "onGround",
    "originCoordinates",
    "destinationCoordinates",
    "aircraftStatus",
    "squawk",
    "estimatedArrival",
    "imageSlug",
    "actualDeparture",
    "divertedAirport",
    "estimatedDistanceRemaining",
    "estimatedTimeRemaining",
    "icao24BitAddress",
];

/// Slot names for estimated-track records: slots 8, 14 and 15 are remapped.
pub(crate) const ESTIMATED_KEYS: &[&str] = &[
    "flightNumber",
    "latitude",
    "longitude",
    "timestamp",
    "altitude",
    "model",
    "groundSpeed",
    "heading",
    "station",
    "registration",
    "origin",
    "destination",
    "airline",
    "verticalSpeed",
    "status",
    "source",
    "onGround",
    "originCoordinates",
    "destinationCoordinates",
    "aircraftStatus",
    "squawk",
    "estimatedArrival",
    "imageSlug",
    "actualDeparture",
    "divertedAirport",
    "estimatedDistanceRemaining",
    "estimatedTimeRemaining",
    "icao24BitAddress",
];

/// One positional layout of a live record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveLayout {
    /// Short name used in logs.
    pub name: &'static str,
    /// Slot index and literal value that select this layout, `None` for the fallback.
    pub sentinel: Option<(usize, &'static str)>,
    /// Slot names in array order.
    pub keys: &'static [&'static str],
}

impl LiveLayout {
    fn matches(&self, values: &[Value]) -> bool {
        match self.sentinel {
            Some((slot, literal)) => values
                .get(slot)
                .and_then(Value::as_str)
                .is_some_and(|v| v == literal),
            None => true,
        }
    }
}

/// Known live layouts, most specific first. The last row must have no sentinel.
pub const LIVE_LAYOUTS: &[LiveLayout] = &[
    LiveLayout {
        name: "estimated",
        sentinel: Some((8, "ESTI")),
        keys: ESTIMATED_KEYS,
    },
    LiveLayout {
        name: "standard",
        sentinel: None,
        keys: STANDARD_KEYS,
    },
];

/// Pick the layout for one raw record.
#[must_use]
pub fn detect_layout(values: &[Value]) -> &'static LiveLayout {
    LIVE_LAYOUTS
        .iter()
        .find(|layout| layout.matches(values))
        .unwrap_or(&LIVE_LAYOUTS[LIVE_LAYOUTS.len() - 1])
}

/// Pair slot names with array values.
///
/// The array must supply at least one value per name. Trailing extra values
/// are ignored.
pub(crate) fn zip(context: &str, keys: &[&str], values: &[Value]) -> Result<Map<String, Value>> {
    if values.len() < keys.len() {
        return Err(Error::decode(
            context,
            format!("expected {} slots, got {}", keys.len(), values.len()),
        ));
    }
    if values.len() > keys.len() {
        tracing::trace!(
            context,
            expected = keys.len(),
            actual = values.len(),
            "Ignoring trailing record slots"
        );
    }

    Ok(keys
        .iter()
        .zip(values)
        .map(|(key, value)| ((*key).to_string(), value.clone()))
        .collect())
}
