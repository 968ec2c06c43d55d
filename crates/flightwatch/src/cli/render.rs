//! Plain-text rendering for command output.

use std::fmt::Write as _;

use crate::model::{FlightDetail, LiveFlightRecord, PositionSample};
use crate::tracker::TrackerState;

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn text_or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

/// Header row for [`live_row`].
#[must_use]
pub fn live_header() -> String {
    format!(
        "{:<12} {:<9} {:<6} {:>9} {:>10} {:>6} {:>4} {:>4}  {}",
        "ID", "FLIGHT", "TYPE", "LAT", "LON", "ALT", "GS", "HDG", "ROUTE"
    )
}

/// One line per live flight.
#[must_use]
pub fn live_row(record: &LiveFlightRecord) -> String {
    let altitude = if record.on_ground {
        "GND".to_string()
    } else {
        or_dash(record.altitude)
    };
    format!(
        "{:<12} {:<9} {:<6} {:>9.4} {:>10.4} {:>6} {:>4} {:>4}  {}-{}",
        record.id,
        text_or_dash(&record.flight_number),
        text_or_dash(&record.model),
        record.latitude,
        record.longitude,
        altitude,
        or_dash(record.ground_speed),
        or_dash(record.heading),
        text_or_dash(&record.origin.iata),
        text_or_dash(&record.destination.iata),
    )
}

/// Multi-line summary of a detail record.
#[must_use]
pub fn detail_summary(detail: &FlightDetail) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", detail.label(), detail.id);

    if let Some(airline) = &detail.airline {
        let _ = writeln!(
            out,
            "  Airline:   {} ({})",
            airline.name.as_deref().unwrap_or(&airline.icao),
            airline.icao
        );
    }
    let from = detail.origin.as_ref().map(|a| a.name.as_str());
    let to = detail.destination.as_ref().map(|a| a.name.as_str());
    if from.is_some() || to.is_some() {
        let _ = writeln!(
            out,
            "  Route:     {} -> {}",
            from.unwrap_or("?"),
            to.unwrap_or("?")
        );
    }
    if let Some(name) = detail.aircraft.name.as_deref().or(detail.aircraft.icao.as_deref()) {
        let _ = writeln!(
            out,
            "  Aircraft:  {name} {}",
            detail.aircraft.registration.as_deref().unwrap_or("")
        );
    }
    let _ = writeln!(
        out,
        "  Position:  {:.4}, {:.4}  alt {}  gs {}  hdg {}",
        detail.latitude,
        detail.longitude,
        or_dash(detail.altitude),
        or_dash(detail.ground_speed),
        or_dash(detail.heading)
    );
    if let Some(status) = &detail.status {
        let _ = writeln!(out, "  Status:    {status}");
    }
    if let Some(progress) = detail.progress {
        let _ = writeln!(out, "  Progress:  {progress:.0}%");
    }
    if let Some(seats) = detail.seat_map.as_ref().map(|s| s.configuration) {
        let _ = writeln!(
            out,
            "  Seats:     {} (F{} J{} W{} Y{})",
            seats.total(),
            seats.first,
            seats.business,
            seats.premium,
            seats.economy
        );
    }
    out
}

/// One line per position sample.
#[must_use]
pub fn position_row(sample: &PositionSample) -> String {
    format!(
        "{}  {:>9.4} {:>10.4} {:>6} {:>4}  {}",
        sample.timestamp.format("%Y-%m-%d %H:%M:%S"),
        sample.latitude,
        sample.longitude,
        sample.altitude,
        sample.speed,
        sample.source.as_deref().unwrap_or("-")
    )
}

/// One line describing the selected flight after a refresh.
#[must_use]
pub fn selection_line(state: &TrackerState) -> String {
    let Some(selection) = &state.selection else {
        return format!("{} flights, none selected", state.live.len());
    };

    let mut line = match &selection.live {
        Some(record) => live_row(record),
        None => format!("{:<12} not in the live feed", selection.id),
    };
    let _ = write!(line, "  [{} positions]", selection.positions.len());
    if state.detail_is_stale() {
        line.push_str(" (detail stale)");
    }
    line
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::decode::{decode_detail, decode_live_entry, MediaUrls};
    use crate::tracker::Selection;

    fn record() -> LiveFlightRecord {
        let raw = json!([
            "DL933", 37.6, -122.4, 1_700_000_000, 35000, "B738", 450, 270, "ADSB", "N123DL", "SFO",
            "JFK", "DAL", 0, "", "", 0, [-122.4, 37.6], [-73.8, 40.6], "", "", "", "", "", null,
            null, null, "A1B2C3"
        ]);
        decode_live_entry("abc123", &raw, &MediaUrls::default()).unwrap()
    }

    #[test]
    fn test_live_row() {
        let row = live_row(&record());
        assert!(row.starts_with("abc123"));
        assert!(row.contains("DL933"));
        assert!(row.contains("35000"));
        assert!(row.ends_with("SFO-JFK"));
    }

    #[test]
    fn test_live_row_on_ground() {
        let mut record = record();
        record.on_ground = true;
        record.heading = None;
        let row = live_row(&record);
        assert!(row.contains("GND"));
        assert!(row.contains(" -"));
    }

    #[test]
    fn test_header_aligns_with_row() {
        assert!(live_header().starts_with("ID "));
        assert!(live_header().ends_with("ROUTE"));
    }

    #[test]
    fn test_detail_summary() {
        let raw = json!({
            "fid": "abc123", "la": 37.6, "lo": -122.4, "fnia": "DL933",
            "alic": "DAL", "alna": "Delta Air Lines", "status": "En route"
        });
        let detail = decode_detail(Some(&raw), &MediaUrls::default())
            .unwrap()
            .unwrap();
        let summary = detail_summary(&detail);
        assert!(summary.starts_with("DL933 (abc123)"));
        assert!(summary.contains("Delta Air Lines (DAL)"));
        assert!(summary.contains("En route"));
        assert!(!summary.contains("Route:"));
    }

    #[test]
    fn test_position_row() {
        let sample = PositionSample {
            timestamp: chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            latitude: 36.9,
            longitude: -121.9,
            altitude: 34000,
            speed: 440,
            source: None,
        };
        let row = position_row(&sample);
        assert!(row.starts_with("2023-11-14 22:13:20"));
        assert!(row.ends_with('-'));
    }

    #[test]
    fn test_selection_line() {
        let mut state = TrackerState {
            live: vec![record()],
            selection: None,
        };
        assert_eq!(selection_line(&state), "1 flights, none selected");

        state.selection = Some(Selection {
            id: "gone".to_string(),
            live: None,
            detail: None,
            positions: Vec::new(),
            detail_stale: true,
        });
        let line = selection_line(&state);
        assert!(line.contains("not in the live feed"));
        assert!(line.ends_with("(detail stale)"));
    }
}
