//! RadarBox feed client.

use async_trait::async_trait;
use tracing::debug;

use super::{FlightProvider, LiveQuery};
use crate::config::FeedConfig;
use crate::decode::{decode_detail, decode_live_response, decode_positions, MediaUrls};
use crate::error::{Error, Result};
use crate::model::{FlightDetail, LiveFlightRecord, PositionSample};
use crate::transport::{Query, Reply, Transport};

/// Feed categories switched on for every live query.
const BASELINE_TOGGLES: &[&str] = &[
    "adsb", "adsbsat", "asdi", "ocea", "mlat", "sate", "uat", "hfdl", "esti", "asdex", "flarm",
    "aust", "ground", "onair", "vehicles",
];

/// Client for the RadarBox `/live`, `/live-flight-info` and `/live-route` endpoints.
#[derive(Debug)]
pub struct RadarBoxProvider<T> {
    transport: T,
    base_url: String,
    origin: String,
    urls: MediaUrls,
}

impl<T: Transport> RadarBoxProvider<T> {
    /// Create a provider over `transport` using the endpoints in `feed`.
    pub fn new(transport: T, feed: &FeedConfig) -> Self {
        Self {
            transport,
            base_url: feed.base_url.trim_end_matches('/').to_string(),
            origin: feed.origin.clone(),
            urls: MediaUrls::from_config(feed),
        }
    }

    /// Query parameters for a live snapshot: baseline toggles, then filters.
    #[must_use]
    pub fn live_params(query: &LiveQuery) -> Query {
        let mut params: Query = BASELINE_TOGGLES
            .iter()
            .map(|toggle| ((*toggle).to_string(), "true".to_string()))
            .collect();

        if let Some(bounds) = &query.bounds {
            params.push(("bounds".to_string(), bounds.to_feed_param()));
        }
        if let Some(zoom) = query.zoom {
            params.push(("zoom".to_string(), zoom.to_string()));
        }
        if let Some(flight_number) = &query.flight_number {
            params.push(("fn".to_string(), flight_number.clone()));
        }
        if let Some(airport) = &query.airport {
            params.push(("airport".to_string(), airport.clone()));
        }
        if let Some(airline) = &query.airline {
            params.push(("airline".to_string(), airline.clone()));
        }
        for class in &query.aircraft_class {
            params.push(("class[]".to_string(), class.code().to_string()));
        }
        params
    }

    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<(String, Reply)> {
        let url = format!("{}{path}", self.base_url);
        let reply = self
            .transport
            .get(&url, query, &[("Origin", self.origin.as_str())])
            .await?;
        Ok((url, reply))
    }

    /// Fetch and require a 2xx reply.
    async fn get_json(&self, path: &str, query: &[(String, String)]) -> Result<serde_json::Value> {
        let (url, reply) = self.get(path, query).await?;
        if !reply.is_success() {
            return Err(Error::HttpStatus {
                status: reply.status,
                url,
            });
        }
        reply.json()
    }
}

fn fid(id: &str) -> Query {
    vec![("fid".to_string(), id.to_string())]
}

#[async_trait]
impl<T: Transport> FlightProvider for RadarBoxProvider<T> {
    async fn fetch_live(&self, query: &LiveQuery) -> Result<Vec<LiveFlightRecord>> {
        let response = self.get_json("/live", &Self::live_params(query)).await?;
        decode_live_response(&response, &self.urls)
    }

    async fn fetch_detail(&self, id: &str) -> Result<Option<FlightDetail>> {
        let (_, reply) = self.get("/live-flight-info", &fid(id)).await?;
        if !reply.is_success() || reply.is_empty() {
            debug!(id, status = reply.status, "No detail available");
            return Ok(None);
        }
        decode_detail(Some(&reply.json()?), &self.urls)
    }

    async fn fetch_positions(&self, id: &str) -> Result<Vec<PositionSample>> {
        let response = self.get_json("/live-route", &fid(id)).await?;
        let samples = decode_positions(&response)?;
        debug!(id, count = samples.len(), "Decoded position history");
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::provider::{AircraftClass, Bounds};
    use crate::transport::scripted::ScriptedTransport;

    const LIVE: &str = "https://data.rb24.com/live";
    const INFO: &str = "https://data.rb24.com/live-flight-info";
    const ROUTE: &str = "https://data.rb24.com/live-route";

    fn provider(transport: ScriptedTransport) -> RadarBoxProvider<ScriptedTransport> {
        RadarBoxProvider::new(transport, &FeedConfig::default())
    }

    fn delta_raw() -> serde_json::Value {
        json!([
            "DL933", 37.6, -122.4, 1_700_000_000, 35000, "B738", 450, 270, "ADSB", "N123DL", "SFO",
            "JFK", "DAL", 0, "", "", 0, [-122.4, 37.6], [-73.8, 40.6], "", "", "", "", "", null,
            null, null, "A1B2C3"
        ])
    }

    #[test]
    fn test_live_params_baseline_only() {
        let params = RadarBoxProvider::<ScriptedTransport>::live_params(&LiveQuery::new());
        assert_eq!(params.len(), BASELINE_TOGGLES.len());
        assert!(params.iter().all(|(_, v)| v == "true"));
        assert!(params.iter().any(|(k, _)| k == "esti"));
    }

    #[test]
    fn test_live_params_filters() {
        let query = LiveQuery::new()
            .bounds(Bounds {
                lat1: 1.0,
                lon1: 2.0,
                lat2: 3.0,
                lon2: 4.0,
            })
            .zoom(8)
            .flight_number("DL933")
            .airport("SFO")
            .airline("DAL")
            .class(AircraftClass::Airliner)
            .class(AircraftClass::Helicopter);
        let params = RadarBoxProvider::<ScriptedTransport>::live_params(&query);
        let get = |key: &str| {
            params
                .iter()
                .filter(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
                .collect::<Vec<_>>()
        };

        assert_eq!(get("bounds"), ["3,4,1,2"]);
        assert_eq!(get("zoom"), ["8"]);
        assert_eq!(get("fn"), ["DL933"]);
        assert_eq!(get("airport"), ["SFO"]);
        assert_eq!(get("airline"), ["DAL"]);
        assert_eq!(get("class[]"), ["A", "HG"]);
    }

    #[tokio::test]
    async fn test_fetch_live_decodes_records_and_sends_origin() {
        let transport =
            ScriptedTransport::new().reply_json(LIVE, 200, &json!([{ "abc123": delta_raw() }, {}]));
        let provider = provider(transport);

        let records = provider
            .fetch_live(&LiveQuery::new().flight_number("DL933"))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].flight_number, "DL933");

        let calls = provider.transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].param("fn"), Some("DL933"));
        assert_eq!(
            calls[0].headers,
            vec![("Origin".to_string(), "https://www.radarbox.com".to_string())]
        );
    }

    #[tokio::test]
    async fn test_fetch_live_non_success_is_error() {
        let transport = ScriptedTransport::new().reply(LIVE, 503, Vec::new());
        let err = provider(transport)
            .fetch_live(&LiveQuery::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::HttpStatus { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_fetch_live_transport_failure_propagates() {
        let transport = ScriptedTransport::new().fail(LIVE);
        let err = provider(transport)
            .fetch_live(&LiveQuery::new())
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_fetch_detail_absent_on_status_or_empty_body() {
        let transport = ScriptedTransport::new().reply(INFO, 404, b"not found".to_vec());
        assert!(provider(transport).fetch_detail("x").await.unwrap().is_none());

        let transport = ScriptedTransport::new().reply(INFO, 200, Vec::new());
        assert!(provider(transport).fetch_detail("x").await.unwrap().is_none());

        let transport = ScriptedTransport::new().reply(INFO, 200, b"null".to_vec());
        assert!(provider(transport).fetch_detail("x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fetch_detail_decodes_and_passes_fid() {
        let transport = ScriptedTransport::new().reply_json(
            INFO,
            200,
            &json!({"fid": "abc123", "la": 37.6, "lo": -122.4, "fnia": "DL933", "phs": []}),
        );
        let provider = provider(transport);
        let detail = provider.fetch_detail("abc123").await.unwrap().unwrap();
        assert_eq!(detail.id, "abc123");
        assert_eq!(detail.flight_number.as_deref(), Some("DL933"));
        assert_eq!(provider.transport.calls()[0].param("fid"), Some("abc123"));
    }

    #[tokio::test]
    async fn test_fetch_detail_transport_failure_propagates() {
        let transport = ScriptedTransport::new().fail(INFO);
        assert!(provider(transport).fetch_detail("x").await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_positions_sorted() {
        let transport = ScriptedTransport::new().reply_json(
            ROUTE,
            200,
            &json!({"pos": {
                "1700000100": [37.0, -122.0, "35000", "450", "ADSB"],
                "1700000000": [36.9, -121.9, "34000", "440", "ADSB"]
            }}),
        );
        let samples = provider(transport).fetch_positions("abc123").await.unwrap();
        assert_eq!(samples[0].timestamp.timestamp(), 1_700_000_000);
        assert_eq!(samples.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_positions_non_success_is_error() {
        let transport = ScriptedTransport::new().reply(ROUTE, 500, Vec::new());
        let err = provider(transport).fetch_positions("x").await.unwrap_err();
        assert!(err.is_transport());
    }
}
