//! Bulk detail enrichment.
//!
//! Hydrates a live set with full detail records, a fixed-size chunk at a
//! time: every request in a chunk runs concurrently, chunks run one after
//! another, so at most `chunk_size` detail requests are ever in flight.

use futures::future::join_all;
use tracing::{debug, trace, warn};

use crate::config::DEFAULT_ENRICH_CHUNK_SIZE;
use crate::model::{FlightDetail, LiveFlightRecord};
use crate::provider::FlightProvider;

/// Number of detail requests in flight per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = DEFAULT_ENRICH_CHUNK_SIZE;

/// Fetch detail for every flight, [`DEFAULT_CHUNK_SIZE`] at a time.
///
/// Flights without detail, and flights whose detail fetch failed, are left
/// out. The output order is not tied to the input order.
pub async fn enrich_all<P>(provider: &P, flights: &[LiveFlightRecord]) -> Vec<FlightDetail>
where
    P: FlightProvider + ?Sized,
{
    enrich_all_with_chunk_size(provider, flights, DEFAULT_CHUNK_SIZE).await
}

/// [`enrich_all`] with an explicit chunk size. A size of 0 is treated as 1.
pub async fn enrich_all_with_chunk_size<P>(
    provider: &P,
    flights: &[LiveFlightRecord],
    chunk_size: usize,
) -> Vec<FlightDetail>
where
    P: FlightProvider + ?Sized,
{
    let chunk_size = chunk_size.max(1);
    let mut details = Vec::with_capacity(flights.len());
    let mut dropped = 0usize;

    for (index, chunk) in flights.chunks(chunk_size).enumerate() {
        trace!(chunk = index, size = chunk.len(), "Enriching chunk");
        let results = join_all(chunk.iter().map(|flight| provider.fetch_detail(&flight.id))).await;

        for (flight, result) in chunk.iter().zip(results) {
            match result {
                Ok(Some(detail)) => details.push(detail),
                Ok(None) => dropped += 1,
                Err(e) => {
                    warn!(id = %flight.id, error = %e, "Detail fetch failed during enrichment");
                    dropped += 1;
                }
            }
        }
    }

    debug!(
        requested = flights.len(),
        enriched = details.len(),
        dropped,
        "Enrichment finished"
    );
    details
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::decode::{decode_detail, decode_live_entry, MediaUrls};
    use crate::error::{Error, Result};
    use crate::model::PositionSample;
    use crate::provider::LiveQuery;

    fn flights(n: usize) -> Vec<LiveFlightRecord> {
        (0..n)
            .map(|i| {
                let raw = json!([
                    format!("XX{i}"), 1.0, 2.0, 1_700_000_000, null, "", "", "", "", "", "", "",
                    "", "", "", "", 0, null, null, "", "", "", "", "", null, null, null, ""
                ]);
                decode_live_entry(&format!("f{i}"), &raw, &MediaUrls::default()).unwrap()
            })
            .collect()
    }

    /// Tracks in-flight detail requests and which ids are missing or broken.
    #[derive(Default)]
    struct CountingProvider {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
        absent: Vec<String>,
        failing: Vec<String>,
        order: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl FlightProvider for CountingProvider {
        async fn fetch_live(&self, _query: &LiveQuery) -> Result<Vec<LiveFlightRecord>> {
            Ok(Vec::new())
        }

        async fn fetch_detail(&self, id: &str) -> Result<Option<FlightDetail>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            self.order.lock().unwrap().push(id.to_string());

            tokio::time::sleep(Duration::from_millis(100)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.failing.iter().any(|f| f == id) {
                return Err(Error::transport("mock://detail", "reset"));
            }
            if self.absent.iter().any(|a| a == id) {
                return Ok(None);
            }
            let raw = json!({"fid": id, "la": 1.0, "lo": 2.0});
            decode_detail(Some(&raw), &MediaUrls::default())
        }

        async fn fetch_positions(&self, _id: &str) -> Result<Vec<PositionSample>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_at_most_ten_requests_in_flight() {
        let provider = CountingProvider::default();
        let details = enrich_all(&provider, &flights(25)).await;

        assert_eq!(details.len(), 25);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 25);
        assert_eq!(provider.peak.load(Ordering::SeqCst), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_chunks_run_sequentially() {
        let provider = CountingProvider::default();
        let start = tokio::time::Instant::now();
        enrich_all(&provider, &flights(25)).await;

        // ceil(25 / 10) phases of 100ms each
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(300));
        assert!(elapsed < Duration::from_millis(400));

        let order = provider.order.lock().unwrap();
        assert!(order[..10]
            .iter()
            .all(|id| id[1..].parse::<usize>().unwrap() < 10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_absent_and_failed_details_are_dropped() {
        crate::logging::init_test_logging();
        let provider = CountingProvider {
            absent: vec!["f1".to_string()],
            failing: vec!["f3".to_string()],
            ..CountingProvider::default()
        };
        let details = enrich_all(&provider, &flights(5)).await;

        let mut ids: Vec<_> = details.iter().map(|d| d.id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, ["f0", "f2", "f4"]);
    }

    #[tokio::test]
    async fn test_empty_live_set() {
        let provider = CountingProvider::default();
        assert!(enrich_all(&provider, &[]).await.is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_chunk_size_and_zero() {
        let provider = CountingProvider::default();
        enrich_all_with_chunk_size(&provider, &flights(7), 3).await;
        assert_eq!(provider.peak.load(Ordering::SeqCst), 3);

        let provider = CountingProvider::default();
        let start = tokio::time::Instant::now();
        let details = enrich_all_with_chunk_size(&provider, &flights(3), 0).await;
        assert_eq!(details.len(), 3);
        assert_eq!(provider.peak.load(Ordering::SeqCst), 1);
        assert!(start.elapsed() >= Duration::from_millis(300));
    }
}
