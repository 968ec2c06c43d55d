//! Flight-data providers.
//!
//! A provider answers three questions about the feed: what is flying now,
//! what is known about one flight, and where has it been. [`RadarBoxProvider`]
//! is the primary implementation; [`Fr24Provider`] speaks the FlightRadar24
//! schema behind the same trait.

mod fr24;
mod query;
mod radarbox;

use std::sync::Arc;

use async_trait::async_trait;

pub use fr24::Fr24Provider;
pub use query::{AircraftClass, Bounds, LiveQuery};
pub use radarbox::RadarBoxProvider;

use crate::config::{Config, ProviderKind};
use crate::error::Result;
use crate::model::{FlightDetail, LiveFlightRecord, PositionSample};
use crate::transport::HttpTransport;

/// Source of live snapshots, flight details and position histories.
#[async_trait]
pub trait FlightProvider: Send + Sync {
    /// Fetch one live snapshot matching `query`.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, non-2xx replies and malformed records.
    async fn fetch_live(&self, query: &LiveQuery) -> Result<Vec<LiveFlightRecord>>;

    /// Fetch the full detail record for one flight.
    ///
    /// Returns `Ok(None)` when the feed cannot currently resolve the flight
    /// (non-2xx status or empty body).
    ///
    /// # Errors
    ///
    /// Fails on transport errors and malformed records.
    async fn fetch_detail(&self, id: &str) -> Result<Option<FlightDetail>>;

    /// Fetch the position history for one flight, oldest first.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, non-2xx replies and malformed samples.
    async fn fetch_positions(&self, id: &str) -> Result<Vec<PositionSample>>;
}

#[async_trait]
impl<P: FlightProvider + ?Sized> FlightProvider for Arc<P> {
    async fn fetch_live(&self, query: &LiveQuery) -> Result<Vec<LiveFlightRecord>> {
        (**self).fetch_live(query).await
    }

    async fn fetch_detail(&self, id: &str) -> Result<Option<FlightDetail>> {
        (**self).fetch_detail(id).await
    }

    async fn fetch_positions(&self, id: &str) -> Result<Vec<PositionSample>> {
        (**self).fetch_positions(id).await
    }
}

#[async_trait]
impl<P: FlightProvider + ?Sized> FlightProvider for Box<P> {
    async fn fetch_live(&self, query: &LiveQuery) -> Result<Vec<LiveFlightRecord>> {
        (**self).fetch_live(query).await
    }

    async fn fetch_detail(&self, id: &str) -> Result<Option<FlightDetail>> {
        (**self).fetch_detail(id).await
    }

    async fn fetch_positions(&self, id: &str) -> Result<Vec<PositionSample>> {
        (**self).fetch_positions(id).await
    }
}

/// Build the configured provider over a real HTTP transport.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub fn from_config(config: &Config) -> Result<Arc<dyn FlightProvider>> {
    let transport = HttpTransport::new(config)?;
    Ok(match config.feed.provider {
        ProviderKind::Radarbox => Arc::new(RadarBoxProvider::new(transport, &config.feed)),
        ProviderKind::Fr24 => Arc::new(Fr24Provider::new(transport, &config.feed)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_builds_each_provider() {
        let mut config = Config::default();
        assert!(from_config(&config).is_ok());

        config.feed.provider = ProviderKind::Fr24;
        assert!(from_config(&config).is_ok());
    }
}
