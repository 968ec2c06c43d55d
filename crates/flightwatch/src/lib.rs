//! `flightwatch` - A client for live flight-tracking feeds
//!
//! This library decodes the compact live, detail and position-history
//! payloads of a flight-tracking feed into typed records, follows a selected
//! flight on a polling interval, and enriches whole live snapshots with
//! per-flight detail under a bounded number of concurrent requests.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]
// Large `json!` literals in the decoder tests need deeper macro expansion.
#![recursion_limit = "256"]

pub mod cli;
pub mod config;
pub mod decode;
pub mod enrich;
pub mod error;
pub mod logging;
pub mod model;
pub mod provider;
pub mod tracker;
pub mod transport;

pub use config::Config;
pub use decode::{decode_detail, decode_live, decode_live_entry, decode_positions, MediaUrls};
pub use enrich::{enrich_all, enrich_all_with_chunk_size, DEFAULT_CHUNK_SIZE};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use model::{FlightDetail, InfoSource, LiveFlightRecord, PositionSample};
pub use provider::{FlightProvider, LiveQuery};
pub use tracker::{FlightTracker, Selection, TrackerState};
