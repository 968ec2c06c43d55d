//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::provider::{AircraftClass, Bounds, LiveQuery};

/// Live-feed filters shared by `live` and `enrich`.
#[derive(Debug, Clone, Default, Args)]
pub struct LiveFilters {
    /// Bounding box as lat1,lon1,lat2,lon2
    #[arg(long, value_name = "LAT1,LON1,LAT2,LON2", allow_hyphen_values = true)]
    pub bounds: Option<Bounds>,

    /// Map zoom level
    #[arg(long)]
    pub zoom: Option<u8>,

    /// Flight number (e.g. DL933)
    #[arg(short, long = "flight")]
    pub flight_number: Option<String>,

    /// Airport code
    #[arg(long)]
    pub airport: Option<String>,

    /// Airline code
    #[arg(long)]
    pub airline: Option<String>,

    /// Aircraft class: A, AC, B, G, HG, M (repeatable)
    #[arg(long = "class", value_name = "CLASS")]
    pub classes: Vec<AircraftClass>,
}

impl LiveFilters {
    /// Build the feed query.
    #[must_use]
    pub fn to_query(&self) -> LiveQuery {
        let mut query = LiveQuery {
            bounds: self.bounds,
            zoom: self.zoom,
            flight_number: self.flight_number.clone(),
            airport: self.airport.clone(),
            airline: self.airline.clone(),
            aircraft_class: Vec::new(),
        };
        for class in &self.classes {
            query = query.class(*class);
        }
        query
    }
}

/// `live` command arguments.
#[derive(Debug, Args)]
pub struct LiveCommand {
    /// Live-feed filters
    #[command(flatten)]
    pub filters: LiveFilters,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// `detail` command arguments.
#[derive(Debug, Args)]
pub struct DetailCommand {
    /// Feed id of the flight
    pub id: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// `positions` command arguments.
#[derive(Debug, Args)]
pub struct PositionsCommand {
    /// Feed id of the flight
    pub id: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// `track` command arguments.
#[derive(Debug, Args)]
pub struct TrackCommand {
    /// Flight number to follow
    pub flight_number: String,

    /// Poll interval in milliseconds (defaults to the configured interval)
    #[arg(short, long)]
    pub interval_ms: Option<u64>,

    /// Stop after this many refreshes (runs until Ctrl-C if omitted)
    #[arg(short, long)]
    pub ticks: Option<usize>,
}

/// `enrich` command arguments.
#[derive(Debug, Args)]
pub struct EnrichCommand {
    /// Live-feed filters
    #[command(flatten)]
    pub filters: LiveFilters,

    /// Detail requests per chunk (defaults to the configured size)
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
