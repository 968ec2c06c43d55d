//! Command-line interface for flightwatch.
//!
//! This module provides the CLI structure and output formatting for the
//! `fltwatch` binary.

mod commands;
pub mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, DetailCommand, EnrichCommand, LiveCommand, LiveFilters, PositionsCommand,
    TrackCommand,
};

use crate::logging::Verbosity;

/// fltwatch - Follow live flights from the command line
///
/// Queries a flight-tracking feed for live aircraft, per-flight detail and
/// position history, and can follow one flight as it moves.
#[derive(Debug, Parser)]
#[command(name = "fltwatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List flights in the live feed
    Live(LiveCommand),

    /// Show full detail for one flight
    Detail(DetailCommand),

    /// Show the position history of one flight
    Positions(PositionsCommand),

    /// Follow a flight by number, refreshing on an interval
    Track(TrackCommand),

    /// Fetch full detail for every flight in the live feed
    Enrich(EnrichCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.verbose, self.quiet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::AircraftClass;
    use clap::CommandFactory;

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "fltwatch");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_flags() {
        let cli = Cli::try_parse_from(["fltwatch", "-q", "config", "path"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Quiet);

        let cli = Cli::try_parse_from(["fltwatch", "-vv", "config", "path"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Trace);

        let cli = Cli::try_parse_from(["fltwatch", "config", "path"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Normal);
    }

    #[test]
    fn test_parse_live_with_filters() {
        let cli = Cli::try_parse_from([
            "fltwatch",
            "live",
            "--bounds",
            "-10,20.5,-5,30",
            "--zoom",
            "7",
            "--flight",
            "DL933",
            "--class",
            "HG",
            "--class",
            "cargo",
            "--json",
        ])
        .unwrap();

        let Command::Live(live) = cli.command else {
            panic!("expected live command");
        };
        assert!(live.json);
        let query = live.filters.to_query();
        assert_eq!(query.zoom, Some(7));
        assert_eq!(query.flight_number.as_deref(), Some("DL933"));
        assert_eq!(
            query.aircraft_class,
            vec![AircraftClass::Helicopter, AircraftClass::Cargo]
        );
        assert_eq!(query.bounds.unwrap().to_feed_param(), "-5,30,-10,20.5");
    }

    #[test]
    fn test_parse_live_rejects_bad_bounds() {
        assert!(Cli::try_parse_from(["fltwatch", "live", "--bounds", "1,2"]).is_err());
    }

    #[test]
    fn test_parse_detail() {
        let cli = Cli::try_parse_from(["fltwatch", "detail", "abc123"]).unwrap();
        assert!(matches!(cli.command, Command::Detail(ref d) if d.id == "abc123"));
    }

    #[test]
    fn test_parse_positions_json() {
        let cli = Cli::try_parse_from(["fltwatch", "positions", "abc123", "--json"]).unwrap();
        assert!(matches!(cli.command, Command::Positions(ref p) if p.json));
    }

    #[test]
    fn test_parse_track() {
        let cli = Cli::try_parse_from([
            "fltwatch",
            "track",
            "DL933",
            "--interval-ms",
            "2000",
            "--ticks",
            "3",
        ])
        .unwrap();
        let Command::Track(track) = cli.command else {
            panic!("expected track command");
        };
        assert_eq!(track.flight_number, "DL933");
        assert_eq!(track.interval_ms, Some(2000));
        assert_eq!(track.ticks, Some(3));
    }

    #[test]
    fn test_parse_enrich() {
        let cli =
            Cli::try_parse_from(["fltwatch", "enrich", "--airline", "DAL", "--chunk-size", "5"])
                .unwrap();
        let Command::Enrich(enrich) = cli.command else {
            panic!("expected enrich command");
        };
        assert_eq!(enrich.chunk_size, Some(5));
        assert_eq!(enrich.filters.airline.as_deref(), Some("DAL"));
    }

    #[test]
    fn test_parse_with_config() {
        let cli =
            Cli::try_parse_from(["fltwatch", "-c", "/custom/config.toml", "config", "show"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Show { json: false })
        ));
    }
}
