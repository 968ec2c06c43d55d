//! `fltwatch` - CLI for flightwatch
//!
//! This binary provides the command-line interface for querying a live
//! flight-tracking feed and following individual flights.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use flightwatch::cli::render;
use flightwatch::cli::{
    Cli, Command, ConfigCommand, DetailCommand, EnrichCommand, LiveCommand, PositionsCommand,
    TrackCommand,
};
use flightwatch::provider::{self, FlightProvider};
use flightwatch::{enrich_all_with_chunk_size, init_logging, Config, FlightTracker};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Live(cmd) => handle_live(&config, &cmd).await,
        Command::Detail(cmd) => handle_detail(&config, &cmd).await,
        Command::Positions(cmd) => handle_positions(&config, &cmd).await,
        Command::Track(cmd) => handle_track(&config, &cmd).await,
        Command::Enrich(cmd) => handle_enrich(&config, &cmd).await,
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn build_provider(config: &Config) -> anyhow::Result<Arc<dyn FlightProvider>> {
    provider::from_config(config).context("failed to build feed provider")
}

async fn handle_live(config: &Config, cmd: &LiveCommand) -> anyhow::Result<()> {
    let provider = build_provider(config)?;
    let flights = provider.fetch_live(&cmd.filters.to_query()).await?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&flights)?);
        return Ok(());
    }
    if flights.is_empty() {
        println!("No matching flights.");
        return Ok(());
    }

    println!("{}", render::live_header());
    for flight in &flights {
        println!("{}", render::live_row(flight));
    }
    println!();
    println!("{} flights", flights.len());
    Ok(())
}

async fn handle_detail(config: &Config, cmd: &DetailCommand) -> anyhow::Result<()> {
    let provider = build_provider(config)?;
    let detail = provider.fetch_detail(&cmd.id).await?;

    match (detail, cmd.json) {
        (Some(detail), true) => println!("{}", serde_json::to_string_pretty(&detail)?),
        (Some(detail), false) => print!("{}", render::detail_summary(&detail)),
        (None, true) => println!("null"),
        (None, false) => println!("No detail available for {}.", cmd.id),
    }
    Ok(())
}

async fn handle_positions(config: &Config, cmd: &PositionsCommand) -> anyhow::Result<()> {
    let provider = build_provider(config)?;
    let positions = provider.fetch_positions(&cmd.id).await?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&positions)?);
        return Ok(());
    }
    if positions.is_empty() {
        println!("No position history for {}.", cmd.id);
        return Ok(());
    }
    for sample in &positions {
        println!("{}", render::position_row(sample));
    }
    Ok(())
}

async fn handle_track(config: &Config, cmd: &TrackCommand) -> anyhow::Result<()> {
    let provider = build_provider(config)?;
    let Some(tracker) = FlightTracker::find_by_flight_number(provider, &cmd.flight_number).await?
    else {
        println!("No matching flights for {}.", cmd.flight_number);
        return Ok(());
    };

    let state = tracker.state();
    if let Some(detail) = state.selection.as_ref().and_then(|s| s.detail.as_ref()) {
        print!("{}", render::detail_summary(detail));
    }
    println!("{}", render::selection_line(&state));

    let interval = cmd
        .interval_ms
        .map_or_else(|| config.poll_interval(), Duration::from_millis);
    let mut updates = tracker.subscribe();
    tracker.start_polling(interval);

    let mut seen = 0usize;
    loop {
        if cmd.ticks.is_some_and(|ticks| seen >= ticks) {
            break;
        }
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                println!("{}", render::selection_line(&state));
                seen += 1;
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        }
    }

    tracker.stop_polling();
    Ok(())
}

async fn handle_enrich(config: &Config, cmd: &EnrichCommand) -> anyhow::Result<()> {
    let provider = build_provider(config)?;
    let flights = provider.fetch_live(&cmd.filters.to_query()).await?;
    if flights.is_empty() && !cmd.json {
        println!("No matching flights.");
        return Ok(());
    }

    let chunk_size = cmd.chunk_size.unwrap_or(config.enrichment.chunk_size);
    let details = enrich_all_with_chunk_size(&provider, &flights, chunk_size).await;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&details)?);
        return Ok(());
    }
    for detail in &details {
        print!("{}", render::detail_summary(detail));
    }
    println!();
    println!("Enriched {} of {} flights", details.len(), flights.len());
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Feed]");
                println!("  Provider:           {}", config.feed.provider);
                println!("  Base URL:           {}", config.feed.base_url);
                println!("  Origin:             {}", config.feed.origin);
                println!("  FR24 feed URL:      {}", config.feed.fr24_feed_url);
                println!("  FR24 detail URL:    {}", config.feed.fr24_detail_url);
                println!();
                println!("[HTTP]");
                println!("  Timeout (secs):     {}", config.http.timeout_secs);
                println!("  User agent:         {}", config.http.user_agent);
                println!();
                println!("[Polling]");
                println!("  Interval (ms):      {}", config.polling.interval_ms);
                println!();
                println!("[Enrichment]");
                println!("  Chunk size:         {}", config.enrichment.chunk_size);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
