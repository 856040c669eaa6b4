// ABOUTME: Command-line entry point for the Strava chain tracker
// ABOUTME: Loads configuration, applies flag overrides and runs the report pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Usage: `chain-tracker [--days N] [--format markdown|html|json]... [--input FILE]`

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chain_tracker::config::TrackerConfig;
use chain_tracker::errors::AppError;
use chain_tracker::logging;
use chain_tracker::providers::initialize_shared_client;
use chain_tracker::reports::ReportFormat;
use chain_tracker::segmentation::OrderingPolicy;
use chain_tracker::tracker::{ActivitySource, ChainTracker, RunOptions, RunSummary};
use clap::Parser;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "chain-tracker")]
#[command(version)]
#[command(about = "Find ⛓️ / ⛓️‍💥 ride chains in your Strava history and report them")]
struct Cli {
    /// Look-back window in days
    #[arg(long, value_name = "N")]
    days: Option<i64>,

    /// Directory the reports are written to
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Report format to write; repeat for several (default: markdown and html)
    #[arg(long = "format", value_enum, value_name = "FORMAT")]
    formats: Vec<ReportFormat>,

    /// Read activities from a JSON file instead of Strava
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Save the rides used for this run as JSON
    #[arg(long, value_name = "FILE")]
    save_activities: Option<PathBuf>,

    /// Marker that opens a chain
    #[arg(long)]
    start_marker: Option<String>,

    /// Marker that closes a chain
    #[arg(long)]
    end_marker: Option<String>,

    /// Only look for markers in activity names
    #[arg(long)]
    no_description: bool,

    /// Count indoor and e-bike rides too
    #[arg(long)]
    all_cycling: bool,

    /// Fetch each ride's detail record to read its description
    #[arg(long)]
    fetch_details: bool,

    /// How out-of-order input is handled
    #[arg(long, value_enum, default_value_t = OrderingPolicy::Sort)]
    ordering: OrderingPolicy,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut TrackerConfig) {
        if let Some(days) = self.days {
            config.lookback_days = days;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir.clone_from(dir);
        }
        if let Some(marker) = &self.start_marker {
            config.markers.start_marker.clone_from(marker);
        }
        if let Some(marker) = &self.end_marker {
            config.markers.end_marker.clone_from(marker);
        }
        if self.no_description {
            config.markers.search_description = false;
        }
        if self.all_cycling {
            config.include_all_cycling = true;
        }
        if self.fetch_details {
            config.fetch_details = true;
        }
    }

    fn run_options(&self) -> RunOptions {
        let formats = if self.formats.is_empty() {
            ReportFormat::DEFAULTS.to_vec()
        } else {
            self.formats.clone()
        };
        RunOptions {
            formats,
            save_activities: self.save_activities.clone(),
            ordering: self.ordering,
        }
    }

    fn source(&self) -> ActivitySource {
        self.input
            .clone()
            .map_or(ActivitySource::Strava, ActivitySource::File)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_from_env(cli.verbose.then_some("debug")) {
        eprintln!("Failed to initialize logging: {e}");
    }

    match run(&cli).await {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Chain tracker failed: {e:#}");
            eprintln!("Error: {e:#}");
            let code = e
                .downcast_ref::<AppError>()
                .map_or(1, |app| app.code.exit_code());
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

async fn run(cli: &Cli) -> Result<RunSummary> {
    let mut config = TrackerConfig::from_env().context("loading configuration")?;
    cli.apply_overrides(&mut config);
    config.validate().context("validating command-line overrides")?;
    config.log_summary();
    initialize_shared_client(config.http_timeout_secs, config.http_connect_timeout_secs);

    let source = cli.source();
    info!(source = ?source, "Starting chain tracker run");

    let tracker = ChainTracker::new(config);
    let summary = tracker
        .run(&source, &cli.run_options())
        .await
        .context("chain tracker run")?;
    Ok(summary)
}

fn print_summary(summary: &RunSummary) {
    let overview = &summary.report.overview;
    println!(
        "Found {} chain(s) across {} ride(s) ({} fetched), {} km in total",
        overview.total_chains, summary.rides, summary.activities_fetched, overview.total_distance
    );
    if overview.incomplete_chains > 0 {
        println!("{} chain(s) are incomplete", overview.incomplete_chains);
    }
    if let Some(longest) = &overview.longest_chain {
        println!("Longest chain: #{} with {} km", longest.ordinal, longest.distance);
    }
    for path in &summary.written {
        println!("Wrote {}", path.display());
    }
}
