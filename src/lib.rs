// ABOUTME: Main library entry point for the Strava chain tracker
// ABOUTME: Segments rides into marker-delimited chains and renders Markdown, HTML and JSON reports
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Chain Tracker
//!
//! Scans a cyclist's Strava history for rides tagged with chain markers
//! (⛓️ to open a chain, ⛓️‍💥 to close it), groups the rides between them into
//! chains and reports each chain's rides, running totals and overall
//! distance.
//!
//! ## Architecture
//!
//! - **Providers** (`chain-providers`): Strava client, OAuth refresh, paging
//! - **Segmentation**: marker classification and the chain state machine
//! - **Reports**: view shaping plus Markdown, HTML and JSON emitters
//! - **Config**: environment settings with `.env` support
//! - **Tracker**: the end-to-end pipeline used by the `chain-tracker` binary
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chain_tracker::config::TrackerConfig;
//! use chain_tracker::errors::AppResult;
//! use chain_tracker::tracker::{ActivitySource, ChainTracker, RunOptions};
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = TrackerConfig::from_env()?;
//!     let tracker = ChainTracker::new(config);
//!     let summary = tracker
//!         .run(&ActivitySource::Strava, &RunOptions::default())
//!         .await?;
//!     println!("{} chains", summary.report.overview.total_chains);
//!     Ok(())
//! }
//! ```

pub use chain_core::{constants, errors, models};
pub use chain_providers as providers;

/// Environment configuration
pub mod config;

/// Logging configuration and structured logging setup
pub mod logging;

/// Report shaping and emitters
pub mod reports;

/// Chain segmentation
pub mod segmentation;

/// End-to-end tracker pipeline
pub mod tracker;
