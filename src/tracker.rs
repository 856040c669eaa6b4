// ABOUTME: End-to-end tracker pipeline from activity source to written reports
// ABOUTME: Fetches or loads activities, filters rides, segments chains and renders reports
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tracker pipeline
//!
//! ```text
//! source (Strava or JSON file) → ride filter → segment → ChainReport → ReportWriter
//! ```
//!
//! The network and filesystem steps are async; segmentation and shaping are
//! pure and exposed separately through [`ChainTracker::build_report`].

use std::path::{Path, PathBuf};
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use futures_util::TryStreamExt;
use tokio::fs;
use tracing::{info, warn};

use crate::config::TrackerConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{Activity, SportType};
use crate::providers::activity_iterator::{create_activity_stream, StreamConfig};
use crate::providers::{FitnessProvider, ProviderError, StravaProvider};
use crate::reports::{ChainReport, ReportFormat, ReportWriter};
use crate::segmentation::{segment, OrderingPolicy, Segmentation, SegmenterConfig};

/// Where activities come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivitySource {
    /// Live Strava API using the configured refresh token
    Strava,
    /// A JSON array of activities saved earlier
    File(PathBuf),
}

/// Per-run options that are not part of the environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Report formats to write
    pub formats: Vec<ReportFormat>,
    /// Also save the fetched rides as JSON
    pub save_activities: Option<PathBuf>,
    /// Input ordering policy for segmentation
    pub ordering: OrderingPolicy,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            formats: ReportFormat::DEFAULTS.to_vec(),
            save_activities: None,
            ordering: OrderingPolicy::Sort,
        }
    }
}

/// What a run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Activities obtained from the source
    pub activities_fetched: usize,
    /// Activities left after the ride filter
    pub rides: usize,
    /// The rendered report data
    pub report: ChainReport,
    /// Files written
    pub written: Vec<PathBuf>,
}

/// Whether an activity counts toward chains
///
/// Outdoor rides are always counted; mountain bike and gravel rides are
/// reported by Strava as `Ride` in the legacy type field. Indoor and e-bike
/// rides count only when `include_all_cycling` is set.
#[must_use]
pub fn is_tracked_ride(sport_type: &SportType, include_all_cycling: bool) -> bool {
    match sport_type {
        SportType::Ride | SportType::MountainBike | SportType::GravelRide => true,
        other => include_all_cycling && other.is_cycling(),
    }
}

/// Keep only tracked rides
#[must_use]
pub fn filter_rides(activities: Vec<Activity>, include_all_cycling: bool) -> Vec<Activity> {
    activities
        .into_iter()
        .filter(|a| is_tracked_ride(a.sport_type(), include_all_cycling))
        .collect()
}

/// Read a JSON array of activities
///
/// # Errors
///
/// Returns a storage error if the file cannot be read, or a serialization
/// error if it is not a JSON array of activities.
pub async fn load_activities(path: &Path) -> AppResult<Vec<Activity>> {
    let raw = fs::read_to_string(path).await.map_err(|e| {
        AppError::storage(format!("cannot read {}: {e}", path.display())).with_source(e)
    })?;
    let activities: Vec<Activity> = serde_json::from_str(&raw).map_err(|e| {
        AppError::serialization(format!("{} is not an activity list: {e}", path.display()))
            .with_source(e)
    })?;
    info!(path = %path.display(), count = activities.len(), "Loaded activities from file");
    Ok(activities)
}

/// Write activities as a pretty-printed JSON array
///
/// # Errors
///
/// Returns a storage or serialization error.
pub async fn save_activities(path: &Path, activities: &[Activity]) -> AppResult<()> {
    let json = serde_json::to_string_pretty(activities)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, json).await.map_err(|e| {
        AppError::storage(format!("cannot write {}: {e}", path.display())).with_source(e)
    })?;
    info!(path = %path.display(), count = activities.len(), "Saved activities");
    Ok(())
}

/// Replace each ride's description with the one from its detail record
async fn with_descriptions(
    provider: &dyn FitnessProvider,
    rides: Vec<Activity>,
) -> AppResult<Vec<Activity>> {
    let mut detailed = Vec::with_capacity(rides.len());
    for ride in rides {
        match provider.get_activity(ride.id()).await {
            Ok(detail) => {
                let description = detail.description().map(str::to_owned);
                detailed.push(ride.with_description(description));
            }
            Err(
                e @ (ProviderError::RateLimitExceeded { .. }
                | ProviderError::AuthenticationFailed { .. }
                | ProviderError::NotAuthenticated { .. }),
            ) => return Err(e.into()),
            Err(e) => {
                warn!(activity.id = ride.id(), error = %e, "Could not fetch activity detail");
                detailed.push(ride);
            }
        }
    }
    Ok(detailed)
}

/// Runs the chain tracker pipeline for one configuration
#[derive(Debug, Clone)]
pub struct ChainTracker {
    config: TrackerConfig,
}

impl ChainTracker {
    /// Tracker for the given configuration
    #[must_use]
    pub const fn new(config: TrackerConfig) -> Self {
        Self { config }
    }

    /// The configuration in use
    #[must_use]
    pub const fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Start of the look-back window relative to `now`
    #[must_use]
    pub fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(self.config.lookback_days)
    }

    /// Fetch tracked rides from a provider over the look-back window
    ///
    /// # Errors
    ///
    /// Returns the provider error that ended the listing, or a rate-limit or
    /// authentication failure while fetching details.
    pub async fn fetch_rides(
        &self,
        provider: &dyn FitnessProvider,
        now: DateTime<Utc>,
    ) -> AppResult<(usize, Vec<Activity>)> {
        let after = self.window_start(now);
        info!(
            provider = provider.name(),
            after = %after.format("%Y-%m-%d"),
            "Fetching activities"
        );

        let config = StreamConfig::with_page_size(self.config.page_size)
            .after(after)
            .before(now)
            .with_throttle(StdDuration::from_millis(self.config.page_throttle_ms));
        let activities: Vec<Activity> = create_activity_stream(provider, config)
            .try_collect()
            .await?;
        let fetched = activities.len();

        let rides = filter_rides(activities, self.config.include_all_cycling);
        info!(fetched, rides = rides.len(), "Filtered cycling activities");

        let rides = if self.config.fetch_details {
            with_descriptions(provider, rides).await?
        } else {
            rides
        };
        Ok((fetched, rides))
    }

    /// Segment rides and shape the report; no I/O
    ///
    /// # Errors
    ///
    /// Returns an invalid input error when `ordering` is `Validate` and the
    /// rides are out of order.
    pub fn build_report(
        &self,
        rides: Vec<Activity>,
        ordering: OrderingPolicy,
        now: DateTime<Utc>,
    ) -> AppResult<(ChainReport, Segmentation)> {
        let segmenter_config = SegmenterConfig {
            markers: self.config.markers.clone(),
            ordering,
        };
        let segmentation = segment(rides, &segmenter_config)?;
        segmentation
            .diagnostics
            .log_summary(segmentation.chains.len());

        let report = ChainReport::from_chains(&segmentation.chains, now)
            .with_diagnostics(segmentation.diagnostics.clone());
        Ok((report, segmentation))
    }

    async fn finish_run(
        &self,
        fetched: usize,
        rides: Vec<Activity>,
        options: &RunOptions,
        now: DateTime<Utc>,
    ) -> AppResult<RunSummary> {
        if let Some(path) = &options.save_activities {
            save_activities(path, &rides).await?;
        }

        let ride_count = rides.len();
        let (report, _) = self.build_report(rides, options.ordering, now)?;

        let writer = ReportWriter::new(self.config.output_dir.clone());
        let written = writer.write_all(&report, &options.formats).await?;

        Ok(RunSummary {
            activities_fetched: fetched,
            rides: ride_count,
            report,
            written,
        })
    }

    /// Run against an already authenticated provider
    ///
    /// # Errors
    ///
    /// Returns provider, segmentation or storage errors.
    pub async fn run_with_provider(
        &self,
        provider: &dyn FitnessProvider,
        options: &RunOptions,
        now: DateTime<Utc>,
    ) -> AppResult<RunSummary> {
        let (fetched, rides) = self.fetch_rides(provider, now).await?;
        self.finish_run(fetched, rides, options, now).await
    }

    /// Run from a saved JSON activity list
    ///
    /// The ride filter applies; the look-back window does not.
    ///
    /// # Errors
    ///
    /// Returns file, segmentation or storage errors.
    pub async fn run_offline(
        &self,
        input: &Path,
        options: &RunOptions,
        now: DateTime<Utc>,
    ) -> AppResult<RunSummary> {
        let activities = load_activities(input).await?;
        let fetched = activities.len();
        let rides = filter_rides(activities, self.config.include_all_cycling);
        self.finish_run(fetched, rides, options, now).await
    }

    /// Run the full pipeline from the given source
    ///
    /// # Errors
    ///
    /// Returns configuration errors when Strava credentials are missing, and
    /// any provider, segmentation or storage error.
    pub async fn run(&self, source: &ActivitySource, options: &RunOptions) -> AppResult<RunSummary> {
        let now = Utc::now();
        match source {
            ActivitySource::File(path) => self.run_offline(path, options, now).await,
            ActivitySource::Strava => {
                let provider = StravaProvider::new();
                provider
                    .set_credentials(self.config.strava.credentials()?)
                    .await?;
                provider.refresh_token_if_needed().await?;
                self.run_with_provider(&provider, options, now).await
            }
        }
    }
}
