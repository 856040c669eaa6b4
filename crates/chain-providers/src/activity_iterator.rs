// ABOUTME: Streaming activity iterator over the provider's paged activity listing
// ABOUTME: Fetches a time window page by page and yields activities one at a time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Streaming Activity Iterator
//!
//! Strava lists activities in numbered pages. Rather than collecting every
//! page up front, the stream fetches the next page only once the buffered one
//! has been drained, so at most one page is held in memory.
//!
//! The listing is exhausted when a page comes back shorter than the requested
//! page size.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chain_providers::activity_iterator::{create_activity_stream, StreamConfig};
//! use chain_providers::FitnessProvider;
//! use chrono::{Duration, Utc};
//! use futures_util::StreamExt;
//!
//! async fn recent(provider: &dyn FitnessProvider) {
//!     let config = StreamConfig::with_page_size(100).after(Utc::now() - Duration::days(180));
//!     let mut stream = create_activity_stream(provider, config);
//!     while let Some(result) = stream.next().await {
//!         match result {
//!             Ok(activity) => println!("{}", activity.name()),
//!             Err(e) => eprintln!("{e}"),
//!         }
//!     }
//! }
//! ```

use std::collections::VecDeque;
use std::pin::Pin;
use std::time::Duration;

use async_stream::try_stream;
use chrono::{DateTime, Utc};
use futures_util::Stream;
use tracing::info;

use crate::core::{ActivityQueryParams, FitnessProvider};
use crate::errors::provider::ProviderError;
use crate::models::Activity;

/// Default page size for activity streaming
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Minimum page size to prevent excessive API calls
pub const MIN_PAGE_SIZE: usize = 10;

/// Maximum page size accepted by Strava
pub const MAX_PAGE_SIZE: usize = 200;

/// Configuration for activity streaming behavior
#[derive(Debug, Clone, Copy)]
pub struct StreamConfig {
    /// Number of activities to fetch per page
    pub page_size: usize,
    /// Maximum total activities to fetch (None for unlimited)
    pub max_activities: Option<usize>,
    /// Only activities started after this instant
    pub after: Option<DateTime<Utc>>,
    /// Only activities started before this instant
    pub before: Option<DateTime<Utc>>,
    /// Pause between page requests
    pub throttle: Duration,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_activities: None,
            after: None,
            before: None,
            throttle: Duration::ZERO,
        }
    }
}

impl StreamConfig {
    /// Create configuration with specified page size
    #[must_use]
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE),
            ..Self::default()
        }
    }

    /// Set maximum number of activities to fetch
    #[must_use]
    pub const fn with_max_activities(mut self, max: usize) -> Self {
        self.max_activities = Some(max);
        self
    }

    /// Restrict the listing to activities started after `after`
    #[must_use]
    pub const fn after(mut self, after: DateTime<Utc>) -> Self {
        self.after = Some(after);
        self
    }

    /// Restrict the listing to activities started before `before`
    #[must_use]
    pub const fn before(mut self, before: DateTime<Utc>) -> Self {
        self.before = Some(before);
        self
    }

    /// Wait this long between page requests
    #[must_use]
    pub const fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }
}

/// Type alias for the activity stream returned by `create_activity_stream`
pub type ActivityStream<'a> =
    Pin<Box<dyn Stream<Item = Result<Activity, ProviderError>> + Send + 'a>>;

/// Create a streaming iterator over activities from a provider
///
/// Errors from any page request are yielded once and end the stream.
pub fn create_activity_stream(
    provider: &dyn FitnessProvider,
    config: StreamConfig,
) -> ActivityStream<'_> {
    let page_size = config.page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
    let max_activities = config.max_activities;

    Box::pin(try_stream! {
        let mut buffer: VecDeque<Activity> = VecDeque::new();
        let mut params = ActivityQueryParams {
            after: config.after,
            before: config.before,
            page: 1,
            per_page: page_size,
        };
        let mut yielded_count: usize = 0;
        let mut exhausted = false;

        loop {
            if max_activities.is_some_and(|max| yielded_count >= max) {
                break;
            }

            if let Some(activity) = buffer.pop_front() {
                yielded_count += 1;
                yield activity;
                continue;
            }

            if exhausted {
                break;
            }

            if params.page > 1 && !config.throttle.is_zero() {
                tokio::time::sleep(config.throttle).await;
            }

            let page = provider.get_activities(&params).await?;
            exhausted = page.len() < page_size;
            info!(
                provider = provider.name(),
                page = params.page,
                received = page.len(),
                total = yielded_count + page.len(),
                "Fetched activity page"
            );

            buffer.extend(page);
            params = params.next_page();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_is_clamped() {
        assert_eq!(StreamConfig::with_page_size(1).page_size, MIN_PAGE_SIZE);
        assert_eq!(StreamConfig::with_page_size(1000).page_size, MAX_PAGE_SIZE);
        assert_eq!(StreamConfig::with_page_size(50).page_size, 50);
    }

    #[test]
    fn test_default_has_no_window() {
        let config = StreamConfig::default();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert!(config.after.is_none());
        assert!(config.throttle.is_zero());
    }
}
