// ABOUTME: Chain segmentation: marker classification, state machine and diagnostics
// ABOUTME: Turns a chronological list of activities into delimited, totaled chains
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Chain Segmentation
//!
//! A chain is a run of consecutive activities that begins with an activity
//! whose title (or description) carries the start marker `⛓️` and ends with one
//! carrying the end marker `⛓️‍💥`. Activities outside any chain are ignored.
//!
//! Chains that never see their end marker are still emitted, tagged with a
//! [`ChainStatus`] other than `Complete`, so partial data is surfaced rather
//! than lost.
//!
//! ```rust
//! use chain_tracker::models::{ActivityBuilder, SportType};
//! use chain_tracker::segmentation::{segment, SegmenterConfig};
//! use chrono::{Duration, Utc};
//!
//! let t0 = Utc::now();
//! let rides = vec![
//!     ActivityBuilder::new("1", "⛓️ day one", SportType::Ride, t0, "strava")
//!         .distance_km(10.0)
//!         .build(),
//!     ActivityBuilder::new("2", "day two ⛓️‍💥", SportType::Ride, t0 + Duration::days(1), "strava")
//!         .distance_km(20.5)
//!         .build(),
//! ];
//!
//! let result = segment(rides, &SegmenterConfig::default()).unwrap();
//! assert_eq!(result.chains.len(), 1);
//! assert!(result.chains[0].is_well_formed());
//! assert!((result.chains[0].total_distance_km() - 30.5).abs() < 1e-9);
//! ```

mod chain;
mod classifier;
mod diagnostics;
mod segmenter;

pub use chain::{Chain, ChainEntry, ChainStatus};
pub use classifier::{classify, MarkerConfig, MarkerKind};
pub use diagnostics::{MalformedChain, RejectedActivity, RejectionReason, SegmentationDiagnostics};
pub use segmenter::{
    segment, OrderingPolicy, Segmentation, SegmentationError, Segmenter, SegmenterConfig,
};
