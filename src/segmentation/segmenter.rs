// ABOUTME: Two-state chain segmentation machine (Outside / InChain) over ordered activities
// ABOUTME: Supports one-shot segmentation of a list and incremental page-by-page feeding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use clap::ValueEnum;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::chain::{Chain, ChainBuilder, ChainStatus};
use super::classifier::{classify, MarkerConfig, MarkerKind};
use super::diagnostics::{
    MalformedChain, RejectedActivity, RejectionReason, SegmentationDiagnostics,
};
use crate::errors::{AppError, ErrorCode};
use crate::models::Activity;

/// How input ordering is handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OrderingPolicy {
    /// Stable sort by start time before segmenting
    #[default]
    Sort,
    /// Fail the run if a start time is earlier than its predecessor's
    Validate,
    /// Feed activities in the order given
    Trust,
}

/// Segmenter settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmenterConfig {
    /// Marker glyphs and description scanning
    pub markers: MarkerConfig,
    /// Input ordering policy
    pub ordering: OrderingPolicy,
}

impl SegmenterConfig {
    /// Default markers with the given ordering policy
    #[must_use]
    pub fn with_ordering(ordering: OrderingPolicy) -> Self {
        Self {
            markers: MarkerConfig::default(),
            ordering,
        }
    }
}

/// Run-level segmentation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegmentationError {
    /// An activity starts before the one fed just before it
    #[error("activity {activity_id} at position {index} starts before its predecessor")]
    UnsortedInput {
        /// 0-based position in the input
        index: usize,
        /// Id of the out-of-order activity
        activity_id: String,
    },
}

impl From<SegmentationError> for AppError {
    fn from(error: SegmentationError) -> Self {
        let details = match &error {
            SegmentationError::UnsortedInput { index, activity_id } => {
                serde_json::json!({ "index": index, "activity_id": activity_id })
            }
        };
        Self::new(ErrorCode::InvalidInput, error.to_string())
            .with_details(details)
            .with_source(error)
    }
}

/// Result of segmenting one run's activities
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Segmentation {
    /// Chains in order of their start
    pub chains: Vec<Chain>,
    /// What was skipped and what was malformed
    pub diagnostics: SegmentationDiagnostics,
}

enum State {
    Outside,
    InChain(ChainBuilder),
}

/// Outcome of feeding one classified activity to the state machine
struct Step {
    next: State,
    closed: Option<(ChainBuilder, ChainStatus)>,
    unchained: bool,
}

/// The transition table
fn transition(state: State, activity: Activity, marker: MarkerKind, distance_km: f64) -> Step {
    match (state, marker) {
        (State::Outside, MarkerKind::ChainStart) => Step {
            next: State::InChain(ChainBuilder::open(activity, marker, distance_km)),
            closed: None,
            unchained: false,
        },
        (State::Outside, MarkerKind::Both) => Step {
            next: State::Outside,
            closed: Some((
                ChainBuilder::open(activity, marker, distance_km),
                ChainStatus::Complete,
            )),
            unchained: false,
        },
        (State::Outside, MarkerKind::None | MarkerKind::ChainEnd) => Step {
            next: State::Outside,
            closed: None,
            unchained: true,
        },
        (State::InChain(mut open), MarkerKind::ChainEnd | MarkerKind::Both) => {
            open.push(activity, marker, distance_km);
            Step {
                next: State::Outside,
                closed: Some((open, ChainStatus::Complete)),
                unchained: false,
            }
        }
        (State::InChain(mut open), MarkerKind::None) => {
            open.push(activity, marker, distance_km);
            Step {
                next: State::InChain(open),
                closed: None,
                unchained: false,
            }
        }
        (State::InChain(open), MarkerKind::ChainStart) => Step {
            next: State::InChain(ChainBuilder::open(activity, marker, distance_km)),
            closed: Some((open, ChainStatus::Interrupted)),
            unchained: false,
        },
    }
}

fn validated_distance_km(activity: &Activity) -> Result<f64, RejectionReason> {
    match activity.distance_meters() {
        None => Err(RejectionReason::MissingDistance),
        Some(meters) if !meters.is_finite() => Err(RejectionReason::NonFiniteDistance),
        Some(meters) if meters < 0.0 => Err(RejectionReason::NegativeDistance(meters)),
        Some(_) => activity.distance_km().ok_or(RejectionReason::MissingDistance),
    }
}

/// Incremental segmenter fed one activity at a time in chronological order
///
/// It cannot reorder what it is given, so `OrderingPolicy::Sort` behaves like
/// `Trust` here; use [`segment`] to sort a complete list first.
pub struct Segmenter {
    config: SegmenterConfig,
    state: State,
    chains: Vec<Chain>,
    diagnostics: SegmentationDiagnostics,
    last_start: Option<DateTime<Utc>>,
}

impl Segmenter {
    /// Create a segmenter in the `Outside` state
    #[must_use]
    pub fn new(config: SegmenterConfig) -> Self {
        Self {
            config,
            state: State::Outside,
            chains: Vec::new(),
            diagnostics: SegmentationDiagnostics::default(),
            last_start: None,
        }
    }

    /// Whether a chain is currently open
    #[must_use]
    pub fn in_chain(&self) -> bool {
        matches!(self.state, State::InChain(_))
    }

    /// Chains closed so far
    #[must_use]
    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    /// Feed the next activity, returning the chain it closed, if any
    ///
    /// # Errors
    ///
    /// Returns `SegmentationError::UnsortedInput` under `OrderingPolicy::Validate`
    /// when the activity starts before the previous one.
    pub fn push(&mut self, activity: Activity) -> Result<Option<&Chain>, SegmentationError> {
        let index = self.diagnostics.activities_seen;
        if self.config.ordering == OrderingPolicy::Validate
            && self.last_start.is_some_and(|last| activity.start_date() < last)
        {
            return Err(SegmentationError::UnsortedInput {
                index,
                activity_id: activity.id().to_owned(),
            });
        }
        self.last_start = Some(activity.start_date());
        self.diagnostics.activities_seen += 1;

        let distance_km = match validated_distance_km(&activity) {
            Ok(km) => km,
            Err(reason) => {
                warn!(
                    activity.id = activity.id(),
                    activity.name = activity.name(),
                    %reason,
                    "Rejecting activity"
                );
                self.diagnostics.rejected.push(RejectedActivity {
                    activity_id: activity.id().to_owned(),
                    name: activity.name().to_owned(),
                    reason,
                });
                return Ok(None);
            }
        };

        let marker = classify(activity.name(), activity.description(), &self.config.markers);
        debug!(activity.id = activity.id(), ?marker, "Classified activity");

        let state = std::mem::replace(&mut self.state, State::Outside);
        let step = transition(state, activity, marker, distance_km);
        self.state = step.next;
        if step.unchained {
            self.diagnostics.unchained += 1;
        }

        Ok(match step.closed {
            Some((builder, status)) => Some(self.emit(builder, status)),
            None => None,
        })
    }

    fn emit(&mut self, builder: ChainBuilder, status: ChainStatus) -> &Chain {
        let sequence_number = self.chains.len() + 1;
        if !status.is_well_formed() {
            self.diagnostics.malformed_chains.push(MalformedChain {
                sequence_number,
                status,
                activity_count: builder.len(),
            });
        }
        debug!(
            chain.sequence = sequence_number,
            chain.status = status.as_str(),
            chain.activities = builder.len(),
            "Chain closed"
        );
        self.chains.push(builder.finish(sequence_number, status));
        &self.chains[sequence_number - 1]
    }

    /// Close any open chain as unterminated and return everything collected
    #[must_use]
    pub fn finish(mut self) -> Segmentation {
        let state = std::mem::replace(&mut self.state, State::Outside);
        if let State::InChain(open) = state {
            self.emit(open, ChainStatus::Unterminated);
        }
        Segmentation {
            chains: self.chains,
            diagnostics: self.diagnostics,
        }
    }
}

/// Group activities into chains
///
/// Zero activities yields zero chains. Activities with invalid distances are
/// rejected individually and reported in the diagnostics.
///
/// # Errors
///
/// Returns `SegmentationError::UnsortedInput` only under
/// `OrderingPolicy::Validate`.
pub fn segment<I>(activities: I, config: &SegmenterConfig) -> Result<Segmentation, SegmentationError>
where
    I: IntoIterator<Item = Activity>,
{
    let mut activities: Vec<Activity> = activities.into_iter().collect();
    if config.ordering == OrderingPolicy::Sort {
        activities.sort_by_key(Activity::start_date);
    }

    let mut segmenter = Segmenter::new(config.clone());
    for activity in activities {
        segmenter.push(activity)?;
    }
    Ok(segmenter.finish())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::models::{ActivityBuilder, SportType};
    use chrono::{Duration, TimeZone};

    fn ride(day: i64, name: &str, km: f64) -> Activity {
        let start = Utc.with_ymd_and_hms(2025, 5, 1, 7, 0, 0).unwrap() + Duration::days(day);
        ActivityBuilder::new(format!("r{day}"), name, SportType::Ride, start, "strava")
            .distance_km(km)
            .build()
    }

    #[test]
    fn test_push_returns_closed_chain() {
        let mut segmenter = Segmenter::new(SegmenterConfig::default());
        assert!(segmenter.push(ride(0, "⛓️", 5.0)).unwrap().is_none());
        assert!(segmenter.in_chain());
        let closed = segmenter.push(ride(1, "⛓️‍💥", 5.0)).unwrap().unwrap();
        assert_eq!(closed.sequence_number(), 1);
        assert_eq!(closed.status(), ChainStatus::Complete);
        assert!(!segmenter.in_chain());
    }

    #[test]
    fn test_end_marker_outside_chain_is_unchained() {
        let result = segment(vec![ride(0, "⛓️‍💥", 3.0)], &SegmenterConfig::default()).unwrap();
        assert!(result.chains.is_empty());
        assert_eq!(result.diagnostics.unchained, 1);
    }

    #[test]
    fn test_rejected_activity_does_not_break_open_chain() {
        let broken = ActivityBuilder::new(
            "bad",
            "no gps",
            SportType::Ride,
            Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap(),
            "strava",
        )
        .distance_meters(-5.0)
        .build();

        let input = vec![ride(0, "⛓️", 10.0), broken, ride(1, "⛓️‍💥", 10.0)];
        let result = segment(input, &SegmenterConfig::default()).unwrap();
        assert_eq!(result.chains.len(), 1);
        assert_eq!(result.chains[0].len(), 2);
        assert_eq!(
            result.diagnostics.rejected[0].reason,
            RejectionReason::NegativeDistance(-5.0)
        );
    }

    #[test]
    fn test_unsorted_error_converts_to_invalid_input() {
        let error: AppError = SegmentationError::UnsortedInput {
            index: 2,
            activity_id: "r7".to_owned(),
        }
        .into();
        assert_eq!(error.code, ErrorCode::InvalidInput);
        assert_eq!(error.details["index"], 2);
    }
}
