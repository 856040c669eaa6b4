// ABOUTME: Chain and ChainEntry types produced by the segmenter
// ABOUTME: Running totals are accumulated exactly while a chain is built
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::classifier::MarkerKind;
use crate::models::Activity;

/// How a chain was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainStatus {
    /// Closed by an end marker
    Complete,
    /// Force-closed because a new start marker arrived first
    Interrupted,
    /// Input ended before an end marker was seen
    Unterminated,
}

impl ChainStatus {
    /// Only chains closed by an end marker are well-formed
    #[must_use]
    pub const fn is_well_formed(self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Short label used in logs and diagnostics
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Interrupted => "interrupted",
            Self::Unterminated => "unterminated",
        }
    }
}

/// One activity inside a chain with its running total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainEntry {
    activity: Activity,
    marker: MarkerKind,
    distance_km: f64,
    running_total_km: f64,
}

impl ChainEntry {
    /// The member activity
    #[must_use]
    pub const fn activity(&self) -> &Activity {
        &self.activity
    }

    /// Markers the activity carried
    #[must_use]
    pub const fn marker(&self) -> MarkerKind {
        self.marker
    }

    /// Distance of this activity in kilometers
    #[must_use]
    pub const fn distance_km(&self) -> f64 {
        self.distance_km
    }

    /// Sum of distances from the chain start up to and including this activity
    #[must_use]
    pub const fn running_total_km(&self) -> f64 {
        self.running_total_km
    }
}

/// A contiguous run of activities between a start and an end marker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chain {
    sequence_number: usize,
    status: ChainStatus,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    total_distance_km: f64,
    entries: Vec<ChainEntry>,
}

impl Chain {
    /// 1-based position among the chains of one run
    #[must_use]
    pub const fn sequence_number(&self) -> usize {
        self.sequence_number
    }

    /// How the chain was closed
    #[must_use]
    pub const fn status(&self) -> ChainStatus {
        self.status
    }

    /// True when the chain was closed by an end marker
    #[must_use]
    pub const fn is_well_formed(&self) -> bool {
        self.status.is_well_formed()
    }

    /// Start time of the first member
    #[must_use]
    pub const fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    /// Start time of the last member
    #[must_use]
    pub const fn end_date(&self) -> DateTime<Utc> {
        self.end_date
    }

    /// Exact sum of member distances
    #[must_use]
    pub const fn total_distance_km(&self) -> f64 {
        self.total_distance_km
    }

    /// Members in chronological order; never empty
    #[must_use]
    pub fn entries(&self) -> &[ChainEntry] {
        &self.entries
    }

    /// Number of member activities
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; a chain holds at least its opening activity
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids of the member activities
    pub fn activity_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.activity.id())
    }
}

/// Open chain being accumulated by the segmenter
#[derive(Debug, Clone)]
pub(crate) struct ChainBuilder {
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    running_total_km: f64,
    entries: Vec<ChainEntry>,
}

impl ChainBuilder {
    pub(crate) fn open(activity: Activity, marker: MarkerKind, distance_km: f64) -> Self {
        let start_date = activity.start_date();
        let mut builder = Self {
            start_date,
            end_date: start_date,
            running_total_km: 0.0,
            entries: Vec::new(),
        };
        builder.push(activity, marker, distance_km);
        builder
    }

    pub(crate) fn push(&mut self, activity: Activity, marker: MarkerKind, distance_km: f64) {
        self.running_total_km += distance_km;
        self.end_date = activity.start_date();
        self.entries.push(ChainEntry {
            activity,
            marker,
            distance_km,
            running_total_km: self.running_total_km,
        });
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn finish(self, sequence_number: usize, status: ChainStatus) -> Chain {
        Chain {
            sequence_number,
            status,
            start_date: self.start_date,
            end_date: self.end_date,
            total_distance_km: self.running_total_km,
            entries: self.entries,
        }
    }
}
