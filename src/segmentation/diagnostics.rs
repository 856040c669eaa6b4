// ABOUTME: Per-run segmentation diagnostics: rejected, unchained and malformed counts
// ABOUTME: Surfaced in logs and the JSON report so mislabeled activities can be fixed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

use super::chain::ChainStatus;

/// Why an activity was excluded before classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum RejectionReason {
    /// The provider reported no distance
    MissingDistance,
    /// Distance below zero
    NegativeDistance(f64),
    /// NaN or infinite distance
    NonFiniteDistance,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDistance => f.write_str("missing distance"),
            Self::NegativeDistance(meters) => write!(f, "negative distance ({meters} m)"),
            Self::NonFiniteDistance => f.write_str("distance is not a finite number"),
        }
    }
}

/// An activity left out of segmentation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedActivity {
    /// Provider id of the activity
    pub activity_id: String,
    /// Title, for the human reading the log
    pub name: String,
    /// What was wrong with it
    pub reason: RejectionReason,
}

/// A chain emitted without a closing end marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MalformedChain {
    /// Sequence number of the chain
    pub sequence_number: usize,
    /// Interrupted or unterminated
    pub status: ChainStatus,
    /// Members in the chain
    pub activity_count: usize,
}

/// Counters collected over one segmentation run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SegmentationDiagnostics {
    /// Activities fed to the segmenter, rejected ones included
    pub activities_seen: usize,
    /// Activities excluded for invalid distances
    pub rejected: Vec<RejectedActivity>,
    /// Valid activities outside any chain
    pub unchained: usize,
    /// Chains that were not closed by an end marker
    pub malformed_chains: Vec<MalformedChain>,
}

impl SegmentationDiagnostics {
    /// True when every activity was usable and every chain well-formed
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.malformed_chains.is_empty()
    }

    /// Emit a summary of the run at `info`, and each anomaly at `warn`
    pub fn log_summary(&self, chain_count: usize) {
        info!(
            activities.seen = self.activities_seen,
            activities.rejected = self.rejected.len(),
            activities.unchained = self.unchained,
            chain.count = chain_count,
            chain.malformed = self.malformed_chains.len(),
            "Segmentation finished"
        );

        for malformed in &self.malformed_chains {
            warn!(
                chain.sequence = malformed.sequence_number,
                chain.status = malformed.status.as_str(),
                chain.activities = malformed.activity_count,
                "Chain has no end marker"
            );
        }
    }
}
