// ABOUTME: Format-agnostic shaping of chains into display rows and report overview
// ABOUTME: All rounding, notes and highlighting decisions live here, not in the emitters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::constants::units::{ACTIVITY_DISTANCE_DECIMALS, TOTAL_DISTANCE_DECIMALS};
use crate::segmentation::{Chain, ChainStatus, SegmentationDiagnostics};

/// Note on the first row of every chain
pub const NOTE_CHAIN_START: &str = "Chain Start";
/// Note on the last row of a well-formed chain
pub const NOTE_CHAIN_END: &str = "Chain End";
/// Note on the last row of a chain that ran out of input
pub const NOTE_NO_END_MARKER: &str = "Incomplete — no end marker";
/// Note on the last row of a chain cut short by a new start marker
pub const NOTE_INTERRUPTED: &str = "Incomplete — interrupted by new chain start";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Row highlighting hint for emitters that support it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowHighlight {
    /// Ordinary row
    None,
    /// Opening row
    Start,
    /// Closing row of a well-formed chain
    End,
}

impl RowHighlight {
    /// CSS class name, empty for ordinary rows
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Start => "chain-start",
            Self::End => "chain-end",
        }
    }
}

/// One activity row, already formatted for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityRow {
    /// `YYYY-MM-DD`
    pub date: String,
    /// Activity title as recorded
    pub name: String,
    /// Distance, 1 decimal
    pub distance: String,
    /// Running total, 2 decimals
    pub running_total: String,
    /// Running total as a share of the chain total, 0 to 100
    pub progress_percent: f64,
    /// Start/end/incomplete note, possibly empty
    pub note: String,
    /// Highlighting hint
    pub highlight: RowHighlight,
}

/// One chain, shaped for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainSummaryView {
    /// 1-based chain number
    pub ordinal: usize,
    /// `YYYY-MM-DD to YYYY-MM-DD`
    pub period: String,
    /// Total distance, 2 decimals
    pub total_distance: String,
    /// Unrounded total distance
    pub total_distance_km: f64,
    /// Number of activities
    pub activity_count: usize,
    /// Closed by an end marker
    pub well_formed: bool,
    /// How the chain was closed
    pub status: ChainStatus,
    /// Activity rows in chronological order
    pub rows: Vec<ActivityRow>,
}

/// Longest chain by distance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongestChain {
    /// Ordinal of the chain
    pub ordinal: usize,
    /// Total distance, 2 decimals
    pub distance: String,
    /// Unrounded total distance
    pub distance_km: f64,
}

/// Totals across all chains of a report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportOverview {
    /// Number of chains
    pub total_chains: usize,
    /// Distance over all chains, 2 decimals
    pub total_distance: String,
    /// Unrounded distance over all chains
    pub total_distance_km: f64,
    /// Activities over all chains
    pub total_activities: usize,
    /// Longest chain, absent when there are no chains
    pub longest_chain: Option<LongestChain>,
    /// Chains that are not well-formed
    pub incomplete_chains: usize,
}

/// Everything the emitters need for one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainReport {
    /// When the report was produced
    pub generated_at: DateTime<Utc>,
    /// Totals across chains
    pub overview: ReportOverview,
    /// Shaped chains
    pub chains: Vec<ChainSummaryView>,
    /// Segmentation diagnostics, when available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<SegmentationDiagnostics>,
}

impl ChainReport {
    /// Shape chains and compute the overview
    #[must_use]
    pub fn from_chains(chains: &[Chain], generated_at: DateTime<Utc>) -> Self {
        let views = shape_chains(chains);
        Self {
            generated_at,
            overview: ReportOverview::from_views(&views),
            chains: views,
            diagnostics: None,
        }
    }

    /// Attach segmentation diagnostics (included in the JSON output)
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: SegmentationDiagnostics) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// `generated_at` formatted for display, `YYYY-MM-DD HH:MM` UTC
    #[must_use]
    pub fn generated_at_display(&self) -> String {
        self.generated_at.format("%Y-%m-%d %H:%M UTC").to_string()
    }
}

impl ReportOverview {
    fn from_views(views: &[ChainSummaryView]) -> Self {
        let total_distance_km: f64 = views.iter().map(|v| v.total_distance_km).sum();

        // First chain wins ties
        let longest_chain = views
            .iter()
            .fold(None::<&ChainSummaryView>, |best, view| match best {
                Some(current) if current.total_distance_km >= view.total_distance_km => best,
                _ => Some(view),
            })
            .map(|view| LongestChain {
                ordinal: view.ordinal,
                distance: view.total_distance.clone(),
                distance_km: view.total_distance_km,
            });

        Self {
            total_chains: views.len(),
            total_distance: format_distance(total_distance_km, TOTAL_DISTANCE_DECIMALS),
            total_distance_km,
            total_activities: views.iter().map(|v| v.activity_count).sum(),
            longest_chain,
            incomplete_chains: views.iter().filter(|v| !v.well_formed).count(),
        }
    }
}

/// Format kilometers with a fixed number of decimals
///
/// Halves round away from zero, so 5.25 km shows as `5.3` at one decimal.
#[must_use]
pub fn format_distance(km: f64, decimals: usize) -> String {
    let scale = 10_f64.powi(i32::try_from(decimals).unwrap_or(i32::MAX));
    let rounded = (km * scale).round() / scale;
    if rounded.is_finite() {
        format!("{rounded:.decimals$}")
    } else {
        format!("{km:.decimals$}")
    }
}

fn closing_note(status: ChainStatus) -> &'static str {
    match status {
        ChainStatus::Complete => NOTE_CHAIN_END,
        ChainStatus::Interrupted => NOTE_INTERRUPTED,
        ChainStatus::Unterminated => NOTE_NO_END_MARKER,
    }
}

fn row_note(index: usize, last: usize, status: ChainStatus) -> String {
    match (index == 0, index == last) {
        (true, true) => format!("{NOTE_CHAIN_START}, {}", closing_note(status)),
        (true, false) => NOTE_CHAIN_START.to_owned(),
        (false, true) => closing_note(status).to_owned(),
        (false, false) => String::new(),
    }
}

fn row_highlight(index: usize, last: usize, status: ChainStatus) -> RowHighlight {
    if index == last && status.is_well_formed() {
        RowHighlight::End
    } else if index == 0 {
        RowHighlight::Start
    } else {
        RowHighlight::None
    }
}

fn progress_percent(running_total_km: f64, total_km: f64) -> f64 {
    if total_km > 0.0 {
        (running_total_km / total_km * 100.0).clamp(0.0, 100.0)
    } else {
        100.0
    }
}

fn shape_chain(chain: &Chain) -> ChainSummaryView {
    let total_km = chain.total_distance_km();
    let status = chain.status();
    let last = chain.len().saturating_sub(1);

    let rows = chain
        .entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| ActivityRow {
            date: entry.activity().start_date().format(DATE_FORMAT).to_string(),
            name: entry.activity().name().to_owned(),
            distance: format_distance(entry.distance_km(), ACTIVITY_DISTANCE_DECIMALS),
            running_total: format_distance(entry.running_total_km(), TOTAL_DISTANCE_DECIMALS),
            progress_percent: progress_percent(entry.running_total_km(), total_km),
            note: row_note(index, last, status),
            highlight: row_highlight(index, last, status),
        })
        .collect();

    ChainSummaryView {
        ordinal: chain.sequence_number(),
        period: format!(
            "{} to {}",
            chain.start_date().format(DATE_FORMAT),
            chain.end_date().format(DATE_FORMAT)
        ),
        total_distance: format_distance(total_km, TOTAL_DISTANCE_DECIMALS),
        total_distance_km: total_km,
        activity_count: chain.len(),
        well_formed: chain.is_well_formed(),
        status,
        rows,
    }
}

/// Shape chains for the emitters, preserving order
#[must_use]
pub fn shape_chains(chains: &[Chain]) -> Vec<ChainSummaryView> {
    chains.iter().map(shape_chain).collect()
}
