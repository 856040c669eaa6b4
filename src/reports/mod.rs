// ABOUTME: Report rendering: shaped chain views and the Markdown, HTML and JSON emitters
// ABOUTME: Shaping makes every display decision; emitters only template
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Reports
//!
//! [`shape_chains`] turns chains into [`ChainSummaryView`]s with rounded
//! distances, notes and highlighting hints. [`ChainReport`] adds the overview
//! card. The emitters in [`markdown`] and [`html`] are plain templates over
//! that data, and [`ReportWriter`] puts the results on disk.

/// Report format selection and dispatch
pub mod formatters;
/// HTML page emitter
pub mod html;
/// Markdown emitter
pub mod markdown;
/// Format-agnostic shaping
pub mod view;
/// Output directory writer
pub mod writer;

pub use formatters::{format_report, FormatError, FormattedReport, ReportFormat};
pub use html::render_html;
pub use markdown::render_markdown;
pub use view::{
    format_distance, shape_chains, ActivityRow, ChainReport, ChainSummaryView, LongestChain,
    ReportOverview, RowHighlight,
};
pub use writer::ReportWriter;
