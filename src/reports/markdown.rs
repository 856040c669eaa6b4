// ABOUTME: Markdown emitter for the chain report
// ABOUTME: Renders a summary header per chain followed by a pipe table of its rides
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::Write;

use super::view::{ChainReport, ChainSummaryView};

/// Report title
pub const MARKDOWN_TITLE: &str = "# Strava Ride Chains Summary";

const TABLE_HEADER: &str = "| Date | Activity Name | Distance (km) | Running Total (km) | Notes |";
const TABLE_DIVIDER: &str = "|------|--------------|---------------|-------------------|-------|";

/// Escape characters that would break a table cell
fn escape_cell(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace(['\r', '\n'], " ")
}

fn write_chain(out: &mut String, chain: &ChainSummaryView) {
    let _ = writeln!(out, "## Chain {}", chain.ordinal);
    let _ = writeln!(out, "- **Period**: {}", chain.period);
    let _ = writeln!(out, "- **Total Kilometers**: {} km", chain.total_distance);
    let _ = writeln!(out, "- **Number of Rides**: {}", chain.activity_count);
    if !chain.well_formed {
        let _ = writeln!(out, "- **Status**: incomplete ({})", chain.status.as_str());
    }
    out.push('\n');

    out.push_str("### Activities in this Chain\n");
    out.push_str(TABLE_HEADER);
    out.push('\n');
    out.push_str(TABLE_DIVIDER);
    out.push('\n');
    for row in &chain.rows {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} |",
            row.date,
            escape_cell(&row.name),
            row.distance,
            row.running_total,
            row.note
        );
    }
    out.push('\n');
}

/// Render the report as Markdown
#[must_use]
pub fn render_markdown(report: &ChainReport) -> String {
    let mut out = String::new();
    out.push_str(MARKDOWN_TITLE);
    out.push_str("\n\n");

    if report.chains.is_empty() {
        out.push_str("No chains found in this period.\n");
        return out;
    }

    for chain in &report.chains {
        write_chain(&mut out, chain);
    }
    out
}
