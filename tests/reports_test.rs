// ABOUTME: Integration tests for report shaping and the Markdown, HTML and JSON emitters
// ABOUTME: Verifies rounding, notes, highlights, overview totals and file writing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chain_tracker::reports::{
    format_report, render_html, render_markdown, ChainReport, ReportFormat, ReportWriter,
    RowHighlight,
};
use chain_tracker::segmentation::{segment, SegmenterConfig};
use chrono::{TimeZone, Utc};
use common::{ride, END, START};

fn report_for(activities: Vec<chain_tracker::models::Activity>) -> ChainReport {
    let segmentation = segment(activities, &SegmenterConfig::default()).unwrap();
    let generated_at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 0).unwrap();
    ChainReport::from_chains(&segmentation.chains, generated_at)
        .with_diagnostics(segmentation.diagnostics)
}

fn two_chain_report() -> ChainReport {
    report_for(vec![
        ride("A", "warmup", 4.0, 0),
        ride("B", &format!("Start {START}"), 10.0, 1),
        ride("C", "Middle | hills", 20.5, 2),
        ride("D", &format!("Finish {END}"), 5.25, 3),
        ride("E", &format!("Solo {START}"), 40.0, 5),
    ])
}

// ============================================================================
// View shaping
// ============================================================================

#[test]
fn test_rows_are_rounded_and_annotated() {
    let report = two_chain_report();
    let chain = &report.chains[0];

    assert_eq!(chain.ordinal, 1);
    assert_eq!(chain.period, "2025-05-02 to 2025-05-04");
    assert_eq!(chain.total_distance, "35.75");
    assert_eq!(chain.activity_count, 3);

    assert_eq!(chain.rows[0].distance, "10.0");
    assert_eq!(chain.rows[1].distance, "20.5");
    assert_eq!(chain.rows[2].distance, "5.3");
    let running: Vec<&str> = chain.rows.iter().map(|r| r.running_total.as_str()).collect();
    assert_eq!(running, ["10.00", "30.50", "35.75"]);

    assert_eq!(chain.rows[0].note, "Chain Start");
    assert_eq!(chain.rows[1].note, "");
    assert_eq!(chain.rows[2].note, "Chain End");

    assert_eq!(chain.rows[0].highlight, RowHighlight::Start);
    assert_eq!(chain.rows[1].highlight, RowHighlight::None);
    assert_eq!(chain.rows[2].highlight, RowHighlight::End);
    assert!((chain.rows[2].progress_percent - 100.0).abs() < 1e-9);
}

#[test]
fn test_incomplete_chain_has_no_end_highlight() {
    let report = two_chain_report();
    let chain = &report.chains[1];

    assert!(!chain.well_formed);
    assert_eq!(chain.rows.len(), 1);
    assert_eq!(chain.rows[0].highlight, RowHighlight::Start);
    assert_eq!(chain.rows[0].note, "Chain Start, Incomplete — no end marker");
}

#[test]
fn test_overview_totals_and_longest_chain() {
    let report = two_chain_report();
    let overview = &report.overview;

    assert_eq!(overview.total_chains, 2);
    assert_eq!(overview.total_activities, 4);
    assert_eq!(overview.total_distance, "75.75");
    assert_eq!(overview.incomplete_chains, 1);

    let longest = overview.longest_chain.as_ref().unwrap();
    assert_eq!(longest.ordinal, 2);
    assert_eq!(longest.distance, "40.00");
}

#[test]
fn test_longest_chain_tie_goes_to_first() {
    let report = report_for(vec![
        ride("A", &format!("{START}{END}"), 10.0, 0),
        ride("B", &format!("{START}{END}"), 10.0, 1),
    ]);
    assert_eq!(report.overview.longest_chain.unwrap().ordinal, 1);
}

#[test]
fn test_empty_report_overview() {
    let report = report_for(Vec::new());
    assert_eq!(report.overview.total_chains, 0);
    assert_eq!(report.overview.total_distance, "0.00");
    assert!(report.overview.longest_chain.is_none());
}

// ============================================================================
// Emitters
// ============================================================================

#[test]
fn test_markdown_layout() {
    let markdown = render_markdown(&two_chain_report());

    assert!(markdown.starts_with("# Strava Ride Chains Summary\n\n"));
    assert!(markdown.contains("## Chain 1\n"));
    assert!(markdown.contains("- **Period**: 2025-05-02 to 2025-05-04\n"));
    assert!(markdown.contains("- **Total Kilometers**: 35.75 km\n"));
    assert!(markdown.contains("- **Number of Rides**: 3\n"));
    assert!(markdown.contains("### Activities in this Chain\n"));
    assert!(markdown.contains("| 2025-05-03 | Middle \\| hills | 20.5 | 30.50 |  |\n"));
    assert!(markdown.contains("- **Status**: incomplete (unterminated)\n"));
}

#[test]
fn test_markdown_empty_report() {
    let markdown = render_markdown(&report_for(Vec::new()));
    assert!(markdown.contains("No chains found in this period."));
    assert!(!markdown.contains("## Chain"));
}

#[test]
fn test_html_is_self_contained() {
    let html = render_html(&two_chain_report());

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<style>"));
    assert!(!html.contains("<link"));
    assert!(!html.contains("<script"));
    assert!(html.contains("Last updated: 2025-06-01 12:30 UTC"));
    assert!(html.contains("<h2>Chain 1</h2>"));
    assert!(html.contains(r#"class="chain-end""#));
    assert!(html.contains(r#"<span class="badge-incomplete">unterminated</span>"#));
    assert!(html.contains("<h2>75.75 km</h2>"));
}

#[test]
fn test_json_includes_diagnostics() {
    let output = format_report(&two_chain_report(), ReportFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output.data).unwrap();

    assert_eq!(value["overview"]["total_chains"], 2);
    assert_eq!(value["chains"][0]["rows"][2]["note"], "Chain End");
    assert_eq!(value["diagnostics"]["unchained"], 1);
    assert_eq!(value["diagnostics"]["malformed_chains"][0]["status"], "unterminated");
}

#[test]
fn test_format_parsing() {
    assert_eq!("md".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
    assert_eq!("HTML".parse::<ReportFormat>().unwrap(), ReportFormat::Html);
    assert!("pdf".parse::<ReportFormat>().is_err());
}

// ============================================================================
// Writer
// ============================================================================

#[tokio::test]
async fn test_writer_writes_each_format_once() {
    let dir = tempfile::tempdir().unwrap();
    let writer = ReportWriter::new(dir.path().join("reports"));

    let written = writer
        .write_all(
            &two_chain_report(),
            &[ReportFormat::Markdown, ReportFormat::Html, ReportFormat::Markdown],
        )
        .await
        .unwrap();

    assert_eq!(written.len(), 2);
    assert!(written[0].ends_with("strava_chains_report.md"));
    assert!(written[1].ends_with("strava_chains_website.html"));

    let markdown = std::fs::read_to_string(&written[0]).unwrap();
    assert!(markdown.contains("## Chain 2"));
}
