// ABOUTME: HTML emitter producing a self-contained chain tracker page
// ABOUTME: Statistics card, one card per chain, start/end highlighting and progress gradient
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! HTML report generation
//!
//! The page embeds its CSS and needs no network access to display. Every
//! piece of activity text is escaped before insertion.

use html_escape::{encode_double_quoted_attribute, encode_text};

use super::view::{ActivityRow, ChainReport, ChainSummaryView, ReportOverview};

/// Render the report as a complete HTML document
#[must_use]
pub fn render_html(report: &ChainReport) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Strava Chain Tracker</title>
    <style>{css}</style>
</head>
<body>
    {header}
    <div class="container">
        {overview}
        {chains}
    </div>
    {footer}
</body>
</html>
"#,
        css = inline_css(),
        header = render_header(report),
        overview = render_overview(&report.overview),
        chains = render_chains(&report.chains),
        footer = render_footer(),
    )
}

fn render_header(report: &ChainReport) -> String {
    format!(
        r#"<div class="strava-header">
        <div class="container">
            <h1>⛓️ Strava Chain Tracker</h1>
            <p class="lead">Track your cycling chains and achievements</p>
            <p class="last-updated">Last updated: {updated}</p>
        </div>
    </div>"#,
        updated = encode_text(&report.generated_at_display()),
    )
}

fn render_overview(overview: &ReportOverview) -> String {
    let (longest_distance, longest_label) = overview.longest_chain.as_ref().map_or_else(
        || ("0.00".to_owned(), "No chains yet".to_owned()),
        |longest| {
            (
                longest.distance.clone(),
                format!("Chain #{}", longest.ordinal),
            )
        },
    );

    let incomplete = if overview.incomplete_chains > 0 {
        format!(
            r#"
            <p class="incomplete-note">{} incomplete chain(s)</p>"#,
            overview.incomplete_chains
        )
    } else {
        String::new()
    };

    format!(
        r#"<div class="stats-card">
            <div class="stat">
                <h4>Total Chains</h4>
                <h2>{total_chains}</h2>{incomplete}
            </div>
            <div class="stat">
                <h4>Total Distance</h4>
                <h2>{total_distance} km</h2>
            </div>
            <div class="stat">
                <h4>Total Activities</h4>
                <h2>{total_activities}</h2>
            </div>
            <div class="stat">
                <h4>Longest Chain</h4>
                <h2>{longest_distance} km</h2>
                <p>{longest_label}</p>
            </div>
        </div>"#,
        total_chains = overview.total_chains,
        total_distance = overview.total_distance,
        total_activities = overview.total_activities,
    )
}

fn render_chains(chains: &[ChainSummaryView]) -> String {
    if chains.is_empty() {
        return r#"<p class="empty">No chains found in this period.</p>"#.to_owned();
    }
    chains.iter().map(render_chain).collect::<Vec<_>>().join("\n        ")
}

fn render_chain(chain: &ChainSummaryView) -> String {
    let rows = chain
        .rows
        .iter()
        .map(render_row)
        .collect::<Vec<_>>()
        .join("\n");

    let status_badge = if chain.well_formed {
        String::new()
    } else {
        format!(
            r#" <span class="badge-incomplete">{}</span>"#,
            chain.status.as_str()
        )
    };

    format!(
        r#"<div class="chain-card">
            <div class="chain-header">
                <h2>Chain {ordinal}{status_badge}</h2>
                <p>Period: {period}</p>
            </div>
            <div class="chain-body">
                <div class="chain-stats">
                    <div>
                        <h4>Total Distance</h4>
                        <h3>{total} km</h3>
                    </div>
                    <div>
                        <h4>Number of Rides</h4>
                        <h3>{count}</h3>
                    </div>
                </div>
                <table class="table">
                    <thead>
                        <tr>
                            <th>Date</th>
                            <th>Activity Name</th>
                            <th>Distance (km)</th>
                            <th>Running Total (km)</th>
                            <th>Notes</th>
                        </tr>
                    </thead>
                    <tbody>
{rows}
                    </tbody>
                </table>
            </div>
        </div>"#,
        ordinal = chain.ordinal,
        period = encode_text(&chain.period),
        total = chain.total_distance,
        count = chain.activity_count,
    )
}

fn render_row(row: &ActivityRow) -> String {
    format!(
        r#"                        <tr class="{class}">
                            <td>{date}</td>
                            <td>{name}</td>
                            <td>{distance}</td>
                            <td class="progress-column" style="--progress-percent: {progress:.1}%;">{running_total}</td>
                            <td>{note}</td>
                        </tr>"#,
        class = encode_double_quoted_attribute(row.highlight.css_class()),
        date = encode_text(&row.date),
        name = encode_text(&row.name),
        distance = row.distance,
        progress = row.progress_percent,
        running_total = row.running_total,
        note = encode_text(&row.note),
    )
}

fn render_footer() -> &'static str {
    r#"<footer>
        <div class="container">
            <p>Powered by the Strava API</p>
        </div>
    </footer>"#
}

fn inline_css() -> &'static str {
    r"
* { box-sizing: border-box; }
body {
    margin: 0;
    padding-bottom: 40px;
    font-family: system-ui, -apple-system, 'Segoe UI', sans-serif;
    color: #212529;
    background: #ffffff;
}
.container { max-width: 1140px; margin: 0 auto; padding: 0 15px; }
.strava-header {
    background-color: #fc4c02;
    color: white;
    padding: 15px 0;
    margin-bottom: 30px;
}
.strava-header h1 { margin: 0 0 8px; font-weight: 300; font-size: 2.5rem; }
.lead { font-size: 1.25rem; margin: 0; }
.last-updated { font-size: 0.8em; color: #fde2d5; margin-top: 5px; }
.stats-card {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
    gap: 15px;
    background-color: #f8f9fa;
    border-radius: 10px;
    padding: 20px;
    margin-bottom: 30px;
    box-shadow: 0 4px 8px rgba(0,0,0,0.1);
}
.stats-card h4, .chain-stats h4 { margin: 0 0 6px; color: #6c757d; font-weight: 500; }
.stats-card h2 { margin: 0; }
.incomplete-note { color: #b02a37; margin: 4px 0 0; }
.chain-card {
    margin-bottom: 30px;
    border-radius: 10px;
    box-shadow: 0 4px 8px rgba(0,0,0,0.1);
}
.chain-header {
    background-color: #fc4c02;
    color: white;
    padding: 15px;
    border-top-left-radius: 10px;
    border-top-right-radius: 10px;
}
.chain-header h2 { margin: 0 0 4px; }
.chain-header p { margin: 0; }
.badge-incomplete {
    font-size: 0.6em;
    vertical-align: middle;
    background: #ffffff;
    color: #b02a37;
    border-radius: 6px;
    padding: 2px 8px;
}
.chain-body { padding: 20px; overflow-x: auto; }
.chain-stats { display: grid; grid-template-columns: 1fr 1fr; margin-bottom: 16px; }
.chain-stats h3 { margin: 0; }
.table { width: 100%; border-collapse: collapse; }
.table th, .table td { padding: 8px; border-top: 1px solid #dee2e6; text-align: left; }
.table tbody tr:nth-of-type(odd) { background-color: rgba(0,0,0,0.03); }
.table tbody tr.chain-start { background-color: #d4edda; }
.table tbody tr.chain-end { background-color: #f8d7da; }
.progress-column {
    background: linear-gradient(90deg,
        rgba(223, 240, 216, 0.5) 0%,
        rgba(223, 240, 216, 0.5) var(--progress-percent),
        transparent var(--progress-percent),
        transparent 100%);
}
.empty { color: #6c757d; }
footer { background: #f8f9fa; padding: 24px 0; margin-top: 24px; text-align: center; }
"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::view::RowHighlight;

    #[test]
    fn test_row_escapes_name() {
        let row = ActivityRow {
            date: "2025-05-01".to_owned(),
            name: "<script>alert(1)</script> & co".to_owned(),
            distance: "12.0".to_owned(),
            running_total: "12.00".to_owned(),
            progress_percent: 100.0,
            note: "Chain Start".to_owned(),
            highlight: RowHighlight::Start,
        };
        let html = render_row(&row);
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt; &amp; co"));
        assert!(html.contains(r#"class="chain-start""#));
        assert!(html.contains("--progress-percent: 100.0%"));
    }
}
