// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Marker glyphs, units, provider endpoints and environment keys
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped by domain rather than kept in one flat list.

/// Unit conversion and measurement constants
pub mod units;

/// Chain marker glyphs recognized in activity titles and descriptions
pub mod markers {
    /// Marks the first activity of a chain
    pub const CHAIN_START: &str = "\u{26d3}\u{fe0f}";
    /// Marks the last activity of a chain ("broken chain" ZWJ sequence)
    pub const CHAIN_END: &str = "\u{26d3}\u{fe0f}\u{200d}\u{1f4a5}";
}

/// OAuth provider identifiers and endpoints
pub mod oauth_providers {
    /// Strava provider identifier
    pub const STRAVA: &str = "strava";
    /// Strava authorization endpoint
    pub const STRAVA_AUTH_URL: &str = "https://www.strava.com/oauth/authorize";
    /// Strava token endpoint
    pub const STRAVA_TOKEN_URL: &str = "https://www.strava.com/oauth/token";
    /// Strava REST API base
    pub const STRAVA_API_BASE_URL: &str = "https://www.strava.com/api/v3";
    /// Strava token revocation endpoint
    pub const STRAVA_REVOKE_URL: &str = "https://www.strava.com/oauth/deauthorize";
    /// Scopes needed to list private activities
    pub const STRAVA_DEFAULT_SCOPES: &str = "read,activity:read_all";
}

/// Default values for a tracker run
pub mod defaults {
    /// Look-back window for the activity listing (about six months)
    pub const LOOKBACK_DAYS: i64 = 180;
    /// Activities requested per page
    pub const PAGE_SIZE: usize = 100;
    /// Pause between activity page requests, in milliseconds
    pub const PAGE_THROTTLE_MS: u64 = 100;
    /// HTTP request timeout in seconds
    pub const HTTP_TIMEOUT_SECS: u64 = 30;
    /// HTTP connect timeout in seconds
    pub const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;
    /// Redirect URI registered for the manual code exchange
    pub const AUTH_REDIRECT_URI: &str = "http://localhost";
    /// Output directory for rendered reports
    pub const OUTPUT_DIR: &str = ".";
    /// Markdown report file name
    pub const MARKDOWN_REPORT_FILE: &str = "strava_chains_report.md";
    /// HTML report file name
    pub const HTML_REPORT_FILE: &str = "strava_chains_website.html";
    /// JSON report file name
    pub const JSON_REPORT_FILE: &str = "strava_chains.json";
}

/// Environment variable names read by the tracker configuration
pub mod env_keys {
    /// Strava OAuth client id
    pub const STRAVA_CLIENT_ID: &str = "STRAVA_CLIENT_ID";
    /// Strava OAuth client secret
    pub const STRAVA_CLIENT_SECRET: &str = "STRAVA_CLIENT_SECRET";
    /// Long-lived Strava refresh token
    pub const STRAVA_REFRESH_TOKEN: &str = "STRAVA_REFRESH_TOKEN";
    /// Activities requested per page
    pub const STRAVA_PAGE_SIZE: &str = "STRAVA_PAGE_SIZE";
    /// Pause between page requests in milliseconds
    pub const STRAVA_PAGE_THROTTLE_MS: &str = "STRAVA_PAGE_THROTTLE_MS";
    /// HTTP request timeout in seconds
    pub const HTTP_TIMEOUT_SECS: &str = "HTTP_TIMEOUT_SECS";
    /// HTTP connect timeout in seconds
    pub const HTTP_CONNECT_TIMEOUT_SECS: &str = "HTTP_CONNECT_TIMEOUT_SECS";
    /// Look-back window in days
    pub const CHAIN_LOOKBACK_DAYS: &str = "CHAIN_LOOKBACK_DAYS";
    /// Override for the chain start glyph
    pub const CHAIN_START_MARKER: &str = "CHAIN_START_MARKER";
    /// Override for the chain end glyph
    pub const CHAIN_END_MARKER: &str = "CHAIN_END_MARKER";
    /// Whether descriptions are scanned for markers
    pub const CHAIN_SEARCH_DESCRIPTION: &str = "CHAIN_SEARCH_DESCRIPTION";
    /// Whether every cycling type counts, not only outdoor rides
    pub const CHAIN_INCLUDE_ALL_CYCLING: &str = "CHAIN_INCLUDE_ALL_CYCLING";
    /// Whether each activity's detail is fetched to obtain its description
    pub const CHAIN_FETCH_DETAILS: &str = "CHAIN_FETCH_DETAILS";
    /// Directory the reports are written to
    pub const REPORT_OUTPUT_DIR: &str = "REPORT_OUTPUT_DIR";
}
