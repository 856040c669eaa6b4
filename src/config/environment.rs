// ABOUTME: Environment-based configuration for a tracker run
// ABOUTME: Reads Strava credentials and chain options from env vars and an optional .env file
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-only configuration
//!
//! Every setting has an environment variable; command-line flags override
//! them after loading. A `.env` file in the working directory is read first
//! when present.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, info};

use crate::constants::{defaults, env_keys, markers};
use crate::errors::{AppError, AppResult};
use crate::providers::activity_iterator::{MAX_PAGE_SIZE, MIN_PAGE_SIZE};
use crate::providers::OAuth2Credentials;
use crate::segmentation::MarkerConfig;

/// Strava application credentials
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StravaSettings {
    /// OAuth client id
    pub client_id: Option<String>,
    /// OAuth client secret
    pub client_secret: Option<String>,
    /// Long-lived refresh token written by `auth-setup`
    pub refresh_token: Option<String>,
}

impl StravaSettings {
    /// Read the three Strava variables from the process environment
    #[must_use]
    pub fn from_env_vars() -> Self {
        Self {
            client_id: env_var(env_keys::STRAVA_CLIENT_ID),
            client_secret: env_var(env_keys::STRAVA_CLIENT_SECRET),
            refresh_token: env_var(env_keys::STRAVA_REFRESH_TOKEN),
        }
    }

    /// Client id and secret, as needed for the authorization code exchange
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` naming the first absent variable.
    pub fn client_pair(&self) -> AppResult<(&str, &str)> {
        let client_id = self
            .client_id
            .as_deref()
            .ok_or_else(|| AppError::config_missing(env_keys::STRAVA_CLIENT_ID))?;
        let client_secret = self
            .client_secret
            .as_deref()
            .ok_or_else(|| AppError::config_missing(env_keys::STRAVA_CLIENT_SECRET))?;
        Ok((client_id, client_secret))
    }

    /// Credentials for an API session
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` naming the first absent variable.
    pub fn credentials(&self) -> AppResult<OAuth2Credentials> {
        let (client_id, client_secret) = self.client_pair()?;
        let refresh_token = self
            .refresh_token
            .as_deref()
            .ok_or_else(|| AppError::config_missing(env_keys::STRAVA_REFRESH_TOKEN))?;
        Ok(OAuth2Credentials::from_refresh_token(
            client_id,
            client_secret,
            refresh_token,
        ))
    }
}

/// Settings for one tracker run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Strava credentials
    pub strava: StravaSettings,
    /// Look-back window in days
    pub lookback_days: i64,
    /// Marker glyphs and description scanning
    pub markers: MarkerConfig,
    /// Count every cycling type, not only outdoor `Ride`
    pub include_all_cycling: bool,
    /// Fetch each ride's detail to read its description
    pub fetch_details: bool,
    /// Directory reports are written to
    pub output_dir: PathBuf,
    /// Activities requested per page
    pub page_size: usize,
    /// Pause between page requests in milliseconds
    pub page_throttle_ms: u64,
    /// HTTP request timeout in seconds
    pub http_timeout_secs: u64,
    /// HTTP connect timeout in seconds
    pub http_connect_timeout_secs: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            strava: StravaSettings::default(),
            lookback_days: defaults::LOOKBACK_DAYS,
            markers: MarkerConfig::default(),
            include_all_cycling: false,
            fetch_details: false,
            output_dir: PathBuf::from(defaults::OUTPUT_DIR),
            page_size: defaults::PAGE_SIZE,
            page_throttle_ms: defaults::PAGE_THROTTLE_MS,
            http_timeout_secs: defaults::HTTP_TIMEOUT_SECS,
            http_connect_timeout_secs: defaults::HTTP_CONNECT_TIMEOUT_SECS,
        }
    }
}

/// Load a `.env` file from the working directory if one exists
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) => debug!("No .env file loaded: {e}"),
    }
}

/// Non-empty value of an environment variable
fn env_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn env_var_or(key: &str, default: &str) -> String {
    env_var(key).unwrap_or_else(|| default.to_owned())
}

fn env_parse<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_var(key).map_or(Ok(default), |raw| {
        raw.parse().map_err(|e| {
            AppError::config_invalid(format!("{key}={raw} is not valid: {e}"))
                .with_details(serde_json::json!({ "key": key, "value": raw }))
        })
    })
}

/// Parse a boolean flag, accepting true/false, 1/0, yes/no and on/off
///
/// # Errors
///
/// Returns `ConfigInvalid` for any other value.
pub fn parse_bool(key: &str, raw: &str) -> AppResult<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(AppError::config_invalid(format!(
            "{key}={raw} is not a boolean"
        ))),
    }
}

/// Set `key=value` in the contents of a `.env` file
///
/// Replaces the first existing assignment of `key` (a leading `export` is
/// tolerated) and drops any later duplicates; appends the line otherwise.
#[must_use]
pub fn upsert_env_line(contents: &str, key: &str, value: &str) -> String {
    let assignment = format!("{key}={value}");
    let mut replaced = false;
    let mut lines: Vec<&str> = Vec::new();
    for line in contents.lines() {
        let bare = line.trim_start().trim_start_matches("export ").trim_start();
        let is_key = bare
            .strip_prefix(key)
            .is_some_and(|rest| rest.trim_start().starts_with('='));
        if !is_key {
            lines.push(line);
        } else if !replaced {
            lines.push(&assignment);
            replaced = true;
        }
    }
    if !replaced {
        lines.push(&assignment);
    }
    let mut updated = lines.join("\n");
    updated.push('\n');
    updated
}

fn env_bool(key: &str, default: bool) -> AppResult<bool> {
    env_var(key).map_or(Ok(default), |raw| parse_bool(key, &raw))
}

impl TrackerConfig {
    /// Load `.env` and read the configuration from the environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if a variable is set to an unparseable or
    /// out-of-range value.
    pub fn from_env() -> AppResult<Self> {
        load_dotenv();
        Self::from_env_vars()
    }

    /// Read the configuration from the process environment only
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if a variable is set to an unparseable or
    /// out-of-range value.
    pub fn from_env_vars() -> AppResult<Self> {
        let config = Self {
            strava: StravaSettings::from_env_vars(),
            lookback_days: env_parse(env_keys::CHAIN_LOOKBACK_DAYS, defaults::LOOKBACK_DAYS)?,
            markers: MarkerConfig {
                start_marker: env_var_or(env_keys::CHAIN_START_MARKER, markers::CHAIN_START),
                end_marker: env_var_or(env_keys::CHAIN_END_MARKER, markers::CHAIN_END),
                search_description: env_bool(env_keys::CHAIN_SEARCH_DESCRIPTION, true)?,
            },
            include_all_cycling: env_bool(env_keys::CHAIN_INCLUDE_ALL_CYCLING, false)?,
            fetch_details: env_bool(env_keys::CHAIN_FETCH_DETAILS, false)?,
            output_dir: PathBuf::from(env_var_or(env_keys::REPORT_OUTPUT_DIR, defaults::OUTPUT_DIR)),
            page_size: env_parse(env_keys::STRAVA_PAGE_SIZE, defaults::PAGE_SIZE)?,
            page_throttle_ms: env_parse(
                env_keys::STRAVA_PAGE_THROTTLE_MS,
                defaults::PAGE_THROTTLE_MS,
            )?,
            http_timeout_secs: env_parse(env_keys::HTTP_TIMEOUT_SECS, defaults::HTTP_TIMEOUT_SECS)?,
            http_connect_timeout_secs: env_parse(
                env_keys::HTTP_CONNECT_TIMEOUT_SECS,
                defaults::HTTP_CONNECT_TIMEOUT_SECS,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` describing the first offending setting.
    pub fn validate(&self) -> AppResult<()> {
        if self.lookback_days <= 0 {
            return Err(AppError::config_invalid(format!(
                "{} must be a positive number of days, got {}",
                env_keys::CHAIN_LOOKBACK_DAYS,
                self.lookback_days
            )));
        }
        if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(AppError::config_invalid(format!(
                "{} must be between {MIN_PAGE_SIZE} and {MAX_PAGE_SIZE}, got {}",
                env_keys::STRAVA_PAGE_SIZE,
                self.page_size
            )));
        }
        if self.http_timeout_secs == 0 || self.http_connect_timeout_secs == 0 {
            return Err(AppError::config_invalid(format!(
                "{} and {} must be at least one second",
                env_keys::HTTP_TIMEOUT_SECS,
                env_keys::HTTP_CONNECT_TIMEOUT_SECS
            )));
        }
        if self.markers.markers_coincide() {
            return Err(AppError::config_invalid(
                "start and end markers must differ",
            ));
        }
        Ok(())
    }

    /// Log the effective settings without secrets
    pub fn log_summary(&self) {
        info!(
            lookback_days = self.lookback_days,
            page_size = self.page_size,
            page_throttle_ms = self.page_throttle_ms,
            http_timeout_secs = self.http_timeout_secs,
            search_description = self.markers.search_description,
            include_all_cycling = self.include_all_cycling,
            fetch_details = self.fetch_details,
            output_dir = %self.output_dir.display(),
            has_refresh_token = self.strava.refresh_token.is_some(),
            "Tracker configuration"
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_variants() {
        assert!(parse_bool("K", "YES").unwrap());
        assert!(parse_bool("K", "1").unwrap());
        assert!(!parse_bool("K", "off").unwrap());
        assert!(parse_bool("K", "maybe").is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = TrackerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.lookback_days, 180);
        assert_eq!(config.page_size, 100);
    }

    #[test]
    fn test_identical_markers_rejected() {
        let mut config = TrackerConfig::default();
        config.markers = MarkerConfig::new("X", "X");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_markers_differing_only_by_variation_selector_rejected() {
        let mut config = TrackerConfig::default();
        config.markers = MarkerConfig::new("\u{26d3}", "\u{26d3}\u{fe0f}");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_upsert_env_line_replaces_existing() {
        let contents = "STRAVA_CLIENT_ID=1\nexport STRAVA_REFRESH_TOKEN=old\n# note\n";
        let updated = upsert_env_line(contents, "STRAVA_REFRESH_TOKEN", "new");
        assert_eq!(updated, "STRAVA_CLIENT_ID=1\nSTRAVA_REFRESH_TOKEN=new\n# note\n");
    }

    #[test]
    fn test_upsert_env_line_appends_when_absent() {
        let updated = upsert_env_line("STRAVA_CLIENT_ID=1", "STRAVA_REFRESH_TOKEN", "abc");
        assert_eq!(updated, "STRAVA_CLIENT_ID=1\nSTRAVA_REFRESH_TOKEN=abc\n");
        assert_eq!(upsert_env_line("", "K", "v"), "K=v\n");
    }

    #[test]
    fn test_credentials_name_missing_key() {
        let settings = StravaSettings {
            client_id: Some("1".to_owned()),
            client_secret: Some("s".to_owned()),
            refresh_token: None,
        };
        let error = settings.credentials().unwrap_err();
        assert_eq!(error.details["key"], "STRAVA_REFRESH_TOKEN");
    }
}
