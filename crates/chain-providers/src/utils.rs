// ABOUTME: Shared utilities for provider implementations
// ABOUTME: Rate-limit retry with exponential backoff, token refresh and code exchange
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{TimeZone, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::core::OAuth2Credentials;
use crate::errors::provider::{ProviderError, ProviderResult};

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts before giving up
    pub max_retries: u32,
    /// Initial backoff delay in milliseconds, doubled on each retry
    pub initial_backoff_ms: u64,
    /// HTTP status codes that should trigger retries
    pub retryable_status_codes: Vec<StatusCode>,
    /// Estimated block duration for user-facing error messages (seconds)
    pub estimated_block_duration_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 1000,
            retryable_status_codes: vec![StatusCode::TOO_MANY_REQUESTS],
            // Strava's short-term limit window
            estimated_block_duration_secs: 900,
        }
    }
}

impl RetryConfig {
    /// Backoff before retry number `attempt` (1-based)
    #[must_use]
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2_u64.saturating_pow(attempt.saturating_sub(1));
        Duration::from_millis(self.initial_backoff_ms.saturating_mul(factor))
    }
}

fn network_error(provider_name: &str, error: &reqwest::Error) -> ProviderError {
    ProviderError::Network {
        provider: provider_name.to_owned(),
        message: error.to_string(),
    }
}

async fn parse_json<T>(response: Response, provider_name: &str, what: &str) -> ProviderResult<T>
where
    T: for<'de> Deserialize<'de>,
{
    response.json().await.map_err(|e| {
        error!("Failed to parse {provider_name} {what}: {e}");
        ProviderError::Parse {
            provider: provider_name.to_owned(),
            what: what.to_owned(),
            message: e.to_string(),
        }
    })
}

/// Make an authenticated HTTP GET request with retry logic
///
/// Statuses listed in `retry_config.retryable_status_codes` are retried with
/// exponential backoff; any other non-success status fails immediately.
///
/// # Errors
///
/// Returns an error if:
/// - All retry attempts are exhausted
/// - The network request fails
/// - The API returns a non-success status
/// - Response parsing fails
pub async fn api_request_with_retry<T>(
    client: &Client,
    url: &str,
    query: &[(&str, String)],
    access_token: &str,
    provider_name: &str,
    retry_config: &RetryConfig,
) -> ProviderResult<T>
where
    T: for<'de> Deserialize<'de>,
{
    debug!("Starting {provider_name} API request to: {url}");

    let mut attempt = 0;
    loop {
        let response = client
            .get(url)
            .query(query)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| network_error(provider_name, &e))?;

        let status = response.status();
        debug!("Received HTTP response with status: {status}");

        if retry_config.retryable_status_codes.contains(&status) {
            attempt += 1;
            if attempt >= retry_config.max_retries {
                let max_retries = retry_config.max_retries;
                warn!("{provider_name} API rate limit exceeded - max retries ({max_retries}) reached");
                return Err(ProviderError::RateLimitExceeded {
                    provider: provider_name.to_owned(),
                    attempts: attempt,
                    retry_after_secs: retry_config.estimated_block_duration_secs,
                });
            }

            let backoff = retry_config.backoff_for(attempt);
            let max_retries = retry_config.max_retries;
            let status_code = status.as_u16();
            warn!(
                "{provider_name} API rate limit hit ({status_code}) - retry {attempt}/{max_retries} after {}ms backoff",
                backoff.as_millis()
            );

            tokio::time::sleep(backoff).await;
            continue;
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("{provider_name} API request failed - status: {status}, body: {text}");
            return Err(status_error(provider_name, status, text));
        }

        return parse_json(response, provider_name, "API response").await;
    }
}

fn status_error(provider_name: &str, status: StatusCode, body: String) -> ProviderError {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return ProviderError::AuthenticationFailed {
            provider: provider_name.to_owned(),
            reason: format!("{status}: {body}"),
        };
    }
    ProviderError::ApiError {
        provider: provider_name.to_owned(),
        status_code: status.as_u16(),
        message: body,
        retryable: status.is_server_error(),
    }
}

/// Token endpoint response shared by refresh and code exchange
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    /// Short-lived access token
    pub access_token: String,
    /// Refresh token; Strava may rotate it on every refresh
    pub refresh_token: Option<String>,
    /// Seconds until the access token expires
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Absolute expiry as a unix timestamp
    #[serde(default)]
    pub expires_at: Option<i64>,
    /// Space or comma separated scopes, when reported
    #[serde(default)]
    pub scope: Option<String>,
}

impl TokenResponse {
    fn into_credentials(self, client_id: &str, client_secret: &str) -> OAuth2Credentials {
        let expires_at = self
            .expires_at
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
            .or_else(|| {
                self.expires_in
                    .map(|secs| Utc::now() + chrono::Duration::seconds(secs))
            });

        let scopes = self
            .scope
            .map(|s| {
                s.split([',', ' '])
                    .filter(|part| !part.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        OAuth2Credentials {
            client_id: client_id.to_owned(),
            client_secret: client_secret.to_owned(),
            access_token: Some(self.access_token),
            refresh_token: self.refresh_token,
            expires_at,
            scopes,
        }
    }
}

async fn post_token_request(
    request: RequestBuilder,
    client_id: &str,
    client_secret: &str,
    provider_name: &str,
    operation: &str,
) -> ProviderResult<OAuth2Credentials> {
    let response = request
        .send()
        .await
        .map_err(|e| network_error(provider_name, &e))?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        error!("{provider_name} {operation} failed - status: {status}, body: {text}");
        return Err(ProviderError::AuthenticationFailed {
            provider: provider_name.to_owned(),
            reason: format!("{operation} failed with status {status}"),
        });
    }

    let token: TokenResponse = parse_json(response, provider_name, "token response").await?;
    Ok(token.into_credentials(client_id, client_secret))
}

/// Refresh an `OAuth2` access token using a refresh token
///
/// # Errors
///
/// Returns an error if the request fails, the token endpoint rejects the
/// refresh token, or the response cannot be parsed.
pub async fn refresh_oauth_token(
    client: &Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
    refresh_token: &str,
    provider_name: &str,
) -> ProviderResult<OAuth2Credentials> {
    info!("Refreshing {provider_name} access token");

    let params = [
        ("client_id", client_id),
        ("client_secret", client_secret),
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
    ];

    let mut credentials = post_token_request(
        client.post(token_url).form(&params),
        client_id,
        client_secret,
        provider_name,
        "token refresh",
    )
    .await?;

    // Some token endpoints omit the refresh token when it did not rotate
    if credentials.refresh_token.is_none() {
        credentials.refresh_token = Some(refresh_token.to_owned());
    }
    Ok(credentials)
}

/// Exchange an authorization code for access and refresh tokens
///
/// # Errors
///
/// Returns an error if the request fails, the code is rejected, or the
/// response cannot be parsed.
pub async fn exchange_authorization_code(
    client: &Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
    code: &str,
    provider_name: &str,
) -> ProviderResult<OAuth2Credentials> {
    info!("Exchanging {provider_name} authorization code");

    let params = [
        ("client_id", client_id),
        ("client_secret", client_secret),
        ("code", code),
        ("grant_type", "authorization_code"),
    ];

    post_token_request(
        client.post(token_url).form(&params),
        client_id,
        client_secret,
        provider_name,
        "authorization code exchange",
    )
    .await
}

/// Whether credentials need a refresh before the next request
///
/// True when there is no access token yet, or it expires within the threshold.
#[must_use]
pub fn needs_token_refresh(
    credentials: Option<&OAuth2Credentials>,
    refresh_threshold_minutes: i64,
) -> bool {
    credentials.is_some_and(|creds| {
        creds.access_token.is_none()
            || creds.expires_at.is_some_and(|expires_at| {
                Utc::now() + chrono::Duration::minutes(refresh_threshold_minutes) > expires_at
            })
    })
}

/// Check if credentials hold a usable access token
#[must_use]
pub fn is_authenticated(credentials: Option<&OAuth2Credentials>) -> bool {
    credentials.is_some_and(|creds| {
        creds.access_token.is_some()
            && creds
                .expires_at
                .is_none_or(|expires_at| Utc::now() < expires_at)
    })
}
