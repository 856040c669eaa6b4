// ABOUTME: Strava API provider implementation using the unified provider architecture
// ABOUTME: Handles OAuth2 token refresh, paged activity listing and activity detail fetches
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info};
use url::Url;

use crate::constants::oauth_providers;
use crate::core::{ActivityQueryParams, FitnessProvider, OAuth2Credentials, ProviderConfig};
use crate::errors::provider::{ProviderError, ProviderResult};
use crate::http_client::shared_client;
use crate::models::{Activity, ActivityBuilder, SportType};
use crate::utils::{self, RetryConfig};

/// Minutes before expiry at which the access token is refreshed
const REFRESH_THRESHOLD_MINUTES: i64 = 5;

/// Strava's upper bound on `per_page`
const STRAVA_MAX_PER_PAGE: usize = 200;

/// Strava API response for activity data (summary and detailed representations)
#[derive(Debug, Deserialize)]
struct StravaActivityResponse {
    id: u64,
    name: String,
    #[serde(rename = "type")]
    activity_type: String,
    #[serde(default)]
    sport_type: Option<String>,
    start_date: String,
    #[serde(default)]
    distance: Option<f64>,
    // Only present on the detailed representation
    #[serde(default)]
    description: Option<String>,
}

impl StravaActivityResponse {
    fn into_activity(self) -> ProviderResult<Activity> {
        let start_date = DateTime::parse_from_rfc3339(&self.start_date)
            .map_err(|e| ProviderError::Parse {
                provider: oauth_providers::STRAVA.to_owned(),
                what: format!("start_date of activity {}", self.id),
                message: e.to_string(),
            })?
            .with_timezone(&Utc);

        // `sport_type` is the finer-grained field; `type` is kept for older payloads
        let sport = self.sport_type.as_deref().unwrap_or(&self.activity_type);

        Ok(ActivityBuilder::new(
            self.id.to_string(),
            self.name,
            SportType::from_provider_string(sport),
            start_date,
            oauth_providers::STRAVA,
        )
        .distance_meters_opt(self.distance)
        .description_opt(self.description.filter(|d| !d.is_empty()))
        .build())
    }
}

/// Strava provider implementation
pub struct StravaProvider {
    config: ProviderConfig,
    credentials: RwLock<Option<OAuth2Credentials>>,
    client: Client,
    retry_config: RetryConfig,
}

impl StravaProvider {
    /// Create a new Strava provider with default configuration
    #[must_use]
    pub fn new() -> Self {
        let config = ProviderConfig {
            name: oauth_providers::STRAVA.to_owned(),
            auth_url: oauth_providers::STRAVA_AUTH_URL.to_owned(),
            token_url: oauth_providers::STRAVA_TOKEN_URL.to_owned(),
            api_base_url: oauth_providers::STRAVA_API_BASE_URL.to_owned(),
            revoke_url: Some(oauth_providers::STRAVA_REVOKE_URL.to_owned()),
            default_scopes: oauth_providers::STRAVA_DEFAULT_SCOPES
                .split(',')
                .map(str::to_owned)
                .collect(),
        };
        Self::with_config(config)
    }

    /// Create provider with custom configuration (e.g. a mock server's URLs)
    #[must_use]
    pub fn with_config(config: ProviderConfig) -> Self {
        Self {
            config,
            credentials: RwLock::new(None),
            client: shared_client().clone(),
            retry_config: RetryConfig::default(),
        }
    }

    /// Replace the retry policy used for API requests
    #[must_use]
    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    /// Build the URL the user opens to authorize this application
    ///
    /// # Errors
    ///
    /// Returns an error if the configured authorization URL is not a valid URL.
    pub fn authorization_url(
        &self,
        client_id: &str,
        redirect_uri: &str,
        state: Option<&str>,
    ) -> ProviderResult<String> {
        let scope = self.config.default_scopes.join(",");
        let mut params = vec![
            ("client_id", client_id),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
            ("approval_prompt", "force"),
            ("scope", scope.as_str()),
        ];
        if let Some(state) = state {
            params.push(("state", state));
        }

        Url::parse_with_params(&self.config.auth_url, &params)
            .map(String::from)
            .map_err(|e| ProviderError::Parse {
                provider: oauth_providers::STRAVA.to_owned(),
                what: "authorization URL".to_owned(),
                message: e.to_string(),
            })
    }

    /// Exchange an authorization code and install the resulting credentials
    ///
    /// # Errors
    ///
    /// Returns an error if Strava rejects the code or the response is malformed.
    pub async fn exchange_code(
        &self,
        client_id: &str,
        client_secret: &str,
        code: &str,
    ) -> ProviderResult<OAuth2Credentials> {
        let credentials = utils::exchange_authorization_code(
            &self.client,
            &self.config.token_url,
            client_id,
            client_secret,
            code,
            oauth_providers::STRAVA,
        )
        .await?;

        *self.credentials.write().await = Some(credentials.clone());
        Ok(credentials)
    }

    /// Current credentials, if any have been installed
    pub async fn credentials(&self) -> Option<OAuth2Credentials> {
        self.credentials.read().await.clone()
    }

    async fn access_token(&self) -> ProviderResult<String> {
        self.credentials
            .read()
            .await
            .as_ref()
            .and_then(|c| c.access_token.clone())
            .ok_or_else(|| ProviderError::NotAuthenticated {
                provider: oauth_providers::STRAVA.to_owned(),
            })
    }

    /// Make an authenticated GET request against the API base URL
    async fn api_request<T>(&self, endpoint: &str, query: &[(&str, String)]) -> ProviderResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        self.refresh_token_if_needed().await?;
        let access_token = self.access_token().await?;

        let url = format!(
            "{}/{}",
            self.config.api_base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );

        utils::api_request_with_retry(
            &self.client,
            &url,
            query,
            &access_token,
            oauth_providers::STRAVA,
            &self.retry_config,
        )
        .await
    }
}

impl Default for StravaProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FitnessProvider for StravaProvider {
    fn name(&self) -> &'static str {
        oauth_providers::STRAVA
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn set_credentials(&self, credentials: OAuth2Credentials) -> ProviderResult<()> {
        info!("Setting Strava credentials");
        *self.credentials.write().await = Some(credentials);
        Ok(())
    }

    async fn is_authenticated(&self) -> bool {
        utils::is_authenticated(self.credentials.read().await.as_ref())
    }

    async fn refresh_token_if_needed(&self) -> ProviderResult<()> {
        let mut guard = self.credentials.write().await;
        let Some(credentials) = guard.as_ref() else {
            return Err(ProviderError::NotAuthenticated {
                provider: oauth_providers::STRAVA.to_owned(),
            });
        };

        if !utils::needs_token_refresh(Some(credentials), REFRESH_THRESHOLD_MINUTES) {
            return Ok(());
        }

        let refresh_token =
            credentials
                .refresh_token
                .as_deref()
                .ok_or_else(|| ProviderError::AuthenticationFailed {
                    provider: oauth_providers::STRAVA.to_owned(),
                    reason: "access token expired and no refresh token is available".to_owned(),
                })?;

        let mut refreshed = utils::refresh_oauth_token(
            &self.client,
            &self.config.token_url,
            &credentials.client_id,
            &credentials.client_secret,
            refresh_token,
            oauth_providers::STRAVA,
        )
        .await?;

        if refreshed.scopes.is_empty() {
            refreshed.scopes.clone_from(&credentials.scopes);
        }
        *guard = Some(refreshed);
        Ok(())
    }

    async fn get_activities(&self, params: &ActivityQueryParams) -> ProviderResult<Vec<Activity>> {
        let per_page = params.per_page.clamp(1, STRAVA_MAX_PER_PAGE);
        let mut query = vec![
            ("page", params.page.to_string()),
            ("per_page", per_page.to_string()),
        ];
        if let Some(after) = params.after {
            query.push(("after", after.timestamp().to_string()));
        }
        if let Some(before) = params.before {
            query.push(("before", before.timestamp().to_string()));
        }

        let page: Vec<StravaActivityResponse> =
            self.api_request("athlete/activities", &query).await?;
        debug!(page = params.page, count = page.len(), "Fetched Strava activity page");

        page.into_iter()
            .map(StravaActivityResponse::into_activity)
            .collect()
    }

    async fn get_activity(&self, id: &str) -> ProviderResult<Activity> {
        let endpoint = format!("activities/{id}");
        let activity: StravaActivityResponse = self.api_request(&endpoint, &[]).await?;
        activity.into_activity()
    }
}
