// ABOUTME: Core provider traits and interfaces for activity data access
// ABOUTME: Defines credentials, provider configuration and listing query parameters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Provider Contract
//!
//! Providers accept standardized request parameters (`ActivityQueryParams`,
//! string ids) and return the shared `Activity` model. Provider-specific
//! response DTOs stay private to each implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::provider::ProviderResult;
use crate::models::Activity;

/// Authentication credentials for `OAuth2` providers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuth2Credentials {
    /// OAuth client ID from provider
    pub client_id: String,
    /// OAuth client secret from provider
    pub client_secret: String,
    /// Current access token
    pub access_token: Option<String>,
    /// Refresh token for obtaining new access tokens
    pub refresh_token: Option<String>,
    /// When the access token expires
    pub expires_at: Option<DateTime<Utc>>,
    /// Granted OAuth scopes
    pub scopes: Vec<String>,
}

impl OAuth2Credentials {
    /// Credentials holding only a long-lived refresh token
    ///
    /// This is the shape loaded from the environment: the first
    /// `refresh_token_if_needed` call exchanges it for an access token.
    #[must_use]
    pub fn from_refresh_token(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            access_token: None,
            refresh_token: Some(refresh_token.into()),
            expires_at: None,
            scopes: Vec::new(),
        }
    }
}

/// Provider configuration containing endpoints and settings
///
/// # Example
///
/// ```rust
/// use chain_providers::core::ProviderConfig;
///
/// let config = ProviderConfig {
///     name: "strava".to_owned(),
///     auth_url: "https://www.strava.com/oauth/authorize".to_owned(),
///     token_url: "https://www.strava.com/oauth/token".to_owned(),
///     api_base_url: "https://www.strava.com/api/v3".to_owned(),
///     revoke_url: None,
///     default_scopes: vec!["activity:read_all".to_owned()],
/// };
/// assert_eq!(config.name, "strava");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider name
    pub name: String,
    /// OAuth authorization endpoint URL
    pub auth_url: String,
    /// OAuth token endpoint URL
    pub token_url: String,
    /// Base URL for provider API calls
    pub api_base_url: String,
    /// Optional token revocation endpoint URL
    pub revoke_url: Option<String>,
    /// Default OAuth scopes requested during authorization
    pub default_scopes: Vec<String>,
}

/// Query parameters for one page of the activity listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityQueryParams {
    /// Only activities that started after this instant
    pub after: Option<DateTime<Utc>>,
    /// Only activities that started before this instant
    pub before: Option<DateTime<Utc>>,
    /// 1-based page number
    pub page: u32,
    /// Page size
    pub per_page: usize,
}

impl ActivityQueryParams {
    /// First page of activities started after `after`
    #[must_use]
    pub const fn since(after: DateTime<Utc>, per_page: usize) -> Self {
        Self {
            after: Some(after),
            before: None,
            page: 1,
            per_page,
        }
    }

    /// The same query advanced by one page
    #[must_use]
    pub fn next_page(&self) -> Self {
        Self {
            page: self.page + 1,
            ..self.clone()
        }
    }
}

/// Unified interface for activity providers
#[async_trait]
pub trait FitnessProvider: Send + Sync {
    /// Provider identifier
    fn name(&self) -> &'static str;

    /// Provider endpoints
    fn config(&self) -> &ProviderConfig;

    /// Install credentials used for subsequent requests
    async fn set_credentials(&self, credentials: OAuth2Credentials) -> ProviderResult<()>;

    /// Whether a non-expired access token is available
    async fn is_authenticated(&self) -> bool;

    /// Exchange the refresh token when the access token is missing or about to expire
    async fn refresh_token_if_needed(&self) -> ProviderResult<()>;

    /// Fetch one page of the activity listing
    async fn get_activities(&self, params: &ActivityQueryParams) -> ProviderResult<Vec<Activity>>;

    /// Fetch a single activity with its detail fields (description)
    async fn get_activity(&self, id: &str) -> ProviderResult<Activity>;
}
