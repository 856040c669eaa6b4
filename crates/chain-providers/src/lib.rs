// ABOUTME: Fitness data provider implementation for Strava
// ABOUTME: Core provider trait, retry utilities, shared HTTP client and paged activity streaming
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Fitness data provider implementations and core abstractions.
//!
//! The tracker only needs to list a bounded window of activities, so the
//! provider surface is small: authenticate, refresh, list a page, fetch one.

// Re-export chain-core modules so provider code can keep `use crate::errors::*` etc.
pub use chain_core::constants;
pub use chain_core::errors;
pub use chain_core::models;

/// Streaming activity iterator over paged listings
pub mod activity_iterator;
/// Core provider traits and interfaces
pub mod core;
/// Shared HTTP client for provider API calls
pub mod http_client;
/// Strava API provider implementation
pub mod strava_provider;
/// Provider utility functions (retry, token exchange)
pub mod utils;

pub use activity_iterator::{
    create_activity_stream, ActivityStream, StreamConfig, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
    MIN_PAGE_SIZE,
};
pub use chain_core::errors::provider::{ProviderError, ProviderResult};
pub use core::{ActivityQueryParams, FitnessProvider, OAuth2Credentials, ProviderConfig};
pub use http_client::{client_timeouts, initialize_shared_client, shared_client};
pub use strava_provider::StravaProvider;
pub use utils::RetryConfig;
