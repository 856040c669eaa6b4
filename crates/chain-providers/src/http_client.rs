// ABOUTME: Shared HTTP client with connection pooling for Strava API calls
// ABOUTME: Lazily built singleton whose timeouts can be set once at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use reqwest::{Client, ClientBuilder};
use std::sync::OnceLock;
use std::time::Duration;

use crate::constants::defaults::{HTTP_CONNECT_TIMEOUT_SECS, HTTP_TIMEOUT_SECS};

/// User agent sent with every provider request
const USER_AGENT: &str = concat!("chain-tracker/", env!("CARGO_PKG_VERSION"));

static CLIENT_TIMEOUTS: OnceLock<(u64, u64)> = OnceLock::new();

static SHARED_CLIENT: OnceLock<Client> = OnceLock::new();

/// Set the timeouts used when the shared client is first built
///
/// Has no effect once `shared_client()` has been called.
pub fn initialize_shared_client(timeout_secs: u64, connect_timeout_secs: u64) {
    let _ = CLIENT_TIMEOUTS.set((timeout_secs, connect_timeout_secs));
}

/// Request and connect timeouts, in seconds, the shared client is built with
#[must_use]
pub fn client_timeouts() -> (u64, u64) {
    CLIENT_TIMEOUTS
        .get()
        .copied()
        .unwrap_or((HTTP_TIMEOUT_SECS, HTTP_CONNECT_TIMEOUT_SECS))
}

/// Get the shared HTTP client for provider API calls
pub fn shared_client() -> &'static Client {
    SHARED_CLIENT.get_or_init(|| {
        let (timeout, connect_timeout) = client_timeouts();

        ClientBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout))
            .connect_timeout(Duration::from_secs(connect_timeout))
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_initialization_sets_timeouts() {
        initialize_shared_client(5, 2);
        initialize_shared_client(60, 20);
        assert_eq!(client_timeouts(), (5, 2));
    }
}
