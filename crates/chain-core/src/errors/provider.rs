// ABOUTME: Structured error types for fitness provider operations
// ABOUTME: Provides domain-specific errors with retry information and rate limit handling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use thiserror::Error;

use super::{AppError, ErrorCode};

/// Errors raised while talking to a remote fitness provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Provider API returned a non-success status
    #[error("{provider} API error ({status_code}): {message}")]
    ApiError {
        /// Provider name
        provider: String,
        /// HTTP status returned
        status_code: u16,
        /// Response body or summary
        message: String,
        /// Whether retrying the same request may succeed
        retryable: bool,
    },

    /// Rate limit hit and all retries exhausted
    #[error("{provider} API rate limit exceeded after {attempts} attempts; wait about {retry_after_secs}s")]
    RateLimitExceeded {
        /// Provider name
        provider: String,
        /// Attempts made before giving up
        attempts: u32,
        /// Estimated wait before the limit resets
        retry_after_secs: u64,
    },

    /// Credentials were rejected or could not be refreshed
    #[error("{provider} authentication failed: {reason}")]
    AuthenticationFailed {
        /// Provider name
        provider: String,
        /// Why authentication failed
        reason: String,
    },

    /// A request needed credentials but none were configured
    #[error("{provider} has no credentials configured")]
    NotAuthenticated {
        /// Provider name
        provider: String,
    },

    /// Transport-level failure
    #[error("{provider} network error: {message}")]
    Network {
        /// Provider name
        provider: String,
        /// Underlying failure description
        message: String,
    },

    /// Response body could not be decoded
    #[error("{provider} returned an unparseable {what}: {message}")]
    Parse {
        /// Provider name
        provider: String,
        /// What was being parsed
        what: String,
        /// Decoder message
        message: String,
    },
}

impl ProviderError {
    /// Whether the failed operation may succeed if retried later
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::ApiError { retryable, .. } => *retryable,
            Self::RateLimitExceeded { .. } | Self::Network { .. } => true,
            Self::AuthenticationFailed { .. } | Self::NotAuthenticated { .. } | Self::Parse { .. } => {
                false
            }
        }
    }

    /// Error code this provider failure maps to
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::ApiError { .. } => ErrorCode::ExternalServiceError,
            Self::RateLimitExceeded { .. } => ErrorCode::ExternalRateLimited,
            Self::AuthenticationFailed { .. } | Self::NotAuthenticated { .. } => {
                ErrorCode::ExternalAuthFailed
            }
            Self::Network { .. } => ErrorCode::ExternalServiceUnavailable,
            Self::Parse { .. } => ErrorCode::InvalidFormat,
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(error: ProviderError) -> Self {
        Self::new(error.error_code(), error.to_string()).with_source(error)
    }
}

/// Result alias for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        let limited = ProviderError::RateLimitExceeded {
            provider: "strava".to_owned(),
            attempts: 3,
            retry_after_secs: 900,
        };
        assert!(limited.is_retryable());

        let auth = ProviderError::AuthenticationFailed {
            provider: "strava".to_owned(),
            reason: "invalid refresh token".to_owned(),
        };
        assert!(!auth.is_retryable());
        assert_eq!(auth.error_code(), ErrorCode::ExternalAuthFailed);
    }

    #[test]
    fn test_conversion_to_app_error() {
        let error = ProviderError::ApiError {
            provider: "strava".to_owned(),
            status_code: 500,
            message: "boom".to_owned(),
            retryable: true,
        };
        let app: AppError = error.into();
        assert_eq!(app.code, ErrorCode::ExternalServiceError);
        assert!(app.message.contains("500"));
    }
}
