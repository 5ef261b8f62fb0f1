//! Retry policy.
//!
//! Only idempotent requests are retried. Connection errors and timeouts are
//! always retryable; among status codes only 429, 502, 503 and 504 are.

use reqwest::{Method, StatusCode};
use std::time::Duration;

use crate::config::RetryConfig;
use crate::resilience::backoff::Backoff;

/// Whether a request with this outcome may be sent again.
pub fn is_retryable(method: &Method, status: Option<StatusCode>, connection_error: bool) -> bool {
    if !method.is_idempotent() {
        return false;
    }
    if connection_error {
        return true;
    }
    matches!(
        status,
        Some(StatusCode::TOO_MANY_REQUESTS)
            | Some(StatusCode::BAD_GATEWAY)
            | Some(StatusCode::SERVICE_UNAVAILABLE)
            | Some(StatusCode::GATEWAY_TIMEOUT)
    )
}

/// Bounded retry-with-backoff policy derived from [`RetryConfig`].
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Backoff,
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: if config.enabled { config.max_attempts.max(1) } else { 1 },
            backoff: Backoff::from_millis(config.base_delay_ms, config.max_delay_ms),
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            backoff: Backoff::new(Duration::ZERO, Duration::ZERO),
        }
    }

    /// Attempts allowed for `method`, first one included.
    pub fn max_attempts_for(&self, method: &Method) -> u32 {
        if method.is_idempotent() {
            self.max_attempts
        } else {
            1
        }
    }

    /// Delay before the next attempt, or `None` when attempts are exhausted.
    pub fn next_delay(&self, method: &Method, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts_for(method) {
            return None;
        }
        Some(self.backoff.delay(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}
