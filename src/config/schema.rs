//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Hosted backend used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "https://enugu-registry-backend.onrender.com/api";

/// Root configuration for the registry client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend endpoint and HTTP settings.
    pub api: ApiConfig,

    /// Retry configuration for idempotent requests.
    pub retries: RetryConfig,

    /// Local session persistence.
    pub session: SessionConfig,

    /// Fee schedule and simulated payment settings.
    pub checkout: CheckoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Backend endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.
    pub base_url: String,

    /// Total time for request and response, in seconds.
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// User-Agent header value.
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: concat!("registry-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Enable retries.
    pub enabled: bool,

    /// Maximum number of attempts, first one included.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            base_delay_ms: 200,
            max_delay_ms: 2000,
        }
    }
}

/// Session store configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SessionConfig {
    /// Session file. Defaults to `$HOME/.registry-client/session.json`.
    pub path: Option<PathBuf>,
}

impl SessionConfig {
    /// Resolve the session file, if any location is available.
    pub fn resolved_path(&self) -> Option<PathBuf> {
        self.path.clone().or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".registry-client").join("session.json"))
        })
    }
}

/// Checkout fee schedule.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CheckoutConfig {
    /// Processing fee as a percentage of the plot price.
    pub processing_fee_percent: Decimal,

    /// Legal/documentation fee as a percentage of the plot price.
    pub legal_fee_percent: Decimal,

    /// Flat survey fee.
    pub survey_fee: Decimal,

    /// Flat fee for an estate title search.
    pub search_fee: Decimal,

    /// Currency code shown alongside amounts.
    pub currency: String,

    /// How long the simulated payment gateway takes, in milliseconds.
    pub simulated_delay_ms: u64,

    /// Also record the transaction with the backend when logged in.
    pub sync_with_backend: bool,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            processing_fee_percent: Decimal::new(25, 1),
            legal_fee_percent: Decimal::from(5),
            survey_fee: Decimal::from(50_000),
            search_fee: Decimal::from(5_000),
            currency: "NGN".to_string(),
            simulated_delay_ms: 2000,
            sync_with_backend: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}
