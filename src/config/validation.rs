//! Configuration validation.
//!
//! Semantic checks only; serde handles syntax. All errors are collected,
//! not just the first.

use rust_decimal::Decimal;
use thiserror::Error;
use url::Url;

use crate::config::schema::ClientConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a configuration, returning every problem found.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(config.api.base_url.trim()) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            "api.base_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new("api.base_url", e.to_string())),
    }

    if config.api.timeout_secs == 0 {
        errors.push(ValidationError::new("api.timeout_secs", "must be greater than 0"));
    }
    if config.api.connect_timeout_secs == 0 {
        errors.push(ValidationError::new("api.connect_timeout_secs", "must be greater than 0"));
    }

    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::new("retries.max_attempts", "must be at least 1"));
    }
    if config.retries.base_delay_ms > config.retries.max_delay_ms {
        errors.push(ValidationError::new(
            "retries.base_delay_ms",
            "must not exceed retries.max_delay_ms",
        ));
    }

    let hundred = Decimal::from(100);
    for (field, value) in [
        ("checkout.processing_fee_percent", config.checkout.processing_fee_percent),
        ("checkout.legal_fee_percent", config.checkout.legal_fee_percent),
    ] {
        if value.is_sign_negative() || value > hundred {
            errors.push(ValidationError::new(field, "must be between 0 and 100"));
        }
    }
    for (field, value) in [
        ("checkout.survey_fee", config.checkout.survey_fee),
        ("checkout.search_fee", config.checkout.search_fee),
    ] {
        if value.is_sign_negative() {
            errors.push(ValidationError::new(field, "must not be negative"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ClientConfig::default();
        config.api.base_url = "ftp://registry.example".into();
        config.api.timeout_secs = 0;
        config.retries.max_attempts = 0;
        config.checkout.legal_fee_percent = Decimal::from(150);

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "api.base_url",
                "api.timeout_secs",
                "retries.max_attempts",
                "checkout.legal_fee_percent"
            ]
        );
    }

    #[test]
    fn test_accepts_padded_url() {
        let mut config = ClientConfig::default();
        config.api.base_url = "\u{2003} https://registry.example/api\n".into();
        assert!(validate_config(&config).is_ok());
        assert!(crate::api::RegistryClient::from_config(&config).is_ok());
    }

    #[test]
    fn test_rejects_unparseable_url() {
        let mut config = ClientConfig::default();
        config.api.base_url = "not a url".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "api.base_url");
    }
}
