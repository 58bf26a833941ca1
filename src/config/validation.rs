//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, attempts >= 1)
//! - Check addresses and URLs actually parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before a config is accepted into the system (startup and reload)

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

fn err(field: &'static str, message: impl Into<String>) -> ValidationError {
    ValidationError {
        field,
        message: message.into(),
    }
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(err(
            "listener.bind_address",
            format!("not a valid socket address: '{}'", config.listener.bind_address),
        ));
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(err("listener.request_timeout_secs", "must be greater than zero"));
    }

    if config.contact.user_agent.trim().is_empty() {
        errors.push(err("contact.user_agent", "must not be empty"));
    }

    check_base_url("providers.geocoding.base_url", &config.providers.geocoding.base_url, &mut errors);
    check_base_url("providers.weather.base_url", &config.providers.weather.base_url, &mut errors);
    check_base_url("providers.places.base_url", &config.providers.places.base_url, &mut errors);

    if config.providers.geocoding.timeout_secs == 0 {
        errors.push(err("providers.geocoding.timeout_secs", "must be greater than zero"));
    }
    if config.providers.weather.timeout_secs == 0 {
        errors.push(err("providers.weather.timeout_secs", "must be greater than zero"));
    }
    if config.providers.places.timeout_secs == 0 {
        errors.push(err("providers.places.timeout_secs", "must be greater than zero"));
    }
    if config.providers.places.radius_meters == 0 {
        errors.push(err("providers.places.radius_meters", "must be greater than zero"));
    }
    if config.providers.places.max_results == 0 {
        errors.push(err("providers.places.max_results", "must be at least 1"));
    }

    if config.retries.max_attempts == 0 {
        errors.push(err("retries.max_attempts", "must be at least 1"));
    }
    if config.retries.max_delay_ms < config.retries.base_delay_ms {
        errors.push(err(
            "retries.max_delay_ms",
            "must be greater than or equal to base_delay_ms",
        ));
    }

    if config.breaker.failure_threshold == 0 {
        errors.push(err("breaker.failure_threshold", "must be at least 1"));
    }
    if config.breaker.cooldown_secs == 0 {
        errors.push(err("breaker.cooldown_secs", "must be greater than zero"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(err(
            "observability.metrics_address",
            format!("not a valid socket address: '{}'", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_base_url(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    match Url::parse(value) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(err(field, format!("unsupported scheme '{}'", url.scheme()))),
        Err(e) => errors.push(err(field, format!("not a valid URL: {e}"))),
    }
}
