//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the travel query service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address, request timeout).
    pub listener: ListenerConfig,

    /// Identifying contact header sent on every outbound request.
    pub contact: ContactConfig,

    /// Upstream provider endpoints.
    pub providers: ProvidersConfig,

    /// Retry configuration for outbound calls.
    pub retries: RetryConfig,

    /// Circuit breaker configuration.
    pub breaker: BreakerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Total timeout for an inbound request in seconds.
    ///
    /// Must cover the slower fan-out side's full retry budget.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 90,
        }
    }
}

/// Contact header configuration.
///
/// Nominatim and Overpass require an identifying User-Agent; sending a
/// generic one gets requests throttled or dropped.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContactConfig {
    /// User-Agent value for all outbound requests.
    /// Overridable via the `WAYPOINT_USER_AGENT` environment variable.
    pub user_agent: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            user_agent: "waypoint/0.1".to_string(),
        }
    }
}

/// Upstream provider endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Geocoding provider (Nominatim-compatible).
    pub geocoding: ProviderConfig,

    /// Weather provider (Open-Meteo-compatible).
    pub weather: ProviderConfig,

    /// Points-of-interest provider (Overpass-compatible).
    pub places: PlacesConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            geocoding: ProviderConfig::default(),
            weather: ProviderConfig {
                base_url: "https://api.open-meteo.com".to_string(),
                timeout_secs: 10,
            },
            places: PlacesConfig::default(),
        }
    }
}

/// A single upstream provider endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of the provider.
    pub base_url: String,

    /// Per-attempt timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Points-of-interest provider endpoint plus query shaping.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlacesConfig {
    /// Base URL of the provider.
    pub base_url: String,

    /// Per-attempt timeout in seconds. Overpass queries are slow; this is
    /// deliberately higher than the other endpoints.
    pub timeout_secs: u64,

    /// Search radius around the destination in meters.
    pub radius_meters: u32,

    /// Maximum number of attractions returned.
    pub max_results: usize,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            base_url: "https://overpass-api.de".to_string(),
            timeout_secs: 20,
            radius_meters: 20_000,
            max_results: 5,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts per call (first try included).
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 700,
            max_delay_ms: 5_000,
        }
    }
}

/// Circuit breaker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BreakerConfig {
    /// Consecutive failures before the breaker opens.
    pub failure_threshold: u32,

    /// How long an open breaker rejects calls before allowing a probe,
    /// in seconds.
    pub cooldown_secs: u64,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            cooldown_secs: 30,
        }
    }
}

impl BreakerConfig {
    /// Cooldown as a `Duration`.
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

impl AppConfig {
    /// Apply environment variable overrides.
    ///
    /// Called by the loader after parsing and by `main` when running on
    /// defaults without a config file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(ua) = std::env::var("WAYPOINT_USER_AGENT") {
            if !ua.trim().is_empty() {
                self.contact.user_agent = ua;
            }
        }
    }
}
