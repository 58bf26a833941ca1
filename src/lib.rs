//! Waypoint — a travel query service.
//!
//! Takes a free-text travel query ("I'm going to Bangalore"), extracts a
//! destination and an intent, geocodes the destination, then fans out to a
//! weather provider and a points-of-interest provider concurrently and
//! composes one natural-language answer.
//!
//! The engineering core is the resilience layer around outbound calls:
//! per-attempt timeouts, bounded retry with exponential backoff, and a
//! per-endpoint circuit breaker with cooldown and a half-open probe.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod orchestrator;
pub mod providers;
pub mod query;
pub mod resilience;

pub use config::schema::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use orchestrator::Coordinator;
