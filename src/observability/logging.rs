//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at startup
//! - Respect `RUST_LOG` when set, fall back to the configured level
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - Environment always wins over config, so operators can raise
//!   verbosity without touching the file

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// `level` is the configured default (e.g. "info"); it scopes this crate
/// and quiets tower_http unless the environment overrides.
pub fn init(level: &str) {
    let default_directive = format!("waypoint={level},tower_http=info");
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
