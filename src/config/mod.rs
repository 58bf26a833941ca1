//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! TOML file → loader.rs (parse, env overrides)
//!           → validation.rs (semantic checks, all errors reported)
//!           → ArcSwap<AppConfig> handle (hot-swapped by watcher.rs)
//! ```

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

use std::sync::Arc;

use arc_swap::ArcSwap;

pub use loader::{load_config, ConfigError};
pub use schema::AppConfig;

/// Shared, hot-swappable handle to the current configuration.
///
/// Readers take a cheap snapshot per operation; the watcher swaps in a
/// freshly validated config on file change.
pub type ConfigHandle = Arc<ArcSwap<AppConfig>>;

/// Wrap a configuration in a swappable handle.
pub fn new_handle(config: AppConfig) -> ConfigHandle {
    Arc::new(ArcSwap::from_pointee(config))
}
