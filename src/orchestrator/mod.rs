//! Query orchestration.
//!
//! # Data Flow
//! ```text
//! free text → query::parser → geocoding (breaker-guarded)
//!           → coordinator.rs (parallel fan-out: weather ∥ places)
//!           → composer.rs (one user-facing answer)
//! ```

pub mod composer;
pub mod coordinator;

pub use coordinator::Coordinator;
