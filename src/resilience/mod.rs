//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound call:
//!     → circuit_breaker.rs (acquire; open circuit fails fast, no network)
//!     → retry.rs (per-attempt timeout, bounded retry loop)
//!     → backoff.rs (exponential delay with jitter between attempts)
//!     every attempt outcome reported back to circuit_breaker.rs
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every attempt has a deadline
//! - Failures become typed markers, never uncaught faults
//! - Circuit breaker state is per endpoint, shared by all in-flight queries

pub mod backoff;
pub mod circuit_breaker;
pub mod retry;

pub use circuit_breaker::{BreakerRegistry, BreakerState, CircuitBreaker};
pub use retry::{run_with_retries, CallFailure, RetryPolicy};
