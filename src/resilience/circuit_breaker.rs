//! Circuit breaker for upstream protection.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: endpoint assumed down, calls fail fast
//! - Half-Open: testing if the endpoint recovered
//!
//! # State Transitions
//! ```text
//! Closed → Open: consecutive failures >= threshold
//! Open → Half-Open: after cooldown elapses
//! Half-Open → Closed: probe call succeeds
//! Half-Open → Open: probe call fails
//! ```
//!
//! # Design Decisions
//! - Per-endpoint breaker (weather and places trip independently)
//! - Fail fast in Open state, no network touched
//! - Single probe in Half-Open (prevents hammering a recovering endpoint)
//! - A success in Closed clears the failure run; only consecutive failures trip

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use dashmap::DashMap;
use serde::Serialize;
use tokio::time::Instant;

use crate::config::schema::BreakerConfig;
use crate::observability::metrics;

/// Breaker state, as seen by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

impl BreakerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BreakerState::Closed => "closed",
            BreakerState::Open => "open",
            BreakerState::HalfOpen => "half_open",
        }
    }
}

#[derive(Debug)]
struct Inner {
    state: BreakerState,
    failure_count: u32,
    /// Valid only while Open.
    opened_at: Option<Instant>,
    /// Valid only while HalfOpen: a probe has been granted and has not
    /// yet reported back.
    probe_in_flight: bool,
}

/// Failure-tracking state machine for one endpoint.
///
/// Shared by every in-flight query that talks to the endpoint; all state
/// is behind one mutex, and every lock section is short and non-blocking.
#[derive(Debug)]
pub struct CircuitBreaker {
    endpoint: &'static str,
    failure_threshold: u32,
    cooldown: Duration,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    pub fn new(endpoint: &'static str, config: &BreakerConfig) -> Self {
        Self {
            endpoint,
            failure_threshold: config.failure_threshold.max(1),
            cooldown: config.cooldown(),
            inner: Mutex::new(Inner {
                state: BreakerState::Closed,
                failure_count: 0,
                opened_at: None,
                probe_in_flight: false,
            }),
        }
    }

    /// The endpoint this breaker guards.
    pub fn endpoint(&self) -> &'static str {
        self.endpoint
    }

    /// Ask permission to attempt a call.
    ///
    /// Returns `false` without touching the network when the circuit is
    /// open, or when a half-open probe is already in flight. An open
    /// breaker whose cooldown has elapsed moves to Half-Open here and
    /// grants the single probe.
    pub fn try_acquire(&self) -> bool {
        let mut inner = self.locked();
        match inner.state {
            BreakerState::Closed => true,
            BreakerState::Open => {
                let cooled_down = inner
                    .opened_at
                    .map(|at| at.elapsed() >= self.cooldown)
                    .unwrap_or(true);
                if cooled_down {
                    self.transition(&mut inner, BreakerState::HalfOpen);
                    inner.probe_in_flight = true;
                    true
                } else {
                    false
                }
            }
            BreakerState::HalfOpen => {
                if inner.probe_in_flight {
                    false
                } else {
                    inner.probe_in_flight = true;
                    true
                }
            }
        }
    }

    /// Report a successful attempt.
    pub fn record_success(&self) {
        let mut inner = self.locked();
        match inner.state {
            BreakerState::Closed => {
                // A success ends the consecutive-failure run.
                inner.failure_count = 0;
            }
            BreakerState::HalfOpen => {
                inner.probe_in_flight = false;
                inner.failure_count = 0;
                inner.opened_at = None;
                self.transition(&mut inner, BreakerState::Closed);
            }
            // A straggler from before the trip; the cooldown still governs.
            BreakerState::Open => {}
        }
    }

    /// Report a failed attempt.
    pub fn record_failure(&self) {
        let mut inner = self.locked();
        match inner.state {
            BreakerState::Closed => {
                inner.failure_count += 1;
                if inner.failure_count >= self.failure_threshold {
                    inner.opened_at = Some(Instant::now());
                    self.transition(&mut inner, BreakerState::Open);
                }
            }
            BreakerState::HalfOpen => {
                inner.probe_in_flight = false;
                inner.opened_at = Some(Instant::now());
                self.transition(&mut inner, BreakerState::Open);
            }
            BreakerState::Open => {}
        }
    }

    /// Current state snapshot. Does not evaluate cooldown expiry; an open
    /// breaker past its cooldown reads Open until the next acquire.
    pub fn state(&self) -> BreakerState {
        self.locked().state
    }

    /// Current consecutive-failure count.
    pub fn failure_count(&self) -> u32 {
        self.locked().failure_count
    }

    fn transition(&self, inner: &mut Inner, to: BreakerState) {
        let from = inner.state;
        inner.state = to;
        metrics::record_breaker_state(self.endpoint, to);
        match to {
            BreakerState::Open => tracing::warn!(
                endpoint = self.endpoint,
                from = from.as_str(),
                failures = inner.failure_count,
                cooldown_secs = self.cooldown.as_secs(),
                "Circuit breaker opened"
            ),
            _ => tracing::info!(
                endpoint = self.endpoint,
                from = from.as_str(),
                to = to.as_str(),
                "Circuit breaker transition"
            ),
        }
    }

    fn locked(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Serializable view of one breaker, for the admin surface.
#[derive(Debug, Clone, Serialize)]
pub struct BreakerSnapshot {
    pub endpoint: &'static str,
    pub state: &'static str,
    pub failure_count: u32,
}

/// Process-wide registry mapping endpoint identity to its breaker.
///
/// Breakers are created lazily on first use and live until process exit.
#[derive(Debug)]
pub struct BreakerRegistry {
    config: BreakerConfig,
    breakers: DashMap<&'static str, Arc<CircuitBreaker>>,
}

impl BreakerRegistry {
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            config,
            breakers: DashMap::new(),
        }
    }

    /// Get the breaker for an endpoint, creating it on first use.
    pub fn get(&self, endpoint: &'static str) -> Arc<CircuitBreaker> {
        let entry = self
            .breakers
            .entry(endpoint)
            .or_insert_with(|| Arc::new(CircuitBreaker::new(endpoint, &self.config)));
        Arc::clone(entry.value())
    }

    /// Snapshot every known breaker.
    pub fn snapshot(&self) -> Vec<BreakerSnapshot> {
        let mut snapshots: Vec<BreakerSnapshot> = self
            .breakers
            .iter()
            .map(|entry| {
                let breaker = entry.value();
                BreakerSnapshot {
                    endpoint: breaker.endpoint(),
                    state: breaker.state().as_str(),
                    failure_count: breaker.failure_count(),
                }
            })
            .collect();
        snapshots.sort_by_key(|s| s.endpoint);
        snapshots
    }
}
