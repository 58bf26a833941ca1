//! Resilient call wrapper: per-attempt timeout + bounded retry.
//!
//! # Responsibilities
//! - Enforce a hard deadline on every attempt (a late call is dropped,
//!   not left running)
//! - Retry with exponential backoff up to a fixed attempt budget
//! - Report every attempt outcome to the endpoint's circuit breaker,
//!   independently of the overall call outcome
//!
//! # Design Decisions
//! - The breaker is consulted before every attempt, so a breaker tripped
//!   mid-call (possibly by a concurrent query) stops the retry loop early
//! - Failures become typed markers; the caller never sees a raw fault

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{sleep, timeout, Instant};

use crate::config::schema::RetryConfig;
use crate::observability::metrics;
use crate::resilience::backoff::calculate_backoff;
use crate::resilience::circuit_breaker::CircuitBreaker;

/// Resilience parameters for one endpoint.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Hard upper bound per attempt.
    pub timeout: Duration,
    /// Total attempt budget, first try included.
    pub max_attempts: u32,
    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,
    /// Cap on the backoff delay in milliseconds.
    pub max_delay_ms: u64,
}

impl RetryPolicy {
    /// Build a policy from the endpoint timeout and the shared retry
    /// configuration.
    pub fn new(timeout_secs: u64, retries: &RetryConfig) -> Self {
        Self {
            timeout: Duration::from_secs(timeout_secs),
            max_attempts: retries.max_attempts.max(1),
            base_delay_ms: retries.base_delay_ms,
            max_delay_ms: retries.max_delay_ms,
        }
    }
}

/// Terminal failure marker for one resilient call.
///
/// `Timeout` and `Http` classify a single attempt and travel inside
/// `ExhaustedRetries` as its final cause; the wrapper itself only ever
/// returns `CircuitOpen` or `ExhaustedRetries`.
#[derive(Debug, Error)]
pub enum CallFailure {
    #[error("attempt timed out")]
    Timeout,

    #[error("upstream failure: {0}")]
    Http(String),

    #[error("circuit open for {endpoint}")]
    CircuitOpen { endpoint: &'static str },

    #[error("retries exhausted for {endpoint}, last failure: {last}")]
    ExhaustedRetries {
        endpoint: &'static str,
        last: Box<CallFailure>,
    },
}

/// Run `op` through the breaker-guarded retry loop.
///
/// `op` is invoked once per attempt; each invocation races the policy
/// timeout. Success on any attempt short-circuits. After the attempt
/// budget is spent the last failure is returned wrapped in
/// `ExhaustedRetries`.
pub async fn run_with_retries<T, E, F, Fut>(
    breaker: &CircuitBreaker,
    policy: &RetryPolicy,
    mut op: F,
) -> Result<T, CallFailure>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let endpoint = breaker.endpoint();
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0u32;

    loop {
        attempt += 1;

        if !breaker.try_acquire() {
            tracing::debug!(endpoint, attempt, "Circuit open, rejecting call");
            metrics::record_attempt(endpoint, "circuit_open", None);
            return Err(CallFailure::CircuitOpen { endpoint });
        }

        let started = Instant::now();
        let failure = match timeout(policy.timeout, op()).await {
            Ok(Ok(value)) => {
                breaker.record_success();
                metrics::record_attempt(endpoint, "success", Some(started.elapsed()));
                if attempt > 1 {
                    tracing::info!(endpoint, attempt, "Call succeeded after retries");
                }
                return Ok(value);
            }
            Ok(Err(e)) => {
                tracing::warn!(endpoint, attempt, error = %e, "Attempt failed");
                metrics::record_attempt(endpoint, "http_error", Some(started.elapsed()));
                CallFailure::Http(e.to_string())
            }
            Err(_) => {
                tracing::warn!(
                    endpoint,
                    attempt,
                    timeout = ?policy.timeout,
                    "Attempt timed out"
                );
                metrics::record_attempt(endpoint, "timeout", Some(started.elapsed()));
                CallFailure::Timeout
            }
        };
        breaker.record_failure();

        if attempt >= max_attempts {
            return Err(CallFailure::ExhaustedRetries {
                endpoint,
                last: Box::new(failure),
            });
        }

        let delay = calculate_backoff(attempt, policy.base_delay_ms, policy.max_delay_ms);
        tracing::debug!(endpoint, attempt, delay = ?delay, "Backing off before retry");
        sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::BreakerConfig;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    fn breaker() -> CircuitBreaker {
        CircuitBreaker::new("test", &BreakerConfig::default())
    }

    fn policy() -> RetryPolicy {
        RetryPolicy {
            timeout: Duration::from_secs(1),
            max_attempts: 3,
            base_delay_ms: 100,
            max_delay_ms: 2_000,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_transient_failures() {
        let breaker = breaker();
        let calls = AtomicU32::new(0);
        let attempt_times: Mutex<Vec<Instant>> = Mutex::new(Vec::new());

        let result = run_with_retries(&breaker, &policy(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            attempt_times.lock().unwrap().push(Instant::now());
            async move {
                if n < 2 {
                    Err("503 Service Unavailable".to_string())
                } else {
                    Ok("fine")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "fine");
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        // Backoff observed before attempt 2 and attempt 3 only, doubling.
        let times = attempt_times.lock().unwrap();
        let gap1 = times[1] - times[0];
        let gap2 = times[2] - times[1];
        assert!(gap1 >= Duration::from_millis(100) && gap1 < Duration::from_millis(200));
        assert!(gap2 >= Duration::from_millis(200) && gap2 < Duration::from_millis(400));

        // The two early failures were reported, then cleared by the success.
        assert_eq!(breaker.failure_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn success_on_first_attempt_short_circuits() {
        let breaker = breaker();
        let calls = AtomicU32::new(0);
        let started = Instant::now();

        let result: Result<u32, CallFailure> = run_with_retries(&breaker, &policy(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, String>(7) }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(started.elapsed(), Duration::ZERO, "no backoff slept");
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_after_max_attempts() {
        let breaker = breaker();
        let calls = AtomicU32::new(0);

        let result: Result<(), CallFailure> = run_with_retries(&breaker, &policy(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("boom".to_string()) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match result.unwrap_err() {
            CallFailure::ExhaustedRetries { endpoint, last } => {
                assert_eq!(endpoint, "test");
                assert!(matches!(*last, CallFailure::Http(_)));
            }
            other => panic!("expected ExhaustedRetries, got {other:?}"),
        }
        // Three consecutive failures tripped the default-threshold breaker.
        assert!(!breaker.try_acquire());
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_is_a_failure() {
        let breaker = breaker();
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy {
            timeout: Duration::from_millis(50),
            max_attempts: 2,
            base_delay_ms: 10,
            max_delay_ms: 100,
        };

        let result: Result<(), CallFailure> = run_with_retries(&breaker, &policy, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                std::future::pending::<()>().await;
                Ok::<_, String>(())
            }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        match result.unwrap_err() {
            CallFailure::ExhaustedRetries { last, .. } => {
                assert!(matches!(*last, CallFailure::Timeout));
            }
            other => panic!("expected ExhaustedRetries, got {other:?}"),
        }
        assert_eq!(breaker.failure_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn open_circuit_rejects_without_invoking() {
        let breaker = breaker();
        for _ in 0..3 {
            breaker.record_failure();
        }
        let calls = AtomicU32::new(0);

        let result: Result<(), CallFailure> = run_with_retries(&breaker, &policy(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, String>(()) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 0, "no network call attempted");
        assert!(matches!(
            result.unwrap_err(),
            CallFailure::CircuitOpen { endpoint: "test" }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn breaker_tripped_mid_call_stops_retrying() {
        // Threshold 2: the call's own first two failures open the circuit,
        // so the third attempt is rejected before touching the network.
        let breaker = CircuitBreaker::new(
            "test",
            &BreakerConfig {
                failure_threshold: 2,
                cooldown_secs: 30,
            },
        );
        let calls = AtomicU32::new(0);

        let result: Result<(), CallFailure> = run_with_retries(&breaker, &policy(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("boom".to_string()) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(matches!(result.unwrap_err(), CallFailure::CircuitOpen { .. }));
    }
}
