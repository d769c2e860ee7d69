//! Retry Policy
//!
//! Explicit retry wrapper used at every store and provider call site.
//! A policy combines a predicate over the error, an attempt cap and a
//! total time budget, and delegates the actual looping to `tokio_retry`.

use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::RetryIf;

/// How often and for how long a failing operation is retried.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first one (None = no cap)
    pub max_attempts: Option<usize>,
    /// No retry is scheduled once this much time has passed since the first attempt
    pub timeout: Option<Duration>,
    /// Backoff delays are `unit * 2^n` (n starting at 1), capped at `max_delay`
    pub backoff_unit: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Bounded policy for store operations.
    pub fn bounded(max_attempts: usize, timeout: Duration) -> Self {
        Self {
            max_attempts: Some(max_attempts),
            timeout: Some(timeout),
            backoff_unit: Duration::from_millis(50),
            max_delay: Duration::from_secs(1),
        }
    }

    /// Retry forever. Callers must impose their own deadline.
    pub fn unbounded() -> Self {
        Self {
            max_attempts: None,
            timeout: None,
            backoff_unit: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
        }
    }

    pub fn with_backoff(mut self, unit: Duration, max_delay: Duration) -> Self {
        self.backoff_unit = unit;
        self.max_delay = max_delay;
        self
    }

    /// Delays between attempts, honouring the attempt cap and time budget.
    fn delays(&self) -> Box<dyn Iterator<Item = Duration> + Send> {
        let unit_ms = (self.backoff_unit.as_millis() as u64).max(1);
        let backoff = ExponentialBackoff::from_millis(2)
            .factor(unit_ms)
            .max_delay(self.max_delay)
            .map(jitter);

        let capped: Box<dyn Iterator<Item = Duration> + Send> = match self.max_attempts {
            Some(attempts) => Box::new(backoff.take(attempts.saturating_sub(1))),
            None => Box::new(backoff),
        };

        match self.timeout {
            Some(budget) => {
                let started = Instant::now();
                Box::new(capped.take_while(move |delay| started.elapsed() + *delay <= budget))
            }
            None => capped,
        }
    }

    /// Run `action` until it succeeds, fails with an error `is_retryable`
    /// rejects, or the policy is exhausted. The last error is returned.
    pub async fn run<T, E, A, Fut, P>(
        &self,
        operation: &str,
        action: A,
        mut is_retryable: P,
    ) -> Result<T, E>
    where
        A: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: FnMut(&E) -> bool,
        E: fmt::Display,
    {
        let condition = |err: &E| {
            let retry = is_retryable(err);
            if retry {
                tracing::warn!("{} failed, will retry if budget allows: {}", operation, err);
            }
            retry
        };

        RetryIf::spawn(self.delays(), action, condition).await
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::bounded(5, Duration::from_secs(3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn fast(policy: RetryPolicy) -> RetryPolicy {
        policy.with_backoff(Duration::from_millis(1), Duration::from_millis(2))
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, Some(5));
        assert_eq!(policy.timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_bounded_delays_count() {
        let policy = RetryPolicy::bounded(5, Duration::from_secs(60));
        assert_eq!(policy.delays().count(), 4);

        let once = RetryPolicy::bounded(1, Duration::from_secs(60));
        assert_eq!(once.delays().count(), 0);
    }

    #[test]
    fn test_delays_never_exceed_max() {
        let policy = RetryPolicy::unbounded();
        assert!(policy.delays().take(50).all(|d| d <= Duration::from_secs(10)));
    }

    #[test]
    fn test_zero_budget_yields_no_retries() {
        let policy = RetryPolicy::bounded(5, Duration::ZERO)
            .with_backoff(Duration::from_millis(10), Duration::from_millis(10));
        // jitter may produce a zero delay, which still fits a zero budget
        assert!(policy.delays().all(|d| d == Duration::ZERO));
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = Arc::new(AtomicUsize::new(0));
        let policy = fast(RetryPolicy::bounded(5, Duration::from_secs(5)));

        let c = calls.clone();
        let result: Result<&str, String> = policy
            .run(
                "flaky",
                || {
                    let c = c.clone();
                    async move {
                        if c.fetch_add(1, Ordering::SeqCst) < 2 {
                            Err("busy".to_string())
                        } else {
                            Ok("done")
                        }
                    }
                },
                |_| true,
            )
            .await;

        assert_eq!(result, Ok("done"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = Arc::new(AtomicUsize::new(0));
        let policy = fast(RetryPolicy::bounded(5, Duration::from_secs(5)));

        let c = calls.clone();
        let result: Result<(), String> = policy
            .run(
                "always-busy",
                || {
                    let c = c.clone();
                    async move {
                        let n = c.fetch_add(1, Ordering::SeqCst);
                        Err(format!("busy #{}", n))
                    }
                },
                |_| true,
            )
            .await;

        assert_eq!(result, Err("busy #4".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_non_retryable_error_propagates_immediately() {
        let calls = Arc::new(AtomicUsize::new(0));
        let policy = fast(RetryPolicy::bounded(5, Duration::from_secs(5)));

        let c = calls.clone();
        let result: Result<(), String> = policy
            .run(
                "constraint",
                || {
                    let c = c.clone();
                    async move {
                        c.fetch_add(1, Ordering::SeqCst);
                        Err("constraint violation".to_string())
                    }
                },
                |e: &String| e.contains("busy"),
            )
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unbounded_keeps_retrying() {
        let calls = Arc::new(AtomicUsize::new(0));
        let policy = fast(RetryPolicy::unbounded());

        let c = calls.clone();
        let result: Result<usize, String> = policy
            .run(
                "eventually",
                || {
                    let c = c.clone();
                    async move {
                        let n = c.fetch_add(1, Ordering::SeqCst);
                        if n < 20 {
                            Err("503".to_string())
                        } else {
                            Ok(n)
                        }
                    }
                },
                |_| true,
            )
            .await;

        assert_eq!(result, Ok(20));
    }
}
