//! Bounded Retry
//!
//! Runs an async operation a fixed number of times with a fixed pause in
//! between. The pause is a `tokio` timer, so only the calling task waits.

use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// How many times to try and how long to wait between tries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub const fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }

    /// Policy for finding the PR behind a freshly pushed commit. The search
    /// index can trail the status webhook by tens of seconds.
    pub const fn search() -> Self {
        Self::new(5, Duration::from_secs(10))
    }

    /// Same attempt count, no waiting
    pub const fn immediate(attempts: u32) -> Self {
        Self::new(attempts, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::search()
    }
}

/// Outcome of a single attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt<T> {
    /// Stop and return this value
    Done(T),
    /// Try again; this value is returned if no attempts remain
    Retry(T),
}

/// Call `op` until it reports [`Attempt::Done`] or the policy runs out.
///
/// `op` receives the 1-based attempt number. An `Err` ends the loop
/// immediately. A policy with zero attempts still runs once.
pub async fn retry_until<T, E, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Attempt<T>, E>>,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;

    loop {
        match op(attempt).await? {
            Attempt::Done(value) => return Ok(value),
            Attempt::Retry(value) if attempt >= attempts => return Ok(value),
            Attempt::Retry(_) => {}
        }

        debug!(attempt, attempts, delay = ?policy.delay, "Retrying");
        tokio::time::sleep(policy.delay).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_search_policy() {
        let policy = RetryPolicy::search();
        assert_eq!(policy.attempts, 5);
        assert_eq!(policy.delay, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_exhausts_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, ()> = retry_until(&RetryPolicy::immediate(5), |n| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(Attempt::Retry(n)) }
        })
        .await;

        assert_eq!(result, Ok(5));
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_stops_when_done() {
        let calls = AtomicU32::new(0);
        let result: Result<&str, ()> = retry_until(&RetryPolicy::immediate(5), |n| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 2 {
                    Ok(Attempt::Done("found"))
                } else {
                    Ok(Attempt::Retry("empty"))
                }
            }
        })
        .await;

        assert_eq!(result, Ok("found"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_error_aborts() {
        let calls = AtomicU32::new(0);
        let result: Result<(), &str> = retry_until(&RetryPolicy::immediate(5), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("boom") }
        })
        .await;

        assert_eq!(result, Err("boom"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleeps_between_attempts_only() {
        let delay = Duration::from_secs(10);
        let start = tokio::time::Instant::now();
        let result: Result<u32, ()> = retry_until(&RetryPolicy::new(5, delay), |n| async move {
            Ok(Attempt::Retry(n))
        })
        .await;

        assert_eq!(result, Ok(5));
        assert_eq!(start.elapsed(), delay * 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_sleep_when_first_attempt_succeeds() {
        let start = tokio::time::Instant::now();
        let result: Result<&str, ()> =
            retry_until(&RetryPolicy::new(5, Duration::from_secs(10)), |_| async {
                Ok(Attempt::Done("found"))
            })
            .await;

        assert_eq!(result, Ok("found"));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempts_are_spaced_by_delay() {
        let start = tokio::time::Instant::now();
        let seen = std::sync::Mutex::new(Vec::new());
        let _: Result<(), ()> =
            retry_until(&RetryPolicy::new(3, Duration::from_millis(250)), |_| {
                seen.lock().unwrap().push(start.elapsed());
                async { Ok(Attempt::Retry(())) }
            })
            .await;

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                Duration::ZERO,
                Duration::from_millis(250),
                Duration::from_millis(500),
            ]
        );
    }

    #[tokio::test]
    async fn test_zero_attempts_runs_once() {
        let calls = AtomicU32::new(0);
        let _: Result<(), ()> = retry_until(&RetryPolicy::immediate(0), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(Attempt::Retry(())) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
