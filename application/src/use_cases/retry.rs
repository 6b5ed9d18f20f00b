//! Retry with exponential backoff.

use crate::config::RetryPolicy;
use std::fmt::Display;
use std::future::Future;
use tracing::warn;

/// Run `op` up to `policy.max_tries()` times.
///
/// Sleeps `initial_delay`, then twice that, then four times, between
/// attempts. `op` receives the 1-based attempt number. On exhaustion the
/// last error is returned. `should_retry` lets callers stop early on
/// errors that will not improve.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: &RetryPolicy,
    should_retry: impl Fn(&E) -> bool,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < policy.max_tries() && should_retry(&e) => {
                let delay = policy.delay_after(attempt);
                warn!(
                    attempt,
                    max_tries = policy.max_tries(),
                    delay_ms = delay.as_millis() as u64,
                    "Attempt failed, retrying: {}",
                    e
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn always_failing_op_is_tried_three_times_with_growing_waits() {
        let policy = RetryPolicy::default();
        let attempts: Mutex<Vec<Instant>> = Mutex::new(Vec::new());

        let result: Result<(), String> = retry_with_backoff(
            &policy,
            |_| true,
            |attempt| {
                attempts.lock().unwrap().push(Instant::now());
                async move { Err(format!("fail {}", attempt)) }
            },
        )
        .await;

        assert_eq!(result, Err("fail 3".to_string()));
        let times = attempts.lock().unwrap();
        assert_eq!(times.len(), 3);
        let first_wait = times[1] - times[0];
        let second_wait = times[2] - times[1];
        assert_eq!(first_wait, Duration::from_secs(1));
        assert_eq!(second_wait, Duration::from_secs(2));
        assert!(second_wait >= first_wait);
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_transient_failure() {
        let policy = RetryPolicy::default();
        let result: Result<u32, String> = retry_with_backoff(&policy, |_| true, |attempt| async move {
            if attempt < 2 {
                Err("flaky".to_string())
            } else {
                Ok(attempt)
            }
        })
        .await;
        assert_eq!(result, Ok(2));
    }

    #[tokio::test(start_paused = true)]
    async fn non_retryable_error_stops_immediately() {
        let policy = RetryPolicy::default();
        let calls = Mutex::new(0);
        let result: Result<(), String> = retry_with_backoff(
            &policy,
            |e: &String| e != "fatal",
            |_| {
                *calls.lock().unwrap() += 1;
                async { Err("fatal".to_string()) }
            },
        )
        .await;
        assert!(result.is_err());
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn single_try_policy_does_not_sleep() {
        let result: Result<(), &str> =
            retry_with_backoff(&RetryPolicy::no_retry(), |_| true, |_| async { Err("no") }).await;
        assert_eq!(result, Err("no"));
    }
}
