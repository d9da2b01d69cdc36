//! Integration tests for retry functionality.

use super::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

type Attempt = std::future::Ready<Result<u32, &'static str>>;

fn flaky(attempts: Arc<AtomicU32>, failures: u32) -> impl FnMut() -> Attempt {
    move || {
        let n = attempts.fetch_add(1, Ordering::SeqCst);
        if n < failures {
            std::future::ready(Err("transient failure"))
        } else {
            std::future::ready(Ok(42))
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_retry_succeeds_on_third_attempt() {
    let attempts = Arc::new(AtomicU32::new(0));

    let result = retry_with_backoff(
        flaky(attempts.clone(), 2),
        RetryOptions::new(RetryPolicy::default().with_max_attempts(5)),
    )
    .await;

    assert_eq!(result, Ok(42));
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_default_cooldown_is_applied_between_attempts() {
    let attempts = Arc::new(AtomicU32::new(0));
    let start = tokio::time::Instant::now();

    let result = retry_with_backoff(flaky(attempts.clone(), 2), RetryOptions::default()).await;

    assert_eq!(result, Ok(42));
    // Two failures, two cooldowns of 3s each.
    let elapsed = start.elapsed();
    assert!(elapsed >= DEFAULT_COOLDOWN * 2);
    assert!(elapsed < DEFAULT_COOLDOWN * 2 + Duration::from_millis(100));
}

#[tokio::test(start_paused = true)]
async fn test_exhaustion_resolves_with_fallback() {
    let attempts = Arc::new(AtomicU32::new(0));

    let result = retry_with_backoff(
        flaky(attempts.clone(), u32::MAX),
        RetryOptions::new(RetryPolicy::default().with_max_attempts(4)).with_fallback(0),
    )
    .await;

    assert_eq!(result, Ok(0));
    assert_eq!(attempts.load(Ordering::SeqCst), 4);
}

#[tokio::test(start_paused = true)]
async fn test_exhaustion_rejects_when_requested() {
    let attempts = Arc::new(AtomicU32::new(0));

    let result = retry_with_backoff(
        flaky(attempts.clone(), u32::MAX),
        RetryOptions::new(RetryPolicy::default().with_max_attempts(3))
            .with_fallback(0)
            .reject_on_exhaustion()
            .with_label("submit blog"),
    )
    .await;

    let exhausted = result.unwrap_err();
    assert_eq!(exhausted.attempts, 3);
    assert_eq!(exhausted.final_error, Some("transient failure"));
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_no_trailing_cooldown_after_last_attempt() {
    let attempts = Arc::new(AtomicU32::new(0));
    let start = tokio::time::Instant::now();

    let result = retry_with_backoff(
        flaky(attempts, u32::MAX),
        RetryOptions::new(RetryPolicy::constant(Duration::from_secs(1)).with_max_attempts(3)),
    )
    .await;

    let exhausted = result.unwrap_err();
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(2));
    assert!(elapsed < Duration::from_secs(3));
    // Reported on the same clock the cooldowns ran on.
    assert!(exhausted.total_duration >= Duration::from_secs(2));
    assert!(exhausted.total_duration <= elapsed);
}

#[tokio::test]
async fn test_zero_budget_fails_with_no_value() {
    let attempts = Arc::new(AtomicU32::new(0));

    let result = retry_with_backoff(
        flaky(attempts.clone(), 0),
        RetryOptions::new(RetryPolicy::default().with_max_attempts(0)),
    )
    .await;

    let exhausted = result.unwrap_err();
    assert!(exhausted.never_attempted());
    assert_eq!(exhausted.final_error, None);
    assert_eq!(attempts.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_async_attempts_are_sequential() {
    let in_flight = Arc::new(AtomicU32::new(0));
    let attempts = Arc::new(AtomicU32::new(0));

    let result = retry_with_backoff(
        {
            let in_flight = in_flight.clone();
            let attempts = attempts.clone();
            move || {
                let in_flight = in_flight.clone();
                let attempts = attempts.clone();
                async move {
                    assert_eq!(in_flight.fetch_add(1, Ordering::SeqCst), 0);
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    if attempts.fetch_add(1, Ordering::SeqCst) < 3 {
                        Err("receipt not found")
                    } else {
                        Ok("confirmed")
                    }
                }
            }
        },
        RetryOptions::new(RetryPolicy::linear(Duration::from_millis(10)).with_max_attempts(10)),
    )
    .await;

    assert_eq!(result, Ok("confirmed"));
    assert_eq!(attempts.load(Ordering::SeqCst), 4);
}
