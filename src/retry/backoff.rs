//! Retry executor.

use std::future::Future;

use tokio::time::Instant;

use crate::retry::{RetryExhausted, RetryPolicy};

/// Options for [`retry_with_backoff`].
///
/// Defaults: [`RetryPolicy::default`] (3s constant cooldown, 20 attempts),
/// no fallback, resolve instead of reject on exhaustion, no label.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryOptions<T> {
    policy: RetryPolicy,
    fallback: Option<T>,
    reject_on_exhaustion: bool,
    label: Option<String>,
}

impl<T> Default for RetryOptions<T> {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl<T> RetryOptions<T> {
    /// Create options around a policy.
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            fallback: None,
            reject_on_exhaustion: false,
            label: None,
        }
    }

    /// Value to resolve with once the attempt budget is spent.
    pub fn with_fallback(mut self, fallback: T) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Fail with [`RetryExhausted`] on exhaustion even if a fallback is set.
    pub fn reject_on_exhaustion(mut self) -> Self {
        self.reject_on_exhaustion = true;
        self
    }

    /// Name attached to the log lines of failed attempts.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the retry policy.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Get the fallback value.
    pub fn fallback(&self) -> Option<&T> {
        self.fallback.as_ref()
    }
}

/// Retry an operation using a factory function.
///
/// Each attempt creates a fresh future via the factory, since a future is
/// consumed when awaited and a submitted operation is not safely replayable.
/// After a failure the executor sleeps for the policy's cooldown and tries
/// again, up to `max_attempts` invocations in total.
///
/// Once the budget is spent:
/// - with a fallback and without [`RetryOptions::reject_on_exhaustion`],
///   resolves with the fallback;
/// - otherwise fails with [`RetryExhausted`] carrying the last error.
///
/// A budget of zero never calls the factory and fails with
/// `RetryExhausted { final_error: None, attempts: 0, .. }`.
///
/// # Example
///
/// ```rust
/// use tidewait::retry::{retry_with_backoff, RetryOptions, RetryPolicy};
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let counter = AtomicU32::new(0);
/// let calls = &counter;
/// let options = RetryOptions::new(
///     RetryPolicy::constant(Duration::from_millis(1)).with_max_attempts(5),
/// );
///
/// let result = retry_with_backoff(
///     move || async move {
///         if calls.fetch_add(1, Ordering::SeqCst) < 2 {
///             Err("nonce too low")
///         } else {
///             Ok(42)
///         }
///     },
///     options,
/// )
/// .await;
///
/// assert_eq!(result, Ok(42));
/// assert_eq!(calls.load(Ordering::SeqCst), 3);
/// # });
/// ```
pub async fn retry_with_backoff<T, E, F, Fut>(
    mut make_attempt: F,
    options: RetryOptions<T>,
) -> Result<T, RetryExhausted<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let RetryOptions {
        policy,
        fallback,
        reject_on_exhaustion,
        label,
    } = options;
    let label = label.as_deref().unwrap_or("operation");

    let start = Instant::now();
    let mut attempts = 0u32;
    let mut last_error = None;

    while attempts < policy.max_attempts() {
        match make_attempt().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                let next_delay = policy.delay_for_attempt(attempts);
                attempts += 1;
                tracing::warn!(
                    label,
                    attempt = attempts,
                    max_attempts = policy.max_attempts(),
                    ?next_delay,
                    "attempt failed"
                );
                last_error = Some(error);

                match next_delay {
                    Some(d) => tokio::time::sleep(d).await,
                    None => break,
                }
            }
        }
    }

    match fallback {
        Some(value) if !reject_on_exhaustion => {
            tracing::debug!(label, attempts, "retries exhausted, using fallback");
            Ok(value)
        }
        _ => Err(RetryExhausted::new(last_error, attempts, start.elapsed())),
    }
}
