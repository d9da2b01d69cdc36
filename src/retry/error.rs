//! Error types for retry and timeout operations.

use std::time::Duration;

/// Error returned when every retry attempt failed and the caller asked
/// for a hard failure (or supplied no fallback).
///
/// Contains the final error along with metadata about the retry sequence.
/// `final_error` is `None` only when the attempt budget was zero and the
/// operation was never invoked.
///
/// # Examples
///
/// ```rust
/// use tidewait::retry::{retry_with_backoff, RetryOptions, RetryPolicy};
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let options = RetryOptions::new(
///     RetryPolicy::constant(Duration::from_millis(1)).with_max_attempts(3),
/// );
///
/// let result = retry_with_backoff(|| async { Err::<(), _>("always fails") }, options).await;
///
/// match result {
///     Err(exhausted) => {
///         assert_eq!(exhausted.final_error, Some("always fails"));
///         assert_eq!(exhausted.attempts, 3);
///     }
///     Ok(_) => panic!("Expected failure"),
/// }
/// # });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryExhausted<E> {
    /// The error from the final attempt, if any attempt was made.
    pub final_error: Option<E>,
    /// Total number of attempts made.
    pub attempts: u32,
    /// Total time spent retrying.
    pub total_duration: Duration,
}

impl<E> RetryExhausted<E> {
    /// Create a new RetryExhausted error.
    pub fn new(final_error: Option<E>, attempts: u32, total_duration: Duration) -> Self {
        Self {
            final_error,
            attempts,
            total_duration,
        }
    }

    /// Extract the final error, discarding metadata.
    pub fn into_error(self) -> Option<E> {
        self.final_error
    }

    /// Get a reference to the final error.
    pub fn error(&self) -> Option<&E> {
        self.final_error.as_ref()
    }

    /// Returns true if the operation was never invoked.
    pub fn never_attempted(&self) -> bool {
        self.attempts == 0
    }
}

impl<E: std::fmt::Display> std::fmt::Display for RetryExhausted<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.final_error {
            Some(error) => write!(
                f,
                "retry exhausted after {} attempts ({:?}): {}",
                self.attempts, self.total_duration, error
            ),
            None => write!(f, "retry exhausted without any attempt"),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for RetryExhausted<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.final_error
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Error returned by [`with_timeout`](crate::wait::with_timeout).
///
/// Either the timer won the race and the caller asked for a hard failure
/// (or supplied no fallback), or the operation itself failed first.
///
/// # Examples
///
/// ```rust
/// use tidewait::wait::{with_timeout, TimeoutOptions};
/// use tidewait::TimeoutError;
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let operation = async {
///     tokio::time::sleep(Duration::from_secs(10)).await;
///     Ok::<_, String>(42)
/// };
/// let options = TimeoutOptions::new(Duration::from_millis(10), 0).reject_on_timeout();
///
/// match with_timeout(operation, options).await {
///     Err(TimeoutError::Timeout { duration, fallback }) => {
///         assert_eq!(duration, Duration::from_millis(10));
///         assert_eq!(fallback, 0);
///     }
///     _ => panic!("Expected timeout"),
/// }
/// # });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeoutError<E, T> {
    /// The operation did not settle in time.
    Timeout {
        /// The timeout duration that was exceeded.
        duration: Duration,
        /// The fallback value the caller configured, kept as context.
        fallback: T,
    },
    /// The operation failed before the timer fired.
    Inner(E),
}

impl<E, T> TimeoutError<E, T> {
    /// Create a timeout error.
    pub fn timeout(duration: Duration, fallback: T) -> Self {
        Self::Timeout { duration, fallback }
    }

    /// Create an inner error.
    pub fn inner(error: E) -> Self {
        Self::Inner(error)
    }

    /// Returns true if this is a timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns true if this is an inner error.
    pub fn is_inner(&self) -> bool {
        matches!(self, Self::Inner(_))
    }

    /// Get the inner error if present.
    pub fn into_inner(self) -> Option<E> {
        match self {
            Self::Inner(e) => Some(e),
            Self::Timeout { .. } => None,
        }
    }

    /// Get the fallback carried by a timeout.
    pub fn into_fallback(self) -> Option<T> {
        match self {
            Self::Timeout { fallback, .. } => Some(fallback),
            Self::Inner(_) => None,
        }
    }
}

impl<E: std::fmt::Display, T> std::fmt::Display for TimeoutError<E, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout { duration, .. } => {
                write!(f, "operation timed out after {:?}", duration)
            }
            Self::Inner(e) => write!(f, "{}", e),
        }
    }
}

impl<E, T> std::error::Error for TimeoutError<E, T>
where
    E: std::error::Error + 'static,
    T: std::fmt::Debug,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Timeout { .. } => None,
            Self::Inner(e) => Some(e),
        }
    }
}
