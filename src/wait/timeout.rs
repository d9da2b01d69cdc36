//! Racing an operation against a timer.

use std::future::Future;
use std::time::Duration;

use crate::retry::TimeoutError;

/// Time allowed for an operation when none is chosen.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Options for [`with_timeout`].
///
/// A fallback is always present, so a timeout only becomes an error when
/// [`reject_on_timeout`](Self::reject_on_timeout) is set.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeoutOptions<T> {
    duration: Duration,
    fallback: T,
    reject_on_timeout: bool,
}

impl<T: Default> Default for TimeoutOptions<T> {
    /// [`DEFAULT_TIMEOUT`] with `T::default()` as the fallback.
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, T::default())
    }
}

impl<T> TimeoutOptions<T> {
    /// Allow the operation `duration` to settle, resolving with `fallback`
    /// if it does not.
    pub fn new(duration: Duration, fallback: T) -> Self {
        Self {
            duration,
            fallback,
            reject_on_timeout: false,
        }
    }

    /// Wait [`DEFAULT_TIMEOUT`] before resolving with `fallback`.
    pub fn with_default_duration(fallback: T) -> Self {
        Self::new(DEFAULT_TIMEOUT, fallback)
    }

    /// Fail with [`TimeoutError::Timeout`] when the timer wins. The fallback
    /// travels with the error.
    pub fn reject_on_timeout(mut self) -> Self {
        self.reject_on_timeout = true;
        self
    }

    /// Get the timeout duration.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Get the fallback value.
    pub fn fallback(&self) -> &T {
        &self.fallback
    }
}

/// Race `operation` against a timer.
///
/// If the operation settles first its value is returned, or its error as
/// [`TimeoutError::Inner`]. If the timer fires first the operation future is
/// dropped and the call resolves with the fallback, or fails with
/// [`TimeoutError::Timeout`] only when rejection was requested.
///
/// Work the operation handed off elsewhere (a spawned task, a submitted
/// transaction) keeps going; only this future is discarded.
///
/// # Example
///
/// ```rust
/// use tidewait::wait::{with_timeout, TimeoutOptions};
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let receipt = async {
///     tokio::time::sleep(Duration::from_secs(60)).await;
///     Ok::<_, String>("mined")
/// };
///
/// let status = with_timeout(
///     receipt,
///     TimeoutOptions::new(Duration::from_millis(20), "pending"),
/// )
/// .await;
///
/// assert_eq!(status, Ok("pending"));
/// # });
/// ```
pub async fn with_timeout<T, E, Fut>(
    operation: Fut,
    options: TimeoutOptions<T>,
) -> Result<T, TimeoutError<E, T>>
where
    Fut: Future<Output = Result<T, E>>,
{
    let TimeoutOptions {
        duration,
        fallback,
        reject_on_timeout,
    } = options;

    match tokio::time::timeout(duration, operation).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(TimeoutError::Inner(e)),
        Err(_) => {
            tracing::debug!(?duration, reject_on_timeout, "operation timed out");
            if reject_on_timeout {
                Err(TimeoutError::Timeout { duration, fallback })
            } else {
                Ok(fallback)
            }
        }
    }
}
