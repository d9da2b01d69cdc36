//! Waiting for conditions and racing operations against timers.
//!
//! Scripts that submit a transaction usually have to wait until its effect
//! is observable on the node they query. This module provides the building
//! blocks:
//!
//! - [`delay`] - Sleep without blocking the runtime
//! - [`poll_until`] - Re-evaluate a condition until it holds or a budget runs out
//! - [`spawn_poll_until`] - The same, as a cancellable task
//! - [`with_timeout`] - Resolve with a fallback if an operation is too slow
//!
//! # Example
//!
//! ```rust
//! use tidewait::wait::{poll_until, with_timeout, PollOptions, TimeoutOptions};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let outcome = poll_until(
//!     || async { Some("0x5fbd") },
//!     PollOptions::new().with_label("contract deployed"),
//! )
//! .await;
//! assert_eq!(outcome.into_value(), Some("0x5fbd"));
//!
//! let block = with_timeout(
//!     async { Ok::<u64, String>(19_000_000) },
//!     TimeoutOptions::new(Duration::from_secs(5), 0),
//! )
//! .await;
//! assert_eq!(block, Ok(19_000_000));
//! # });
//! ```

mod poll;
mod timeout;
mod truthy;

use std::time::Duration;

pub use poll::{
    poll_until, spawn_poll_until, PollMode, PollOptions, PollOutcome, DEFAULT_POLL_ATTEMPTS,
    DEFAULT_POLL_INTERVAL,
};
pub use timeout::{with_timeout, TimeoutOptions, DEFAULT_TIMEOUT};
pub use truthy::Truthy;

/// Resolve to `true` once `duration` has elapsed.
///
/// # Example
///
/// ```rust
/// use tidewait::wait::delay;
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// assert!(delay(Duration::from_millis(1)).await);
/// # });
/// ```
pub async fn delay(duration: Duration) -> bool {
    tokio::time::sleep(duration).await;
    true
}
