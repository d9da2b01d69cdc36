//! Retrying operations that fail transiently.
//!
//! Deployment scripts talk to remote nodes that drop requests, reject
//! nonces and lag behind the chain head. This module retries such
//! operations with a cooldown between attempts:
//!
//! - **Pure policy**: [`RetryPolicy`] is just data, easily tested and cloned
//! - **Fresh attempts**: operations are built by a factory on every attempt
//! - **Liveness first**: exhaustion resolves with a fallback unless the
//!   caller opts into a hard failure
//!
//! # Quick Start
//!
//! ```rust
//! use tidewait::retry::{retry_with_backoff, RetryOptions, RetryPolicy};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let options = RetryOptions::new(
//!     RetryPolicy::constant(Duration::from_millis(10)).with_max_attempts(3),
//! )
//! .with_fallback(0);
//!
//! let balance = retry_with_backoff(|| async { Err::<u64, _>("node unavailable") }, options).await;
//! assert_eq!(balance, Ok(0));
//! # });
//! ```
//!
//! # Cooldown Strategies
//!
//! - **Constant**: Fixed delay between attempts (the default, 3s)
//! - **Linear**: Delay increases linearly (100ms, 200ms, 300ms, ...)
//! - **Exponential**: Delay doubles each attempt (100ms, 200ms, 400ms, ...)
//!
//! # Error Types
//!
//! - [`RetryExhausted`]: Returned when all attempts fail and no fallback applies
//! - [`TimeoutError`]: Returned by [`with_timeout`](crate::wait::with_timeout)

mod backoff;
mod error;
mod policy;

pub use backoff::{retry_with_backoff, RetryOptions};
pub use error::{RetryExhausted, TimeoutError};
pub use policy::{RetryPolicy, RetryStrategy, DEFAULT_COOLDOWN, DEFAULT_MAX_ATTEMPTS};

#[cfg(test)]
mod tests;
