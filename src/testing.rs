//! Testing utilities for code that polls and retries.
//!
//! Conditions and operations in deployment scripts talk to remote nodes.
//! The helpers here stand in for them with scripted, call-counting fakes,
//! and the assertion macros check [`PollOutcome`](crate::wait::PollOutcome)s.
//!
//! # Examples
//!
//! ## Scripted conditions
//!
//! ```rust
//! use tidewait::testing::ScriptedCondition;
//! use tidewait::wait::{poll_until, PollOptions};
//! use tidewait::assert_satisfied;
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let receipt = ScriptedCondition::truthy_on(3);
//! let outcome = poll_until(
//!     receipt.condition(),
//!     PollOptions::new().with_interval(Duration::from_millis(1)),
//! )
//! .await;
//!
//! assert_satisfied!(outcome);
//! assert_eq!(receipt.calls(), 3);
//! # });
//! ```
//!
//! ## Flaky operations
//!
//! ```rust
//! use tidewait::testing::FlakyOperation;
//! use tidewait::retry::{retry_with_backoff, RetryOptions, RetryPolicy};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let submit = FlakyOperation::new(2, "0xfeed", "replacement underpriced");
//! let result = retry_with_backoff(
//!     submit.factory(),
//!     RetryOptions::new(RetryPolicy::constant(Duration::from_millis(1))),
//! )
//! .await;
//!
//! assert_eq!(result, Ok("0xfeed"));
//! assert_eq!(submit.calls(), 3);
//! # });
//! ```

use std::future::{ready, Ready};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// A condition that replays a fixed script of results.
///
/// Call N returns the N-th scripted result; once the script is used up the
/// last result repeats. Clones share the call counter.
#[derive(Debug, Clone)]
pub struct ScriptedCondition<R> {
    script: Arc<Vec<R>>,
    calls: Arc<AtomicU32>,
}

impl<R: Clone> ScriptedCondition<R> {
    /// Create a condition from its results, in call order.
    ///
    /// # Panics
    ///
    /// Panics if `script` is empty.
    pub fn new(script: Vec<R>) -> Self {
        assert!(!script.is_empty(), "a scripted condition needs at least one result");
        Self {
            script: Arc::new(script),
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Evaluate once.
    pub fn evaluate(&self) -> Ready<R> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
        let last = self.script.len() - 1;
        ready(self.script[n.min(last)].clone())
    }

    /// A closure suitable for [`poll_until`](crate::wait::poll_until).
    pub fn condition(&self) -> impl FnMut() -> Ready<R> + Send + 'static
    where
        R: Send + Sync + 'static,
    {
        let this = self.clone();
        move || this.evaluate()
    }

    /// Number of evaluations so far.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ScriptedCondition<bool> {
    /// False for the first `n - 1` calls, true from call `n` on.
    pub fn truthy_on(n: u32) -> Self {
        let mut script = vec![false; n.saturating_sub(1) as usize];
        script.push(true);
        Self::new(script)
    }

    /// Always false.
    pub fn never() -> Self {
        Self::new(vec![false])
    }
}

/// An operation that fails a fixed number of times, then succeeds.
///
/// Clones share the call counter.
#[derive(Debug, Clone)]
pub struct FlakyOperation<T, E> {
    failures: u32,
    value: T,
    error: E,
    calls: Arc<AtomicU32>,
}

impl<T: Clone, E: Clone> FlakyOperation<T, E> {
    /// Fail `failures` times with `error`, then return `value`.
    pub fn new(failures: u32, value: T, error: E) -> Self {
        Self {
            failures,
            value,
            error,
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Run one attempt.
    pub fn attempt(&self) -> Ready<Result<T, E>> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.failures {
            ready(Err(self.error.clone()))
        } else {
            ready(Ok(self.value.clone()))
        }
    }

    /// A factory suitable for [`retry_with_backoff`](crate::retry::retry_with_backoff).
    pub fn factory(&self) -> impl FnMut() -> Ready<Result<T, E>> + Send + 'static
    where
        T: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        let this = self.clone();
        move || this.attempt()
    }

    /// Number of attempts so far.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Assert that a poll was satisfied.
///
/// # Example
///
/// ```rust
/// use tidewait::wait::PollOutcome;
/// use tidewait::assert_satisfied;
///
/// assert_satisfied!(PollOutcome::Satisfied { value: true, attempts: 1 });
/// ```
#[macro_export]
macro_rules! assert_satisfied {
    ($outcome:expr) => {
        match $outcome {
            $crate::wait::PollOutcome::Satisfied { .. } => {}
            $crate::wait::PollOutcome::Exhausted { attempts, .. } => {
                panic!("Expected Satisfied, got Exhausted after {} attempts", attempts);
            }
        }
    };
}

/// Assert that a poll ran out of attempts, optionally after exactly `n`.
///
/// # Example
///
/// ```rust
/// use tidewait::wait::PollOutcome;
/// use tidewait::assert_exhausted;
///
/// assert_exhausted!(PollOutcome::Exhausted { last: false, attempts: 5 }, 5);
/// ```
#[macro_export]
macro_rules! assert_exhausted {
    ($outcome:expr) => {
        match $outcome {
            $crate::wait::PollOutcome::Exhausted { .. } => {}
            $crate::wait::PollOutcome::Satisfied { attempts, .. } => {
                panic!("Expected Exhausted, got Satisfied after {} attempts", attempts);
            }
        }
    };
    ($outcome:expr, $attempts:expr) => {
        match $outcome {
            $crate::wait::PollOutcome::Exhausted { attempts, .. } => {
                assert_eq!(attempts, $attempts);
            }
            $crate::wait::PollOutcome::Satisfied { attempts, .. } => {
                panic!("Expected Exhausted, got Satisfied after {} attempts", attempts);
            }
        }
    };
}
