//! Scoped execution with guaranteed before/after hooks.
//!
//! [`run_with_hooks`] calls `before`, then `main`, and always calls `after`
//! exactly once, whether `main` returns normally, returns an error, or
//! panics. [`run_with_hooks_async`] does the same around a future and also
//! covers the future being dropped before completion.
//!
//! # Example
//!
//! ```rust
//! use tidewait::hooks::run_with_hooks;
//! use std::cell::RefCell;
//!
//! let log = RefCell::new(Vec::new());
//!
//! let result: Result<u32, &str> = run_with_hooks(
//!     || {
//!         log.borrow_mut().push("main");
//!         Err("revert: challenge not started")
//!     },
//!     || log.borrow_mut().push("before"),
//!     || log.borrow_mut().push("after"),
//! );
//!
//! assert!(result.is_err());
//! assert_eq!(*log.borrow(), vec!["before", "main", "after"]);
//! ```

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use futures::FutureExt;

/// Runs the wrapped hook at most once: explicitly through [`run`](Self::run)
/// or, if that never happened, when dropped.
///
/// Only the drop path covers a future abandoned mid-flight. Panics from the
/// wrapped code are caught before the guard is involved, so the hook never
/// runs from a destructor during unwinding.
struct AfterGuard<A: FnOnce()> {
    after: Option<A>,
}

impl<A: FnOnce()> AfterGuard<A> {
    fn new(after: A) -> Self {
        Self { after: Some(after) }
    }

    fn run(&mut self) {
        if let Some(after) = self.after.take() {
            after();
        }
    }
}

impl<A: FnOnce()> Drop for AfterGuard<A> {
    fn drop(&mut self) {
        self.run();
    }
}

/// Call `before`, then `main`, then `after`, returning `main`'s output.
///
/// `after` runs exactly once even if `main` panics; the panic then keeps
/// unwinding to the caller. If `after` itself panics, that panic replaces
/// the one from `main`. If `before` panics, neither `main` nor `after` run.
pub fn run_with_hooks<T, M, B, A>(main: M, before: B, after: A) -> T
where
    M: FnOnce() -> T,
    B: FnOnce(),
    A: FnOnce(),
{
    before();
    let outcome = panic::catch_unwind(AssertUnwindSafe(main));
    after();
    match outcome {
        Ok(value) => value,
        Err(payload) => panic::resume_unwind(payload),
    }
}

/// Async form of [`run_with_hooks`].
///
/// `after` runs exactly once when the future produced by `main` completes,
/// panics, or is dropped mid-flight. Panics in `after` propagate the same way
/// as in the sync form (for example when it loses a
/// [`with_timeout`](crate::wait::with_timeout) race).
///
/// # Example
///
/// ```rust
/// use tidewait::hooks::run_with_hooks_async;
/// use std::sync::atomic::{AtomicU32, Ordering};
///
/// # tokio_test::block_on(async {
/// let open_sessions = AtomicU32::new(0);
///
/// let value = run_with_hooks_async(
///     || async { 42 },
///     || { open_sessions.fetch_add(1, Ordering::SeqCst); },
///     || { open_sessions.fetch_sub(1, Ordering::SeqCst); },
/// )
/// .await;
///
/// assert_eq!(value, 42);
/// assert_eq!(open_sessions.load(Ordering::SeqCst), 0);
/// # });
/// ```
pub async fn run_with_hooks_async<T, M, Fut, B, A>(main: M, before: B, after: A) -> T
where
    M: FnOnce() -> Fut,
    Fut: Future<Output = T>,
    B: FnOnce(),
    A: FnOnce(),
{
    before();
    let mut guard = AfterGuard::new(after);
    let outcome = match panic::catch_unwind(AssertUnwindSafe(main)) {
        Ok(future) => AssertUnwindSafe(future).catch_unwind().await,
        Err(payload) => Err(payload),
    };
    guard.run();
    match outcome {
        Ok(value) => value,
        Err(payload) => panic::resume_unwind(payload),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[test]
    fn test_after_runs_on_success() {
        let after = Cell::new(0);
        let value = run_with_hooks(|| 5, || {}, || after.set(after.get() + 1));
        assert_eq!(value, 5);
        assert_eq!(after.get(), 1);
    }

    #[test]
    fn test_after_runs_once_on_panic() {
        let after = Cell::new(0);
        let result = catch_unwind(AssertUnwindSafe(|| {
            run_with_hooks(
                || -> u32 { panic!("transaction reverted") },
                || {},
                || after.set(after.get() + 1),
            )
        }));

        assert!(result.is_err());
        assert_eq!(after.get(), 1);
    }

    #[test]
    fn test_before_panic_skips_main_and_after() {
        let main_ran = Cell::new(false);
        let after_ran = Cell::new(false);
        let result = catch_unwind(AssertUnwindSafe(|| {
            run_with_hooks(
                || main_ran.set(true),
                || panic!("no signer configured"),
                || after_ran.set(true),
            )
        }));

        assert!(result.is_err());
        assert!(!main_ran.get());
        assert!(!after_ran.get());
    }

    #[test]
    fn test_after_panic_during_main_panic_propagates() {
        let result = catch_unwind(AssertUnwindSafe(|| {
            run_with_hooks(
                || -> u32 { panic!("main") },
                || {},
                || panic!("after"),
            )
        }));

        let payload = result.unwrap_err();
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"after"));
    }

    #[test]
    fn test_after_panic_on_success_propagates() {
        let result = catch_unwind(AssertUnwindSafe(|| {
            run_with_hooks(|| 1u32, || {}, || panic!("signer lock poisoned"))
        }));

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_async_after_panic_during_main_panic_propagates() {
        let result = AssertUnwindSafe(run_with_hooks_async(
            || async { panic!("main") },
            || {},
            || panic!("after"),
        ))
        .catch_unwind()
        .await;

        let payload: Box<dyn std::any::Any + Send> = match result {
            Ok(()) => panic!("expected a panic"),
            Err(payload) => payload,
        };
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"after"));
    }

    #[tokio::test]
    async fn test_async_after_runs_once_on_panic() {
        let after = Cell::new(0);
        let result = AssertUnwindSafe(run_with_hooks_async(
            || async { panic!("gas estimation failed") },
            || {},
            || after.set(after.get() + 1),
        ))
        .catch_unwind()
        .await;

        let result: Result<(), _> = result;
        assert!(result.is_err());
        assert_eq!(after.get(), 1);
    }

    #[tokio::test]
    async fn test_async_after_runs_on_error() {
        let after = Cell::new(0);
        let result: Result<(), &str> = run_with_hooks_async(
            || async { Err("insufficient allowance") },
            || {},
            || after.set(after.get() + 1),
        )
        .await;

        assert_eq!(result, Err("insufficient allowance"));
        assert_eq!(after.get(), 1);
    }
}
