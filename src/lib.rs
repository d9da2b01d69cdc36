//! # Tidewait
//!
//! > *"Time and tide wait for no script"*
//!
//! Async helpers for deployment and operations scripts that drive remote
//! smart contracts: waiting for effects to become observable, retrying
//! transient failures, bounding slow calls, and tidying the lists that go
//! into contract calls.
//!
//! ## Philosophy
//!
//! - **Liveness first**: running out of attempts or time resolves with a
//!   fallback by default; hard failures are opt-in
//! - **Pure data for policies**: retry and poll settings are plain values
//! - **No leaked timers**: dropping a wait releases it, spawned polls can be
//!   cancelled
//!
//! ## Quick Example
//!
//! ```rust
//! use tidewait::prelude::*;
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! // Retry an opaque submission, then wait until it is observable.
//! let tx_hash = retry_with_backoff(
//!     || async { Ok::<_, String>("0xabc") },
//!     RetryOptions::new(RetryPolicy::constant(Duration::from_millis(10))),
//! )
//! .await
//! .unwrap();
//!
//! let outcome = poll_until(
//!     || async { true },
//!     PollOptions::new().with_label(format!("receipt for {}", tx_hash)),
//! )
//! .await;
//! assert!(outcome.is_satisfied());
//!
//! // Normalise a participant list before a batched call.
//! let batches = chunk(&dedupe(&["0x1", "0x2", "0x1"]), 50).unwrap();
//! assert_eq!(batches, vec![vec!["0x1", "0x2"]]);
//! # });
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod collection;
pub mod config;
pub mod hooks;
pub mod retry;
pub mod task;
pub mod testing;
pub mod wait;

// Re-exports
pub use collection::{Groups, InvalidArgument};
pub use retry::{RetryExhausted, RetryOptions, RetryPolicy, TimeoutError};
pub use task::TaskHandle;
pub use wait::{PollMode, PollOptions, PollOutcome, TimeoutOptions, Truthy};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::collection::{
        chunk, dedupe, dedupe_hashed, group_by_func, group_by_keys, sequence_equals, Groups,
        InvalidArgument,
    };
    pub use crate::hooks::{run_with_hooks, run_with_hooks_async};
    pub use crate::retry::{
        retry_with_backoff, RetryExhausted, RetryOptions, RetryPolicy, TimeoutError,
    };
    pub use crate::task::TaskHandle;
    pub use crate::wait::{
        delay, poll_until, spawn_poll_until, with_timeout, PollMode, PollOptions, PollOutcome,
        TimeoutOptions, Truthy,
    };
}
