//! Condition polling.

use std::future::Future;
use std::time::Duration;

use futures::future::{self, Join, Ready};
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::time::{Instant, MissedTickBehavior};

use crate::task::TaskHandle;
use crate::wait::Truthy;

/// Pause between condition evaluations when none is chosen.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Evaluation budget used when none is chosen.
pub const DEFAULT_POLL_ATTEMPTS: u32 = 10_000;

/// How evaluations are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PollMode {
    /// Evaluate, then wait `interval` after each unsatisfied result.
    ///
    /// Evaluations never overlap.
    #[default]
    Timeout,
    /// Start an evaluation on every tick of a fixed `interval` timer.
    ///
    /// A slow condition may still be pending when the next tick starts
    /// another evaluation. Only suitable for fast, idempotent conditions.
    Interval,
}

/// Options for [`poll_until`].
///
/// # Examples
///
/// ```rust
/// use tidewait::wait::{PollMode, PollOptions};
/// use std::time::Duration;
///
/// let options = PollOptions::new()
///     .with_interval(Duration::from_secs(2))
///     .with_max_attempts(30)
///     .with_mode(PollMode::Interval)
///     .with_label("challenge started");
///
/// assert_eq!(options.max_attempts(), 30);
/// assert_eq!(options.label(), Some("challenge started"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PollOptions {
    interval: Duration,
    max_attempts: u32,
    mode: PollMode,
    label: Option<String>,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl PollOptions {
    /// 100ms interval, 10000 attempts, [`PollMode::Timeout`], no label.
    pub fn new() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_POLL_ATTEMPTS,
            mode: PollMode::Timeout,
            label: None,
        }
    }

    /// Set the pause (or tick period) between evaluations.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the number of unsatisfied evaluations tolerated before giving up.
    ///
    /// Zero behaves like one: the condition is always evaluated once.
    pub fn with_max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    /// Set the scheduling mode.
    pub fn with_mode(mut self, mode: PollMode) -> Self {
        self.mode = mode;
        self
    }

    /// Log every evaluation under this label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Get the attempt budget.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Get the scheduling mode.
    pub fn mode(&self) -> PollMode {
        self.mode
    }

    /// Get the label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// Result of a poll: either the satisfying value or the last one seen.
///
/// Running out of attempts is not an error; the caller decides what an
/// unsatisfied last value means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<R> {
    /// The condition returned a truthy value.
    Satisfied {
        /// The satisfying value.
        value: R,
        /// Evaluations observed, the satisfying one included.
        attempts: u32,
    },
    /// The attempt budget ran out.
    Exhausted {
        /// The last (falsy) value.
        last: R,
        /// Evaluations observed.
        attempts: u32,
    },
}

impl<R> PollOutcome<R> {
    /// Returns true if the condition was satisfied.
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied { .. })
    }

    /// Returns true if the budget ran out.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }

    /// Number of evaluations observed.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Satisfied { attempts, .. } | Self::Exhausted { attempts, .. } => *attempts,
        }
    }

    /// Borrow the final value.
    pub fn value(&self) -> &R {
        match self {
            Self::Satisfied { value, .. } => value,
            Self::Exhausted { last, .. } => last,
        }
    }

    /// Extract the final value, satisfied or not.
    pub fn into_value(self) -> R {
        match self {
            Self::Satisfied { value, .. } => value,
            Self::Exhausted { last, .. } => last,
        }
    }

    /// Convert into a `Result`, treating exhaustion as the error case.
    pub fn into_result(self) -> Result<R, R> {
        match self {
            Self::Satisfied { value, .. } => Ok(value),
            Self::Exhausted { last, .. } => Err(last),
        }
    }
}

/// Attempt-budget state machine shared by both scheduling modes.
///
/// Polling moves to Satisfied on a truthy result and to Exhausted once the
/// remaining budget hits zero.
#[derive(Debug)]
struct AttemptBudget {
    remaining: u32,
    observed: u32,
}

#[derive(Debug)]
enum Step<R> {
    Continue,
    Done(PollOutcome<R>),
}

impl AttemptBudget {
    fn new(max_attempts: u32) -> Self {
        Self {
            remaining: max_attempts.max(1),
            observed: 0,
        }
    }

    fn record<R: Truthy>(&mut self, result: R) -> Step<R> {
        self.observed += 1;
        if result.is_truthy() {
            return Step::Done(PollOutcome::Satisfied {
                value: result,
                attempts: self.observed,
            });
        }

        self.remaining -= 1;
        if self.remaining == 0 {
            Step::Done(PollOutcome::Exhausted {
                last: result,
                attempts: self.observed,
            })
        } else {
            Step::Continue
        }
    }
}

fn log_attempt(label: Option<&str>, attempt: u32) {
    if let Some(label) = label {
        tracing::debug!(label, attempt, "waiting for condition");
    }
}

fn log_result(label: Option<&str>, attempt: u32, satisfied: bool) {
    if let Some(label) = label {
        tracing::debug!(label, attempt, satisfied, "condition evaluated");
    }
}

/// Evaluate `condition` until it returns a truthy value or the budget runs out.
///
/// In [`PollMode::Timeout`] the first evaluation happens immediately and
/// each later one starts `interval` after the previous result. In
/// [`PollMode::Interval`] evaluations start on the ticks of a fixed timer,
/// the first one after a full interval.
///
/// # Example
///
/// ```rust
/// use tidewait::wait::{poll_until, PollOptions};
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let confirmations = AtomicU32::new(0);
/// let confirmations = &confirmations;
///
/// let outcome = poll_until(
///     move || async move { confirmations.fetch_add(1, Ordering::SeqCst) >= 2 },
///     PollOptions::new().with_interval(Duration::from_millis(1)).with_max_attempts(10),
/// )
/// .await;
///
/// assert!(outcome.is_satisfied());
/// assert_eq!(outcome.attempts(), 3);
/// # });
/// ```
pub async fn poll_until<F, Fut, R>(condition: F, options: PollOptions) -> PollOutcome<R>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = R>,
    R: Truthy,
{
    match options.mode {
        PollMode::Timeout => poll_sequential(condition, &options).await,
        PollMode::Interval => poll_on_ticks(condition, &options).await,
    }
}

async fn poll_sequential<F, Fut, R>(mut condition: F, options: &PollOptions) -> PollOutcome<R>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = R>,
    R: Truthy,
{
    let label = options.label();
    let mut budget = AttemptBudget::new(options.max_attempts);

    loop {
        let attempt = budget.observed + 1;
        log_attempt(label, attempt);
        let result = condition().await;
        log_result(label, attempt, result.is_truthy());

        match budget.record(result) {
            Step::Done(outcome) => return outcome,
            Step::Continue => tokio::time::sleep(options.interval).await,
        }
    }
}

async fn poll_on_ticks<F, Fut, R>(mut condition: F, options: &PollOptions) -> PollOutcome<R>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = R>,
    R: Truthy,
{
    let label = options.label();
    let mut budget = AttemptBudget::new(options.max_attempts);

    // tokio intervals require a non-zero period.
    let period = options.interval.max(Duration::from_millis(1));
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // Each evaluation carries the attempt number it started under, since
    // results arrive in completion order.
    let mut in_flight: FuturesUnordered<Join<Ready<u32>, Fut>> = FuturesUnordered::new();
    let mut started = 0u32;

    loop {
        tokio::select! {
            biased;

            Some((attempt, result)) = in_flight.next(), if !in_flight.is_empty() => {
                log_result(label, attempt, result.is_truthy());
                if let Step::Done(outcome) = budget.record(result) {
                    return outcome;
                }
            }
            _ = ticker.tick() => {
                started += 1;
                log_attempt(label, started);
                in_flight.push(future::join(future::ready(started), condition()));
            }
        }
    }
}

/// Run [`poll_until`] as a spawned task that can be cancelled.
///
/// Dropping the returned handle cancels the poll and releases its timer.
///
/// # Example
///
/// ```rust
/// use tidewait::wait::{spawn_poll_until, PollOptions};
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let handle = spawn_poll_until(
///     || async { false },
///     PollOptions::new().with_interval(Duration::from_millis(5)),
/// );
/// handle.cancel();
/// assert!(handle.join().await.is_none());
/// # });
/// ```
pub fn spawn_poll_until<F, Fut, R>(condition: F, options: PollOptions) -> TaskHandle<PollOutcome<R>>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: Truthy + Send + 'static,
{
    TaskHandle::spawn(poll_until(condition, options))
}
