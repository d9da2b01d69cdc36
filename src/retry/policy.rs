//! Retry policy types and configuration.

use std::time::Duration;

/// Cooldown used between attempts when no strategy is chosen.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(3000);

/// Attempt budget used when none is chosen.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 20;

/// A retry policy describing how to retry failed operations.
///
/// Policies are pure data - they describe retry behavior but don't execute it.
/// This makes them easy to test, clone, and inspect.
///
/// Unlike a "max retries" count, `max_attempts` counts every invocation of the
/// operation, including the first one. A policy with `max_attempts(3)` calls
/// the operation at most three times and sleeps at most twice.
///
/// # Examples
///
/// ```rust
/// use tidewait::RetryPolicy;
/// use std::time::Duration;
///
/// // The default: fixed 3s cooldown, 20 attempts
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.max_attempts(), 20);
/// assert_eq!(policy.delay_for_attempt(0), Some(Duration::from_secs(3)));
///
/// // Exponential backoff with a cap
/// let policy = RetryPolicy::exponential(Duration::from_millis(100))
///     .with_max_attempts(5)
///     .with_max_delay(Duration::from_secs(1));
/// assert_eq!(policy.max_delay(), Some(Duration::from_secs(1)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RetryPolicy {
    strategy: RetryStrategy,
    max_attempts: u32,
    max_delay: Option<Duration>,
}

/// The cooldown strategy between attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RetryStrategy {
    /// Fixed delay between attempts.
    Constant(Duration),
    /// Delay increases linearly: base * (attempt + 1).
    Linear {
        /// Base delay duration.
        base: Duration,
    },
    /// Delay doubles: base * 2^attempt.
    Exponential {
        /// Base delay duration.
        base: Duration,
    },
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::constant(DEFAULT_COOLDOWN)
    }
}

impl RetryPolicy {
    fn with_strategy(strategy: RetryStrategy) -> Self {
        Self {
            strategy,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_delay: None,
        }
    }

    /// Create a policy with constant cooldown between attempts.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tidewait::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::constant(Duration::from_millis(500))
    ///     .with_max_attempts(3);
    ///
    /// // Cooldown after the first and second failure, none after the third
    /// assert_eq!(policy.delay_for_attempt(0), Some(Duration::from_millis(500)));
    /// assert_eq!(policy.delay_for_attempt(1), Some(Duration::from_millis(500)));
    /// assert_eq!(policy.delay_for_attempt(2), None);
    /// ```
    pub fn constant(delay: Duration) -> Self {
        Self::with_strategy(RetryStrategy::Constant(delay))
    }

    /// Create a policy with linearly increasing cooldown.
    ///
    /// Delay = base * (attempt + 1)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tidewait::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::linear(Duration::from_millis(100));
    ///
    /// assert_eq!(policy.delay_for_attempt(0), Some(Duration::from_millis(100)));
    /// assert_eq!(policy.delay_for_attempt(1), Some(Duration::from_millis(200)));
    /// assert_eq!(policy.delay_for_attempt(2), Some(Duration::from_millis(300)));
    /// ```
    pub fn linear(base: Duration) -> Self {
        Self::with_strategy(RetryStrategy::Linear { base })
    }

    /// Create a policy with exponentially increasing cooldown.
    ///
    /// Delay = base * 2^attempt
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tidewait::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::exponential(Duration::from_millis(100));
    ///
    /// assert_eq!(policy.delay_for_attempt(0), Some(Duration::from_millis(100)));
    /// assert_eq!(policy.delay_for_attempt(1), Some(Duration::from_millis(200)));
    /// assert_eq!(policy.delay_for_attempt(2), Some(Duration::from_millis(400)));
    /// ```
    pub fn exponential(base: Duration) -> Self {
        Self::with_strategy(RetryStrategy::Exponential { base })
    }

    /// Set the total number of attempts, the first one included.
    ///
    /// A budget of zero means the operation is never invoked.
    pub fn with_max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    /// Set the maximum delay cap.
    ///
    /// Delays will never exceed this value, regardless of the strategy.
    pub fn with_max_delay(mut self, d: Duration) -> Self {
        self.max_delay = Some(d);
        self
    }

    /// Get the attempt budget.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Get the maximum delay cap.
    pub fn max_delay(&self) -> Option<Duration> {
        self.max_delay
    }

    /// Get the cooldown strategy.
    pub fn strategy(&self) -> &RetryStrategy {
        &self.strategy
    }

    /// Calculate the cooldown after failed attempt N (0-indexed).
    ///
    /// Returns None if attempt N was the last one the budget allows.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tidewait::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::exponential(Duration::from_millis(100))
    ///     .with_max_attempts(3);
    ///
    /// assert_eq!(policy.delay_for_attempt(0), Some(Duration::from_millis(100)));
    /// assert_eq!(policy.delay_for_attempt(1), Some(Duration::from_millis(200)));
    /// assert_eq!(policy.delay_for_attempt(2), None); // budget spent
    /// ```
    pub fn delay_for_attempt(&self, attempt: u32) -> Option<Duration> {
        if attempt.saturating_add(1) >= self.max_attempts {
            return None;
        }

        let base_delay = match &self.strategy {
            RetryStrategy::Constant(d) => *d,
            RetryStrategy::Linear { base } => base.saturating_mul(attempt.saturating_add(1)),
            RetryStrategy::Exponential { base } => {
                base.saturating_mul(2u32.saturating_pow(attempt))
            }
        };

        let capped = match self.max_delay {
            Some(max) => base_delay.min(max),
            None => base_delay,
        };

        Some(capped)
    }
}

#[cfg(test)]
mod policy_tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.max_attempts(), DEFAULT_MAX_ATTEMPTS);
        assert_eq!(policy.strategy(), &RetryStrategy::Constant(DEFAULT_COOLDOWN));
        assert_eq!(policy.delay_for_attempt(0), Some(Duration::from_secs(3)));
        assert_eq!(policy.delay_for_attempt(18), Some(Duration::from_secs(3)));
        assert_eq!(policy.delay_for_attempt(19), None);
    }

    #[test]
    fn test_constant_delay() {
        let policy = RetryPolicy::constant(Duration::from_millis(100)).with_max_attempts(4);

        assert_eq!(
            policy.delay_for_attempt(0),
            Some(Duration::from_millis(100))
        );
        assert_eq!(
            policy.delay_for_attempt(2),
            Some(Duration::from_millis(100))
        );
        assert_eq!(policy.delay_for_attempt(3), None);
    }

    #[test]
    fn test_linear_delay() {
        let policy = RetryPolicy::linear(Duration::from_millis(100)).with_max_attempts(6);

        assert_eq!(
            policy.delay_for_attempt(3),
            Some(Duration::from_millis(400))
        );
        assert_eq!(
            policy.delay_for_attempt(4),
            Some(Duration::from_millis(500))
        );
        assert_eq!(policy.delay_for_attempt(5), None);
    }

    #[test]
    fn test_exponential_delay() {
        let policy = RetryPolicy::exponential(Duration::from_millis(100)).with_max_attempts(6);

        assert_eq!(
            policy.delay_for_attempt(3),
            Some(Duration::from_millis(800))
        );
        assert_eq!(
            policy.delay_for_attempt(4),
            Some(Duration::from_millis(1600))
        );
    }

    #[test]
    fn test_max_delay_cap() {
        let policy = RetryPolicy::exponential(Duration::from_millis(100))
            .with_max_attempts(10)
            .with_max_delay(Duration::from_millis(500));

        assert_eq!(
            policy.delay_for_attempt(2),
            Some(Duration::from_millis(400))
        );
        assert_eq!(
            policy.delay_for_attempt(3),
            Some(Duration::from_millis(500))
        ); // capped
        assert_eq!(
            policy.delay_for_attempt(8),
            Some(Duration::from_millis(500))
        ); // capped
    }

    #[test]
    fn test_zero_and_single_attempt_budgets() {
        let none = RetryPolicy::constant(Duration::from_millis(1)).with_max_attempts(0);
        assert_eq!(none.delay_for_attempt(0), None);

        let once = RetryPolicy::constant(Duration::from_millis(1)).with_max_attempts(1);
        assert_eq!(once.delay_for_attempt(0), None);
    }

    #[test]
    fn test_huge_attempt_saturates() {
        let policy = RetryPolicy::exponential(Duration::from_secs(1)).with_max_attempts(u32::MAX);
        assert!(policy.delay_for_attempt(200).is_some());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_policy_serde() {
        let policy = RetryPolicy::linear(Duration::from_millis(250)).with_max_attempts(4);
        let json = serde_json::to_string(&policy).unwrap();
        let back: RetryPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(policy, back);
    }
}
