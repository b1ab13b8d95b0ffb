//! Controller configuration.
//!
//! This module provides [`SearchConfig`], the timing and retry settings of a
//! [`SearchController`](crate::controller::SearchController).

use std::time::Duration;

/// Default quiet period between the last keystroke and dispatch.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Default number of automatic retries per logical search.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 2;

/// Default base delay before a retry.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Default per-attempt deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

// =============================================================================
// SearchConfig
// =============================================================================

/// Timing and retry settings for a search controller.
///
/// # Examples
///
/// ```
/// use searchline::config::SearchConfig;
/// use std::time::Duration;
///
/// let config = SearchConfig::default()
///     .with_debounce(Duration::from_millis(150))
///     .with_retry_attempts(3)
///     .with_toast_on_error(true);
///
/// assert_eq!(config.debounce, Duration::from_millis(150));
/// assert_eq!(config.retry_attempts, 3);
/// assert!(config.show_toast_on_error);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct SearchConfig {
    /// Delay between the last `search` call and dispatch.
    ///
    /// Defaults to 300 milliseconds.
    #[cfg_attr(feature = "serde", serde(rename = "debounceMs", with = "millis"))]
    pub debounce: Duration,

    /// Maximum number of automatic retries for one logical search.
    ///
    /// Defaults to 2, so a search is attempted at most 3 times.
    pub retry_attempts: u32,

    /// Base delay before a retry, scaled by the attempt number.
    ///
    /// Defaults to 1 second.
    #[cfg_attr(feature = "serde", serde(with = "millis"))]
    pub retry_delay: Duration,

    /// Wall-clock limit for a single attempt.
    ///
    /// Defaults to 10 seconds.
    #[cfg_attr(feature = "serde", serde(rename = "timeoutMs", with = "millis"))]
    pub timeout: Duration,

    /// Whether terminal failures are surfaced through the error notifier.
    ///
    /// Defaults to `false`.
    pub show_toast_on_error: bool,
}

// =============================================================================
// Default Implementation
// =============================================================================

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            timeout: DEFAULT_TIMEOUT,
            show_toast_on_error: false,
        }
    }
}

// =============================================================================
// Builder Methods
// =============================================================================

impl SearchConfig {
    /// Sets the debounce window.
    #[must_use]
    pub const fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Sets the automatic retry budget.
    #[must_use]
    pub const fn with_retry_attempts(mut self, retry_attempts: u32) -> Self {
        self.retry_attempts = retry_attempts;
        self
    }

    /// Sets the base retry delay.
    #[must_use]
    pub const fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Sets the per-attempt deadline.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enables or disables error notifications.
    #[must_use]
    pub const fn with_toast_on_error(mut self, show_toast_on_error: bool) -> Self {
        self.show_toast_on_error = show_toast_on_error;
        self
    }

    /// Delay before the retry that follows an attempt with `retry_count`
    /// prior retries.
    ///
    /// Backoff is linear: `retry_delay * (retry_count + 1)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use searchline::config::SearchConfig;
    /// use std::time::Duration;
    ///
    /// let config = SearchConfig::default();
    /// assert_eq!(config.retry_delay_for(0), Duration::from_millis(1000));
    /// assert_eq!(config.retry_delay_for(1), Duration::from_millis(2000));
    /// ```
    #[must_use]
    pub const fn retry_delay_for(&self, retry_count: u32) -> Duration {
        self.retry_delay
            .saturating_mul(retry_count.saturating_add(1))
    }

    /// Returns `true` while automatic retries remain after `retry_count`
    /// retries have been consumed.
    #[must_use]
    pub const fn has_retry_budget(&self, retry_count: u32) -> bool {
        retry_count < self.retry_attempts
    }
}

#[cfg(feature = "serde")]
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

// =============================================================================
// Tests
// =============================================================================
