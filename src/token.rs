//! Per-attempt cancellation.
//!
//! Each dispatched attempt owns an [`AttemptToken`]. The controller cancels
//! it when a newer attempt supersedes it, when `cancel` is called, or when
//! the controller is dropped. Executors receive a clone and may observe it
//! to abort their own I/O early; the controller discards the results of
//! cancelled attempts either way.

use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};

/// Cancellation token for a single search attempt.
///
/// Cloning is cheap; all clones observe the same cancellation.
///
/// # Examples
///
/// ```
/// use searchline::token::AttemptToken;
///
/// let token = AttemptToken::new(1);
/// let observed = token.clone();
/// assert!(!observed.is_cancelled());
///
/// token.cancel();
/// assert!(observed.is_cancelled());
/// assert_eq!(observed.attempt(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct AttemptToken {
    attempt: u64,
    inner: CancellationToken,
}

impl AttemptToken {
    /// Creates a live token for the given attempt number.
    #[must_use]
    pub fn new(attempt: u64) -> Self {
        Self {
            attempt,
            inner: CancellationToken::new(),
        }
    }

    /// Sequence number of the attempt this token belongs to.
    ///
    /// Attempt numbers increase monotonically per controller.
    #[must_use]
    pub const fn attempt(&self) -> u64 {
        self.attempt
    }

    /// Returns `true` once this attempt has been superseded or cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }

    /// Cancels the attempt. Idempotent.
    pub fn cancel(&self) {
        self.inner.cancel();
    }

    /// Completes when the attempt is cancelled.
    ///
    /// Executors can race their own I/O against this future.
    pub async fn cancelled(&self) {
        self.inner.cancelled().await;
    }

    /// Owned variant of [`cancelled`](Self::cancelled) that borrows nothing.
    #[must_use]
    pub fn cancelled_owned(&self) -> WaitForCancellationFutureOwned {
        self.inner.clone().cancelled_owned()
    }

    /// Returns `true` if `self` and `other` belong to the same attempt.
    #[must_use]
    pub fn same_attempt(&self, other: &Self) -> bool {
        self.attempt == other.attempt
    }
}
