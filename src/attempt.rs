//! A single deadline-bounded, cancellable attempt.
//!
//! [`Attempt`] races three futures and resolves with whichever finishes
//! first, dropping the others:
//!
//! 1. the attempt's cancellation token (checked first on every poll),
//! 2. the executor's future,
//! 3. the deadline timer.
//!
//! Cancellation wins ties, so an attempt that was superseded while its
//! result was becoming ready is still reported as cancelled.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use pin_project_lite::pin_project;
use tokio::time::{Instant, Sleep};
use tokio_util::sync::WaitForCancellationFutureOwned;

use crate::error::SearchError;
use crate::token::AttemptToken;

/// How an attempt ended.
#[derive(Debug, PartialEq, Eq)]
pub enum AttemptOutcome<T> {
    /// The executor finished, or the deadline expired first.
    Completed(Result<T, SearchError>),
    /// The attempt's token was cancelled before it finished.
    Cancelled,
}

pin_project! {
    /// Future racing an executor call against its deadline and token.
    #[must_use = "futures do nothing unless polled"]
    pub struct Attempt<F> {
        #[pin]
        search: F,
        #[pin]
        deadline: Sleep,
        #[pin]
        cancelled: WaitForCancellationFutureOwned,
        timeout: Duration,
    }
}

/// Roughly 30 years, matching what tokio uses for an unbounded sleep.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Returns the instant `timeout` from now, clamped for huge timeouts.
#[must_use]
pub fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout).unwrap_or(now + FAR_FUTURE)
}

impl<F> Attempt<F> {
    /// Wraps `search` so it fails with [`SearchError::Timeout`] after
    /// `timeout` and resolves as cancelled once `token` is cancelled.
    pub fn new(search: F, token: &AttemptToken, timeout: Duration) -> Self {
        Self::until(search, token, deadline_after(timeout), timeout)
    }

    /// Like [`Attempt::new`], but with a deadline fixed in advance.
    ///
    /// `timeout` is only reported in the resulting
    /// [`SearchError::Timeout`]. Must be called within a Tokio runtime.
    pub fn until(search: F, token: &AttemptToken, deadline: Instant, timeout: Duration) -> Self {
        Self {
            search,
            deadline: tokio::time::sleep_until(deadline),
            cancelled: token.cancelled_owned(),
            timeout,
        }
    }
}

impl<F, T> Future for Attempt<F>
where
    F: Future<Output = Result<T, SearchError>>,
{
    type Output = AttemptOutcome<T>;

    fn poll(self: Pin<&mut Self>, context: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();

        if this.cancelled.poll(context).is_ready() {
            return Poll::Ready(AttemptOutcome::Cancelled);
        }

        if let Poll::Ready(result) = this.search.poll(context) {
            return Poll::Ready(AttemptOutcome::Completed(result));
        }

        if this.deadline.poll(context).is_ready() {
            return Poll::Ready(AttemptOutcome::Completed(Err(SearchError::timeout(
                *this.timeout,
            ))));
        }

        Poll::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const LIMIT: Duration = Duration::from_millis(5000);

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn completes_with_executor_result() {
        let token = AttemptToken::new(1);
        let outcome = Attempt::new(async { Ok::<_, SearchError>(42) }, &token, LIMIT).await;

        assert_eq!(outcome, AttemptOutcome::Completed(Ok(42)));
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn passes_executor_errors_through() {
        let token = AttemptToken::new(1);
        let outcome = Attempt::new(
            async { Err::<i32, _>(SearchError::client(400, "bad")) },
            &token,
            LIMIT,
        )
        .await;

        assert_eq!(
            outcome,
            AttemptOutcome::Completed(Err(SearchError::client(400, "bad")))
        );
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn times_out_when_executor_never_settles() {
        let token = AttemptToken::new(1);
        let started = tokio::time::Instant::now();

        let outcome = Attempt::new(
            futures::future::pending::<Result<i32, SearchError>>(),
            &token,
            LIMIT,
        )
        .await;

        assert_eq!(
            outcome,
            AttemptOutcome::Completed(Err(SearchError::timeout(LIMIT)))
        );
        assert!(started.elapsed() >= LIMIT);
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn deadline_counts_from_when_it_was_fixed() {
        let token = AttemptToken::new(1);
        let deadline = deadline_after(LIMIT);
        tokio::time::sleep(Duration::from_millis(4000)).await;
        let started = tokio::time::Instant::now();

        let outcome = Attempt::until(
            futures::future::pending::<Result<i32, SearchError>>(),
            &token,
            deadline,
            LIMIT,
        )
        .await;

        assert_eq!(
            outcome,
            AttemptOutcome::Completed(Err(SearchError::timeout(LIMIT)))
        );
        assert!(started.elapsed() < LIMIT);
        assert!(tokio::time::Instant::now() >= deadline);
    }

    #[rstest]
    fn huge_timeouts_do_not_overflow() {
        let deadline = deadline_after(Duration::MAX);
        assert!(deadline > Instant::now());
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn cancellation_wins_over_ready_result() {
        let token = AttemptToken::new(1);
        token.cancel();

        let outcome = Attempt::new(async { Ok::<_, SearchError>(1) }, &token, LIMIT).await;

        assert_eq!(outcome, AttemptOutcome::Cancelled);
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_pending_executor() {
        let token = AttemptToken::new(1);
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            canceller.cancel();
        });

        let outcome = Attempt::new(
            futures::future::pending::<Result<i32, SearchError>>(),
            &token,
            LIMIT,
        )
        .await;

        assert_eq!(outcome, AttemptOutcome::Cancelled);
    }
}
