//! The debounced, cancellable, retrying search controller.
//!
//! A [`SearchController`] turns a rapid stream of typed queries into at most
//! one live call to a [`SearchExecutor`] at a time:
//!
//! 1. **Debounce**: `search(term)` (re)arms a timer; only the term of the
//!    last call in a quiet window is dispatched.
//! 2. **Supersede**: dispatching cancels the previous attempt's token. Late
//!    completions of cancelled attempts are discarded.
//! 3. **Deadline**: every attempt races the executor against `timeout`.
//! 4. **Retry**: retryable failures are reattempted after a linearly
//!    growing delay until the retry budget is spent; the failure is then
//!    surfaced through state, the notifier and `on_error`.
//!
//! All public operations are fire-and-forget. Outcomes are observed through
//! [`SearchController::state`], [`SearchController::subscribe`] and the
//! builder's callbacks.
//!
//! # Examples
//!
//! ```rust,ignore
//! use searchline::controller::SearchController;
//! use searchline::error::SearchError;
//! use searchline::token::AttemptToken;
//!
//! #[tokio::main]
//! async fn main() {
//!     let controller = SearchController::builder(|term: String, _token: AttemptToken| async move {
//!         Ok::<_, SearchError>(format!("results for {term}"))
//!     })
//!     .on_success(|results: &String| println!("{results}"))
//!     .build();
//!
//!     let mut updates = controller.subscribe();
//!     controller.search("ac");
//!     controller.search("acme");
//!
//!     while updates.changed().await.is_ok() {
//!         let state = updates.borrow_and_update().clone();
//!         if !state.is_searching && !state.last_search_term.is_empty() {
//!             break;
//!         }
//!     }
//! }
//! ```

mod builder;

pub use builder::SearchControllerBuilder;

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use parking_lot::{Mutex, MutexGuard};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::attempt::{Attempt, AttemptOutcome, deadline_after};
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::executor::SearchExecutor;
use crate::notify::ErrorNotifier;
use crate::state::{SearchPhase, SearchState};
use crate::token::AttemptToken;

/// Status reported when the executor panics instead of settling.
pub const PANIC_STATUS: u16 = 500;
const PANIC_MESSAGE: &str = "search executor panicked";

type SuccessCallback<T> = Box<dyn Fn(&T) + Send + Sync>;
type ErrorCallback = Box<dyn Fn(&SearchError) + Send + Sync>;

// =============================================================================
// SearchController
// =============================================================================

/// Debounced, cancellable, retrying search controller.
///
/// Dropping the controller cancels every pending timer and the in-flight
/// attempt.
pub struct SearchController<T> {
    shared: Arc<Shared<T>>,
}

impl<T: Send + 'static> SearchController<T> {
    /// Starts building a controller around `executor`.
    pub fn builder<E>(executor: E) -> SearchControllerBuilder<T>
    where
        E: SearchExecutor<T>,
    {
        SearchControllerBuilder::new(executor)
    }

    /// Feeds the latest input.
    ///
    /// A blank `term` resets the controller to idle immediately without
    /// calling the executor. Any other term replaces the pending dispatch
    /// and restarts the debounce window. The in-flight attempt, if any,
    /// keeps running until the new term is dispatched.
    pub fn search(&self, term: &str) {
        if term.trim().is_empty() {
            tracing::debug!("blank search term, resetting");
            self.cancel();
            return;
        }

        let mut inner = self.shared.inner.lock();
        inner.cancel_timers();

        let timer_id = inner.next_id();
        let shared = Arc::clone(&self.shared);
        let term = term.to_owned();
        let debounce = self.shared.config.debounce;
        let handle = self.shared.runtime.spawn(async move {
            tokio::time::sleep(debounce).await;
            shared.fire_debounce(timer_id, term);
        });
        inner.debounce = Some(Timer {
            id: timer_id,
            handle,
        });
        inner.phase = SearchPhase::Debouncing;
        self.shared.publish(&inner);
    }

    /// Re-dispatches the last searched term at the user's request.
    ///
    /// Works even when the automatic retry budget is spent. Does nothing if
    /// no term has been searched since the last reset.
    pub fn retry(&self) {
        let mut inner = self.shared.inner.lock();
        if inner.last_search_term.is_empty() {
            return;
        }

        inner.cancel_timers();
        let term = inner.last_search_term.clone();
        tracing::debug!(term = %term, "manual retry");
        self.shared.dispatch(&mut inner, term, true);
    }

    /// Clears the displayed error without touching anything else.
    pub fn clear_error(&self) {
        let mut inner = self.shared.inner.lock();
        if inner.error.take().is_none() {
            return;
        }
        if inner.phase == SearchPhase::ErrorTerminal {
            inner.phase = SearchPhase::Idle;
        }
        self.shared.publish(&inner);
    }

    /// Cancels pending timers and the in-flight attempt, then resets to idle.
    pub fn cancel(&self) {
        self.shared.reset();
    }

    /// Returns the latest state snapshot.
    #[must_use]
    pub fn state(&self) -> SearchState {
        self.shared.published.borrow().clone()
    }

    /// Returns a receiver notified after every state transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.shared.published.subscribe()
    }

    /// The configuration this controller was built with.
    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.shared.config
    }
}

impl<T> Drop for SearchController<T> {
    fn drop(&mut self) {
        self.shared.reset();
    }
}

impl<T> std::fmt::Debug for SearchController<T> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SearchController")
            .field("config", &self.shared.config)
            .field("state", &*self.shared.published.borrow())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Shared State
// =============================================================================

struct Shared<T> {
    config: SearchConfig,
    executor: Box<dyn SearchExecutor<T>>,
    on_success: Option<SuccessCallback<T>>,
    on_error: Option<ErrorCallback>,
    notifier: Box<dyn ErrorNotifier>,
    runtime: Handle,
    inner: Mutex<Inner>,
    published: watch::Sender<SearchState>,
}

struct Timer {
    id: u64,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct Inner {
    is_searching: bool,
    error: Option<SearchError>,
    last_search_term: String,
    retry_count: u32,
    phase: SearchPhase,
    debounce: Option<Timer>,
    retry: Option<Timer>,
    current: Option<AttemptToken>,
    sequence: u64,
}

impl Inner {
    const fn next_id(&mut self) -> u64 {
        self.sequence = self.sequence.wrapping_add(1);
        self.sequence
    }

    fn cancel_timers(&mut self) {
        for timer in [self.debounce.take(), self.retry.take()].into_iter().flatten() {
            timer.handle.abort();
        }
    }

    fn is_current(&self, token: &AttemptToken) -> bool {
        !token.is_cancelled()
            && self
                .current
                .as_ref()
                .is_some_and(|current| current.same_attempt(token))
    }

    /// Phase to rest in once an attempt settles; a pending debounce wins.
    const fn resting(&self, phase: SearchPhase) -> SearchPhase {
        if self.debounce.is_some() {
            SearchPhase::Debouncing
        } else {
            phase
        }
    }
}

fn snapshot(config: &SearchConfig, inner: &Inner) -> SearchState {
    SearchState {
        is_searching: inner.is_searching,
        error: inner.error.clone(),
        last_search_term: inner.last_search_term.clone(),
        retry_count: inner.retry_count,
        can_retry: config.has_retry_budget(inner.retry_count),
        phase: inner.phase,
    }
}

impl<T> Shared<T> {
    fn publish(&self, inner: &Inner) {
        self.published.send_replace(snapshot(&self.config, inner));
    }

    fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.cancel_timers();
        if let Some(token) = inner.current.take() {
            token.cancel();
        }

        let sequence = inner.sequence;
        *inner = Inner {
            sequence,
            ..Inner::default()
        };
        tracing::debug!("search controller reset");
        self.publish(&inner);
    }
}

impl<T: Send + 'static> Shared<T> {
    fn fire_debounce(self: &Arc<Self>, timer_id: u64, term: String) {
        let mut inner = self.inner.lock();
        if !inner.debounce.as_ref().is_some_and(|timer| timer.id == timer_id) {
            return;
        }
        inner.debounce = None;
        self.dispatch(&mut inner, term, false);
    }

    fn fire_retry(self: &Arc<Self>, timer_id: u64) {
        let mut inner = self.inner.lock();
        if !inner.retry.as_ref().is_some_and(|timer| timer.id == timer_id) {
            return;
        }
        inner.retry = None;
        let term = inner.last_search_term.clone();
        self.dispatch(&mut inner, term, true);
    }

    fn dispatch(self: &Arc<Self>, inner: &mut MutexGuard<'_, Inner>, term: String, is_retry: bool) {
        if let Some(previous) = inner.current.take() {
            previous.cancel();
        }

        let token = AttemptToken::new(inner.next_id());
        let retry_count = if is_retry {
            inner.retry_count.saturating_add(1)
        } else {
            0
        };

        inner.current = Some(token.clone());
        inner.is_searching = true;
        inner.error = None;
        inner.last_search_term.clone_from(&term);
        inner.retry_count = retry_count;
        inner.phase = SearchPhase::InFlight;
        self.publish(inner);

        tracing::debug!(
            term = %term,
            retry_count,
            attempt = token.attempt(),
            "dispatching search"
        );

        let deadline = deadline_after(self.config.timeout);
        let shared = Arc::clone(self);
        self.runtime.spawn(async move {
            if token.is_cancelled() {
                tracing::trace!(attempt = token.attempt(), "attempt cancelled before start");
                return;
            }

            let attempt = {
                let shared = Arc::clone(&shared);
                let token = token.clone();
                async move {
                    let search = shared.executor.search(term, token.clone());
                    Attempt::until(search, &token, deadline, shared.config.timeout).await
                }
            };
            match AssertUnwindSafe(attempt).catch_unwind().await {
                Ok(outcome) => shared.settle(&token, retry_count, outcome),
                Err(_) => shared.settle_panicked(&token, retry_count),
            }
        });
    }

    fn settle(self: &Arc<Self>, token: &AttemptToken, retry_count: u32, outcome: AttemptOutcome<T>) {
        let mut inner = self.inner.lock();
        if !inner.is_current(token) {
            tracing::trace!(attempt = token.attempt(), "discarding superseded attempt");
            return;
        }

        let result = match outcome {
            AttemptOutcome::Completed(result) => result,
            AttemptOutcome::Cancelled => return,
        };
        inner.current = None;

        match result {
            Ok(value) => {
                inner.is_searching = false;
                inner.error = None;
                inner.retry_count = 0;
                inner.phase = inner.resting(SearchPhase::Idle);
                self.publish(&inner);
                drop(inner);

                tracing::debug!(attempt = token.attempt(), "search succeeded");
                if let Some(on_success) = &self.on_success {
                    on_success(&value);
                }
            }
            Err(error) if error.is_retryable() && self.config.has_retry_budget(retry_count) => {
                if inner.debounce.is_some() {
                    tracing::debug!(%error, "retry skipped, newer input pending");
                    return;
                }

                let delay = self.config.retry_delay_for(retry_count);
                let timer_id = inner.next_id();
                let shared = Arc::clone(self);
                let handle = self.runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    shared.fire_retry(timer_id);
                });
                inner.retry = Some(Timer {
                    id: timer_id,
                    handle,
                });
                inner.phase = SearchPhase::RetryScheduled;
                self.publish(&inner);

                tracing::debug!(
                    %error,
                    retry_count,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "retry scheduled"
                );
            }
            Err(error) => self.fail(inner, error, retry_count),
        }
    }

    /// Settles an attempt whose executor panicked as a terminal failure.
    fn settle_panicked(&self, token: &AttemptToken, retry_count: u32) {
        let mut inner = self.inner.lock();
        if !inner.is_current(token) {
            return;
        }
        inner.current = None;

        tracing::error!(attempt = token.attempt(), "search executor panicked");
        self.fail(inner, SearchError::server(PANIC_STATUS, PANIC_MESSAGE), retry_count);
    }

    fn fail(&self, mut inner: MutexGuard<'_, Inner>, error: SearchError, retry_count: u32) {
        inner.is_searching = false;
        inner.error = Some(error.clone());
        inner.phase = inner.resting(SearchPhase::ErrorTerminal);
        self.publish(&inner);
        drop(inner);

        tracing::warn!(%error, retry_count, "search failed");
        if self.config.show_toast_on_error {
            self.notifier.notify(&error);
        }
        if let Some(on_error) = &self.on_error {
            on_error(&error);
        }
    }
}
