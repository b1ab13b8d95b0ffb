//! Construction of [`SearchController`]s.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use super::{ErrorCallback, Inner, SearchController, Shared, SuccessCallback};
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::executor::SearchExecutor;
use crate::notify::{ErrorNotifier, LogNotifier};
use crate::runtime;

/// Builder for a [`SearchController`].
///
/// # Examples
///
/// ```
/// use searchline::config::SearchConfig;
/// use searchline::controller::SearchController;
/// use searchline::error::SearchError;
/// use searchline::token::AttemptToken;
/// use std::time::Duration;
///
/// let controller = SearchController::builder(|term: String, _token: AttemptToken| async move {
///     Ok::<_, SearchError>(vec![term])
/// })
/// .config(SearchConfig::default().with_debounce(Duration::from_millis(200)))
/// .on_success(|results: &Vec<String>| println!("{} results", results.len()))
/// .build();
///
/// assert!(controller.state().is_idle());
/// ```
pub struct SearchControllerBuilder<T> {
    executor: Box<dyn SearchExecutor<T>>,
    config: SearchConfig,
    on_success: Option<SuccessCallback<T>>,
    on_error: Option<ErrorCallback>,
    notifier: Option<Box<dyn ErrorNotifier>>,
}

impl<T: Send + 'static> SearchControllerBuilder<T> {
    pub(super) fn new<E>(executor: E) -> Self
    where
        E: SearchExecutor<T>,
    {
        Self {
            executor: Box::new(executor),
            config: SearchConfig::default(),
            on_success: None,
            on_error: None,
            notifier: None,
        }
    }

    /// Replaces the timing and retry settings.
    #[must_use]
    pub const fn config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Called with every successful result of a live attempt.
    #[must_use]
    pub fn on_success<F>(mut self, callback: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.on_success = Some(Box::new(callback));
        self
    }

    /// Called with every terminal failure, after retries are exhausted.
    #[must_use]
    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&SearchError) + Send + Sync + 'static,
    {
        self.on_error = Some(Box::new(callback));
        self
    }

    /// Sink for user-visible failure notifications.
    ///
    /// Only used when `show_toast_on_error` is enabled. Defaults to
    /// [`LogNotifier`].
    #[must_use]
    pub fn notifier<N>(mut self, notifier: N) -> Self
    where
        N: ErrorNotifier,
    {
        self.notifier = Some(Box::new(notifier));
        self
    }

    /// Builds the controller.
    ///
    /// Timers and attempts run on the current Tokio runtime, or on a
    /// process-wide fallback runtime when called outside Tokio.
    #[must_use]
    pub fn build(self) -> SearchController<T> {
        let (published, _) = watch::channel(super::snapshot(&self.config, &Inner::default()));

        SearchController {
            shared: Arc::new(Shared {
                config: self.config,
                executor: self.executor,
                on_success: self.on_success,
                on_error: self.on_error,
                notifier: self.notifier.unwrap_or_else(|| Box::new(LogNotifier)),
                runtime: runtime::handle(),
                inner: Mutex::new(Inner::default()),
                published,
            }),
        }
    }
}

impl<T> std::fmt::Debug for SearchControllerBuilder<T> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SearchControllerBuilder")
            .field("config", &self.config)
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("notifier", &self.notifier.is_some())
            .finish_non_exhaustive()
    }
}
