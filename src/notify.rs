//! User-visible failure notifications.
//!
//! When [`SearchConfig::show_toast_on_error`](crate::config::SearchConfig)
//! is set, terminal failures are handed to an [`ErrorNotifier`]. The host
//! usually forwards them to its toast widget; the default [`LogNotifier`]
//! only emits a `tracing` event.

use crate::error::SearchError;

/// Receives terminal search failures for display.
pub trait ErrorNotifier: Send + Sync + 'static {
    /// Shows `error` to the user.
    fn notify(&self, error: &SearchError);
}

impl<F> ErrorNotifier for F
where
    F: Fn(&SearchError) + Send + Sync + 'static,
{
    fn notify(&self, error: &SearchError) {
        self(error);
    }
}

/// Notifier that logs failures at `warn` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl ErrorNotifier for LogNotifier {
    fn notify(&self, error: &SearchError) {
        tracing::warn!(
            kind = %error.kind(),
            status = ?error.status(),
            "{}",
            error.user_message()
        );
    }
}
