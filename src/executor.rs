//! The search backend seam.
//!
//! The controller never talks to a backend directly. Hosts hand it a
//! [`SearchExecutor`], usually a closure:
//!
//! ```
//! use searchline::error::SearchError;
//! use searchline::executor::SearchExecutor;
//! use searchline::token::AttemptToken;
//!
//! fn assert_executor<E: SearchExecutor<Vec<String>>>(_: &E) {}
//!
//! let executor = |term: String, _token: AttemptToken| async move {
//!     if term == "offline" {
//!         Err(SearchError::network("no route to host"))
//!     } else {
//!         Ok(vec![term])
//!     }
//! };
//! assert_executor(&executor);
//! ```

use std::future::Future;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::error::SearchError;
use crate::token::AttemptToken;

/// Performs one search attempt.
///
/// Implementations should watch `token` and stop their I/O once it is
/// cancelled. Results produced after cancellation are ignored.
///
/// An attempt whose token is already cancelled when its task starts never
/// reaches the executor. A panic, whether raised by `search` itself or by
/// the returned future, settles the attempt as a terminal
/// [`SearchError::ServerError`] with status
/// [`PANIC_STATUS`](crate::controller::PANIC_STATUS); it is not retried.
pub trait SearchExecutor<T>: Send + Sync + 'static {
    /// Starts searching for `term`.
    fn search(&self, term: String, token: AttemptToken) -> BoxFuture<'static, Result<T, SearchError>>;
}

impl<T, F, Fut> SearchExecutor<T> for F
where
    F: Fn(String, AttemptToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, SearchError>> + Send + 'static,
{
    fn search(&self, term: String, token: AttemptToken) -> BoxFuture<'static, Result<T, SearchError>> {
        self(term, token).boxed()
    }
}
