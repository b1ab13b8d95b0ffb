//! # searchline
//!
//! A debounced, cancellable, retrying search controller for async search
//! backends.
//!
//! ## Overview
//!
//! Search boxes fire a query on every keystroke. Sending each one to the
//! backend wastes requests and lets slow, stale responses overwrite fresh
//! ones. [`SearchController`](controller::SearchController) sits between
//! the input and the backend and provides:
//!
//! - **Debouncing**: only the last term typed within a quiet window is sent
//! - **Supersession**: at most one attempt is live; older ones are cancelled
//!   through their [`AttemptToken`](token::AttemptToken) and their results
//!   are ignored
//! - **Deadlines**: each attempt fails with a timeout after a fixed limit
//! - **Retries**: network failures, timeouts and server errors are retried
//!   with linear backoff; client errors are surfaced at once
//! - **Observable state**: a [`SearchState`](state::SearchState) snapshot
//!   published through a `tokio::sync::watch` channel
//!
//! ## Modules
//!
//! - [`config`]: timing and retry settings
//! - [`controller`]: the controller and its builder
//! - [`executor`]: the backend seam
//! - [`error`]: failure taxonomy and retry classification
//! - [`state`]: observable snapshots and the state-machine phase
//! - [`token`]: per-attempt cancellation
//! - [`attempt`]: the deadline/cancellation race for one attempt
//! - [`notify`]: user-visible failure notifications
//! - [`runtime`]: runtime selection
//!
//! ## Example
//!
//! ```rust
//! use searchline::prelude::*;
//! use std::time::Duration;
//!
//! let controller = SearchController::builder(|term: String, token: AttemptToken| async move {
//!     if token.is_cancelled() {
//!         return Err(SearchError::network("aborted"));
//!     }
//!     Ok::<_, SearchError>(vec![term])
//! })
//! .config(SearchConfig::default().with_retry_delay(Duration::from_millis(500)))
//! .build();
//!
//! controller.search("   ");
//! assert!(controller.state().is_idle());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// ```rust
/// use searchline::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::SearchConfig;
    pub use crate::controller::{SearchController, SearchControllerBuilder};
    pub use crate::error::{ErrorKind, SearchError};
    pub use crate::executor::SearchExecutor;
    pub use crate::notify::{ErrorNotifier, LogNotifier};
    pub use crate::state::{SearchPhase, SearchState};
    pub use crate::token::AttemptToken;
}

pub mod attempt;
pub mod config;
pub mod controller;
pub mod error;
pub mod executor;
pub mod notify;
pub mod runtime;
pub mod state;
pub mod token;
