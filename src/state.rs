//! Observable controller state.
//!
//! The controller publishes a fresh [`SearchState`] snapshot after every
//! transition. Snapshots are plain values: reading one never blocks the
//! controller, and holding one never keeps the controller alive.

use crate::error::SearchError;

// =============================================================================
// SearchPhase
// =============================================================================

/// Position of the controller in its state machine.
///
/// ```text
/// Idle ──search──▶ Debouncing ──timer──▶ InFlight ──success──▶ Idle
///                                           │
///                     ┌── retryable, budget left ──▶ RetryScheduled ──timer──▶ InFlight
///                     └── otherwise ──▶ ErrorTerminal ──retry()──▶ InFlight
/// ```
///
/// `cancel()` and `search("")` return to `Idle` from any phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchPhase {
    /// Nothing pending.
    #[default]
    Idle,
    /// Waiting for input to settle before dispatching.
    Debouncing,
    /// An attempt is running.
    InFlight,
    /// An attempt failed and a retry timer is pending.
    RetryScheduled,
    /// The last search failed and will not be retried automatically.
    ErrorTerminal,
}

impl std::fmt::Display for SearchPhase {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(formatter, "idle"),
            Self::Debouncing => write!(formatter, "debouncing"),
            Self::InFlight => write!(formatter, "in-flight"),
            Self::RetryScheduled => write!(formatter, "retry-scheduled"),
            Self::ErrorTerminal => write!(formatter, "error"),
        }
    }
}

// =============================================================================
// SearchState
// =============================================================================

/// Snapshot of a controller's observable state.
///
/// # Invariants
///
/// - `is_searching` implies `error.is_none()`
/// - `last_search_term` is empty only when no search has been dispatched
///   since the last reset
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchState {
    /// `true` while an attempt or a scheduled retry is outstanding.
    pub is_searching: bool,
    /// The last terminal failure, if any.
    pub error: Option<SearchError>,
    /// The most recently dispatched term.
    pub last_search_term: String,
    /// Retries consumed for the current term.
    pub retry_count: u32,
    /// `true` while `retry_count` is below the configured retry budget.
    pub can_retry: bool,
    /// Current state-machine phase.
    pub phase: SearchPhase,
}

impl SearchState {
    /// Returns `true` if the controller has nothing pending and no term.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.phase == SearchPhase::Idle && self.last_search_term.is_empty()
    }

    /// Returns `true` if a terminal error is being displayed.
    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.error.is_some()
    }
}
