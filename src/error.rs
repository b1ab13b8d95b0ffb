//! Search failure types.
//!
//! Every failure an attempt can end with is a [`SearchError`]. The variant
//! decides whether the controller retries it:
//!
//! - [`SearchError::NetworkUnavailable`]: no connectivity, retryable
//! - [`SearchError::Timeout`]: the attempt exceeded its deadline, retryable
//! - [`SearchError::ServerError`]: 5xx-class response, retryable
//! - [`SearchError::ClientError`]: 4xx-class response, never retried
//!
//! Cancellation is not represented here. An attempt superseded by a newer
//! one resolves silently and never reaches state or callbacks.
//!
//! # Examples
//!
//! ```
//! use searchline::error::SearchError;
//!
//! let error = SearchError::server(503, "upstream unavailable");
//! assert!(error.is_retryable());
//!
//! let error = SearchError::client(400, "malformed query");
//! assert!(!error.is_retryable());
//! ```

use std::time::Duration;

use thiserror::Error;

/// HTTP status a timed-out attempt is considered equivalent to.
pub const TIMEOUT_STATUS: u16 = 408;

// =============================================================================
// ErrorKind
// =============================================================================

/// Classification of a [`SearchError`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No connectivity to the search backend.
    NetworkUnavailable,
    /// The attempt did not finish within its deadline.
    Timeout,
    /// The backend failed (5xx-equivalent).
    ServerError,
    /// The request was rejected (4xx-equivalent).
    ClientError,
}

impl ErrorKind {
    /// Returns `true` if failures of this kind may succeed when reattempted.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        !matches!(self, Self::ClientError)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkUnavailable => write!(formatter, "network unavailable"),
            Self::Timeout => write!(formatter, "timeout"),
            Self::ServerError => write!(formatter, "server error"),
            Self::ClientError => write!(formatter, "client error"),
        }
    }
}

// =============================================================================
// SearchError
// =============================================================================

/// A failed search attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The backend could not be reached.
    #[error("Network unavailable: {message}")]
    NetworkUnavailable {
        /// Detailed error message.
        message: String,
    },

    /// The attempt exceeded its deadline.
    #[error("Search timed out after {after:?}")]
    Timeout {
        /// The deadline that was exceeded.
        after: Duration,
    },

    /// The backend answered with a server-side failure.
    #[error("Server error ({status}): {message}")]
    ServerError {
        /// Status code reported by the backend.
        status: u16,
        /// Detailed error message.
        message: String,
    },

    /// The backend rejected the request.
    #[error("Client error ({status}): {message}")]
    ClientError {
        /// Status code reported by the backend.
        status: u16,
        /// Detailed error message.
        message: String,
    },
}

// =============================================================================
// Factory Methods
// =============================================================================

impl SearchError {
    /// Creates a new `NetworkUnavailable` error.
    ///
    /// # Examples
    ///
    /// ```
    /// use searchline::error::SearchError;
    ///
    /// let error = SearchError::network("connection refused");
    /// assert!(error.is_network());
    /// ```
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkUnavailable {
            message: message.into(),
        }
    }

    /// Creates a new `Timeout` error for the given deadline.
    #[must_use]
    pub const fn timeout(after: Duration) -> Self {
        Self::Timeout { after }
    }

    /// Creates a new `ServerError`.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::ServerError {
            status,
            message: message.into(),
        }
    }

    /// Creates a new `ClientError`.
    #[must_use]
    pub fn client(status: u16, message: impl Into<String>) -> Self {
        Self::ClientError {
            status,
            message: message.into(),
        }
    }

    /// Classifies an HTTP-like status code.
    ///
    /// Returns `None` for statuses that do not describe a failure.
    ///
    /// - `408` maps to [`SearchError::Timeout`] with a zero deadline, since
    ///   the backend gave up rather than this client
    /// - other `4xx` map to [`SearchError::ClientError`]
    /// - `5xx` map to [`SearchError::ServerError`]
    ///
    /// # Examples
    ///
    /// ```
    /// use searchline::error::{ErrorKind, SearchError};
    ///
    /// let error = SearchError::from_status(429, "too many requests").unwrap();
    /// assert_eq!(error.kind(), ErrorKind::ClientError);
    ///
    /// let error = SearchError::from_status(502, "bad gateway").unwrap();
    /// assert_eq!(error.kind(), ErrorKind::ServerError);
    ///
    /// assert!(SearchError::from_status(200, "ok").is_none());
    /// ```
    #[must_use]
    pub fn from_status(status: u16, message: impl Into<String>) -> Option<Self> {
        match status {
            TIMEOUT_STATUS => Some(Self::timeout(Duration::ZERO)),
            400..=499 => Some(Self::client(status, message)),
            500..=599 => Some(Self::server(status, message)),
            _ => None,
        }
    }
}

// =============================================================================
// Query Methods
// =============================================================================

impl SearchError {
    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NetworkUnavailable { .. } => ErrorKind::NetworkUnavailable,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::ServerError { .. } => ErrorKind::ServerError,
            Self::ClientError { .. } => ErrorKind::ClientError,
        }
    }

    /// Returns `true` if reattempting the same search may succeed.
    ///
    /// Network failures, timeouts and server errors are retryable. Client
    /// errors are not: the same request will be rejected again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }

    /// Returns `true` if this is a network error.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::NetworkUnavailable { .. })
    }

    /// Returns `true` if this is a timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns `true` if this is a server error.
    #[must_use]
    pub const fn is_server(&self) -> bool {
        matches!(self, Self::ServerError { .. })
    }

    /// Returns `true` if this is a client error.
    #[must_use]
    pub const fn is_client(&self) -> bool {
        matches!(self, Self::ClientError { .. })
    }

    /// Returns the HTTP-equivalent status of this error, if it has one.
    ///
    /// Timeouts report `408`. Network failures never reached a server and
    /// report `None`.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::NetworkUnavailable { .. } => None,
            Self::Timeout { .. } => Some(TIMEOUT_STATUS),
            Self::ServerError { status, .. } | Self::ClientError { status, .. } => Some(*status),
        }
    }

    /// Short text suitable for a user-facing notification.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::NetworkUnavailable { .. } => {
                "Unable to reach the server. Check your connection and try again."
            }
            Self::Timeout { .. } => "The search took too long. Please try again.",
            Self::ServerError { .. } => "The server could not complete the search. Please try again later.",
            Self::ClientError { .. } => "The search request was rejected. Please adjust your query.",
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SearchError::network("down"), ErrorKind::NetworkUnavailable, true)]
    #[case(SearchError::timeout(Duration::from_secs(10)), ErrorKind::Timeout, true)]
    #[case(SearchError::server(500, "boom"), ErrorKind::ServerError, true)]
    #[case(SearchError::server(503, "unavailable"), ErrorKind::ServerError, true)]
    #[case(SearchError::client(400, "bad query"), ErrorKind::ClientError, false)]
    #[case(SearchError::client(429, "slow down"), ErrorKind::ClientError, false)]
    fn kind_and_retryability(
        #[case] error: SearchError,
        #[case] expected_kind: ErrorKind,
        #[case] retryable: bool,
    ) {
        assert_eq!(error.kind(), expected_kind);
        assert_eq!(error.is_retryable(), retryable);
        assert_eq!(error.kind().is_retryable(), retryable);
    }

    #[rstest]
    #[case(408, Some(ErrorKind::Timeout))]
    #[case(400, Some(ErrorKind::ClientError))]
    #[case(404, Some(ErrorKind::ClientError))]
    #[case(429, Some(ErrorKind::ClientError))]
    #[case(499, Some(ErrorKind::ClientError))]
    #[case(500, Some(ErrorKind::ServerError))]
    #[case(599, Some(ErrorKind::ServerError))]
    #[case(200, None)]
    #[case(304, None)]
    #[case(600, None)]
    fn from_status_classification(#[case] status: u16, #[case] expected: Option<ErrorKind>) {
        let kind = SearchError::from_status(status, "message").map(|error| error.kind());
        assert_eq!(kind, expected);
    }

    #[rstest]
    fn status_of_each_variant() {
        assert_eq!(SearchError::network("down").status(), None);
        assert_eq!(SearchError::timeout(Duration::ZERO).status(), Some(408));
        assert_eq!(SearchError::server(502, "bad gateway").status(), Some(502));
        assert_eq!(SearchError::client(422, "invalid").status(), Some(422));
    }

    #[rstest]
    fn display_includes_details() {
        assert_eq!(
            SearchError::server(503, "maintenance").to_string(),
            "Server error (503): maintenance"
        );
        assert_eq!(
            SearchError::timeout(Duration::from_millis(5000)).to_string(),
            "Search timed out after 5s"
        );
        assert_eq!(
            SearchError::network("connection refused").to_string(),
            "Network unavailable: connection refused"
        );
    }

    #[rstest]
    fn predicates_are_exclusive() {
        let error = SearchError::client(400, "bad");
        assert!(error.is_client());
        assert!(!error.is_server());
        assert!(!error.is_timeout());
        assert!(!error.is_network());
    }
}
