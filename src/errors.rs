//! Typed error hierarchy for the revq client.
//!
//! Two top-level enums cover the two subsystems:
//! - `ApiError` — HTTP transport and status-code failures from the remote service
//! - `PollError` — client-side outcomes of the review polling state machine
//!
//! A server-reported review failure (terminal status `failed`, or a record
//! carrying an `error_message`) is deliberately NOT an error type: polling
//! resolves with that snapshot and the presentation layer renders it. This
//! keeps client-side timeouts distinguishable from server-side failures.

use thiserror::Error;

/// Errors surfaced by the HTTP client layer.
///
/// Every variant renders as a displayable, user-facing message.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Client-side validation failure. Blocks the request before any
    /// network call is made.
    #[error("{0}")]
    Validation(String),

    /// Could not reach the service at all.
    #[error("Connection error. Check your network and the service URL.")]
    Connect(#[source] reqwest::Error),

    /// The request was sent but did not complete in time.
    #[error("Request timeout. Please try again.")]
    Timeout(#[source] reqwest::Error),

    /// The response arrived but could not be decoded.
    #[error("Malformed response from the service: {0}")]
    Decode(#[source] reqwest::Error),

    /// 401 from the service. For non-auth endpoints the client has already
    /// cleared stored credentials and broadcast a logout signal by the time
    /// this is returned.
    #[error("{message}")]
    Unauthorized { message: String },

    /// 429 from the service.
    #[error("Rate limit exceeded: {message}")]
    RateLimited { message: String },

    /// 5xx from the service.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Any other status-coded failure (404, 400, ...).
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// Classify a reqwest transport error into the taxonomy.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(err)
        } else if err.is_connect() {
            ApiError::Connect(err)
        } else if err.is_decode() {
            ApiError::Decode(err)
        } else {
            ApiError::Other(err.into())
        }
    }

    /// Whether the limited transport-level retry policy applies.
    ///
    /// Only connection-level failures are retried: the request never reached
    /// the service, so resending cannot duplicate work. Timeouts are not
    /// retried because the request may have been processed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::Connect(_))
    }
}

/// Client-side outcomes of a polling sequence that did not settle on a
/// review snapshot.
#[derive(Debug, Error)]
pub enum PollError {
    /// The maximum attempt count was reached without a terminal status.
    /// Distinct from a server-reported review failure.
    #[error("Timed out waiting for review completion after {attempts} attempts")]
    AttemptsExhausted { attempts: u32 },

    /// The absolute wall-clock budget was exceeded while the review was
    /// still pending or in progress.
    #[error("Polling deadline exceeded after {budget_ms} ms")]
    DeadlineExceeded { budget_ms: u64 },

    /// A polling sequence is already in flight on this session. The session
    /// never runs two interleaved loops; the caller may treat this as a
    /// no-op when the identifier matches the active one.
    #[error("A poll is already active for review {id}")]
    AlreadyActive { id: String },

    /// The session owner cancelled the sequence.
    #[error("Polling cancelled")]
    Cancelled,

    /// A fetch failed at the transport or status layer.
    #[error(transparent)]
    Api(#[from] ApiError),
}
