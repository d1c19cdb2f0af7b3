//! Review status polling.
//!
//! A `ReviewSession` owns one polling sequence at a time: given a review
//! identifier it repeatedly fetches the current snapshot from the service,
//! reports every snapshot to a caller-supplied callback, and settles exactly
//! once — either with the final snapshot or with a client-side error
//! (attempt timeout, deadline, cancellation, transport failure).
//!
//! End conditions, in the order they are checked after each fetch:
//! 1. terminal status (`completed`/`failed`) — settle with the snapshot
//! 2. non-empty `error_message` — settle with the snapshot even when the
//!    status field disagrees (the service sets the message first in some
//!    failure paths; contract ambiguity preserved on purpose)
//! 3. attempt count exhausted — `PollError::AttemptsExhausted`
//! 4. still pending/in-progress past the wall-clock budget —
//!    `PollError::DeadlineExceeded`
//! 5. any unrecognized status — settle with the snapshot rather than loop
//!
//! The session enforces "one sequence at a time": a second `run` while one
//! is in flight returns `PollError::AlreadyActive` instead of starting an
//! interleaved loop. Cancellation is cooperative and suppresses callbacks
//! for responses already in flight.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::api::models::{Review, ReviewStatus};
use crate::errors::{ApiError, PollError};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;
pub const DEFAULT_INTERVAL_MS: u64 = 2_000;
pub const DEFAULT_BUDGET_MS: u64 = 300_000;

/// Fetches the current snapshot of a review. Implemented by the HTTP client;
/// the seam exists so the polling machine is testable without a network.
#[async_trait]
pub trait ReviewFetcher: Send + Sync {
    async fn fetch_review(&self, id: &str) -> Result<Review, ApiError>;
}

/// Polling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Maximum fetch attempts before giving up.
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub interval: Duration,
    /// Absolute wall-clock budget for the whole sequence.
    pub budget: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            budget: Duration::from_millis(DEFAULT_BUDGET_MS),
        }
    }
}

/// One polling sequence owner. See the module docs for the state machine.
pub struct ReviewSession<F: ReviewFetcher> {
    fetcher: Arc<F>,
    config: PollConfig,
    /// Identifier of the sequence currently in flight, if any. Checked and
    /// set together under the lock so two loops can never interleave.
    active: Mutex<Option<String>>,
    cancel_tx: watch::Sender<bool>,
}

/// Clears the active-id guard on every exit path of `run`.
struct ActiveGuard<'a> {
    active: &'a Mutex<Option<String>>,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut active) = self.active.lock() {
            *active = None;
        }
    }
}

impl<F: ReviewFetcher> ReviewSession<F> {
    pub fn new(fetcher: Arc<F>, config: PollConfig) -> Self {
        let (cancel_tx, _) = watch::channel(false);
        Self {
            fetcher,
            config,
            active: Mutex::new(None),
            cancel_tx,
        }
    }

    /// Identifier of the in-flight sequence, if one is running.
    pub fn active_id(&self) -> Option<String> {
        self.active.lock().ok().and_then(|a| a.clone())
    }

    /// Request cooperative cancellation of the in-flight sequence. No
    /// further fetch is issued and no callback fires once the cancellation
    /// is observed. A later `run` starts fresh.
    pub fn cancel(&self) {
        self.cancel_tx.send_replace(true);
    }

    fn is_cancelled(&self) -> bool {
        *self.cancel_tx.borrow()
    }

    /// Poll `id` until an end condition is met, invoking `on_update` once
    /// per successful fetch (terminal snapshots included), in strict fetch
    /// order. Resolves exactly once.
    pub async fn run(
        &self,
        id: &str,
        mut on_update: impl FnMut(&Review) + Send,
    ) -> Result<Review, PollError> {
        {
            let mut active = self.active.lock().expect("session guard poisoned");
            if let Some(current) = active.as_ref() {
                return Err(PollError::AlreadyActive {
                    id: current.clone(),
                });
            }
            *active = Some(id.to_string());
        }
        let _guard = ActiveGuard {
            active: &self.active,
        };

        // A cancellation left over from a previous sequence does not apply
        // to this one.
        self.cancel_tx.send_replace(false);
        let mut cancel_rx = self.cancel_tx.subscribe();

        let start = tokio::time::Instant::now();
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            tracing::debug!(
                review_id = id,
                attempt = attempts,
                max_attempts = self.config.max_attempts,
                "fetching review status"
            );

            let review = tokio::select! {
                _ = cancel_rx.changed() => return Err(PollError::Cancelled),
                fetched = self.fetcher.fetch_review(id) => fetched?,
            };

            // A cancellation that raced the response suppresses the callback.
            if self.is_cancelled() {
                return Err(PollError::Cancelled);
            }
            on_update(&review);

            if review.status.is_terminal() {
                tracing::debug!(review_id = id, status = %review.status, "review settled");
                return Ok(review);
            }
            if review.has_error() {
                // Error message present while the status still says otherwise:
                // treated as an immediate failure signal.
                tracing::debug!(review_id = id, "review carries an error message, stopping");
                return Ok(review);
            }
            if attempts >= self.config.max_attempts {
                return Err(PollError::AttemptsExhausted { attempts });
            }

            match review.status {
                ReviewStatus::Pending | ReviewStatus::InProgress => {
                    if start.elapsed() > self.config.budget {
                        return Err(PollError::DeadlineExceeded {
                            budget_ms: self.config.budget.as_millis() as u64,
                        });
                    }
                    tokio::select! {
                        _ = cancel_rx.changed() => return Err(PollError::Cancelled),
                        _ = tokio::time::sleep(self.config.interval) => {}
                    }
                }
                other => {
                    tracing::warn!(
                        review_id = id,
                        status = %other,
                        "unexpected review status, stopping"
                    );
                    return Ok(review);
                }
            }
        }
    }
}
