//! Timeout and bounded retry around collaborator calls.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::constants::DEFAULT_RETRY_BACKOFF;

/// How one kind of external call is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallPolicy {
    /// Upper bound for a single attempt.
    pub timeout: Duration,
    /// Extra attempts after the first one fails transiently.
    pub retries: u32,
    /// Fixed pause before each retry.
    pub backoff: Duration,
}

/// Why a call under a [`CallPolicy`] gave up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallFailure<E> {
    /// The last attempt exceeded the timeout.
    TimedOut {
        /// Per-attempt timeout.
        after: Duration,
        /// Attempts made.
        attempts: u32,
    },
    /// The last attempt returned an error.
    Failed {
        /// Error from the last attempt.
        error: E,
        /// Attempts made.
        attempts: u32,
    },
}

impl<E: std::fmt::Display> std::fmt::Display for CallFailure<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallFailure::TimedOut { after, attempts } => {
                write!(f, "timed out after {after:?} ({attempts} attempt(s))")
            }
            CallFailure::Failed { error, .. } => write!(f, "{error}"),
        }
    }
}

impl CallPolicy {
    /// A policy with `retries` extra attempts and the default backoff.
    pub const fn new(timeout: Duration, retries: u32) -> Self {
        Self {
            timeout,
            retries,
            backoff: DEFAULT_RETRY_BACKOFF,
        }
    }

    /// A single attempt, no retry.
    pub const fn once(timeout: Duration) -> Self {
        Self::new(timeout, 0)
    }

    /// Overrides the backoff.
    pub const fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Total attempts allowed.
    #[inline]
    pub fn max_attempts(&self) -> u32 {
        self.retries + 1
    }

    /// Runs `call` until it succeeds, fails permanently, or attempts run out.
    ///
    /// Timeouts are always retried; errors only when `is_transient` says so.
    ///
    /// A timed-out attempt is abandoned, not cancelled: its future is dropped, but work it
    /// handed to `spawn_blocking` keeps running to completion. A timeout followed by a
    /// retry can therefore leave two blocking jobs in flight for the same call.
    pub async fn run<T, E, F, Fut>(
        &self,
        operation: &'static str,
        mut call: F,
        is_transient: impl Fn(&E) -> bool,
    ) -> Result<T, CallFailure<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;
            if attempt > 1 {
                tokio::time::sleep(self.backoff).await;
            }

            match tokio::time::timeout(self.timeout, call()).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(error)) => {
                    if attempt >= self.max_attempts() || !is_transient(&error) {
                        return Err(CallFailure::Failed {
                            error,
                            attempts: attempt,
                        });
                    }
                    warn!(operation, attempt, error = %error, "Call failed; retrying");
                }
                Err(_) => {
                    if attempt >= self.max_attempts() {
                        return Err(CallFailure::TimedOut {
                            after: self.timeout,
                            attempts: attempt,
                        });
                    }
                    warn!(operation, attempt, timeout = ?self.timeout, "Call timed out; retrying");
                }
            }
        }
    }
}
