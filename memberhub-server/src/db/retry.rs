//! Bounded retry for transient store errors
//!
//! Fixed attempt count, fixed delay, and a caller-supplied predicate that
//! decides which errors are worth another attempt. Anything else aborts
//! on the spot.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

/// Attempts made by the default policy.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Wait between attempts for the default policy.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Retry configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first (values below 1 behave as 1)
    pub max_attempts: u32,
    /// Fixed wait before each retry
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_DELAY,
        }
    }
}

/// Why a retried operation gave up.
#[derive(Debug)]
pub enum RetryError<E> {
    /// Every attempt failed with a retryable error; `last` is the final one
    Exhausted { attempts: u32, last: E },
    /// A non-retryable error ended the loop early
    Aborted(E),
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted { attempts, last } => {
                write!(f, "gave up after {} attempts: {}", attempts, last)
            }
            Self::Aborted(err) => write!(f, "{}", err),
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no waiting.
    pub const fn none() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
        }
    }

    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Run `op` until it succeeds, fails with an error `is_retryable` rejects,
    /// or the attempt budget runs out.
    ///
    /// `op` receives the 1-based attempt number. There are at most
    /// `max_attempts - 1` waits.
    pub async fn run<T, E, F, Fut, P>(&self, is_retryable: P, mut op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: fmt::Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if !is_retryable(&err) => return Err(RetryError::Aborted(err)),
                Err(err) if attempt >= max_attempts => {
                    return Err(RetryError::Exhausted {
                        attempts: attempt,
                        last: err,
                    });
                }
                Err(err) => {
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        delay_ms = self.delay.as_millis() as u64,
                        error = %err,
                        "Transient store error, retrying"
                    );
                    sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
