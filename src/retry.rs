//! Bounded retry with linear backoff
//!
//! Calls that carry encrypted payloads to the sync server are retried on
//! both transport failures and non-success responses. The caller folds both
//! into the operation's `Err`; the policy only decides how many times to try
//! and how long to wait in between. The n-th retry waits `base_delay * n`.
//!
//! This is library API for code that talks to the sync server. The
//! `msgcrypt` binary makes no network calls, so none of its commands run
//! through a policy; embedders build one with
//! [`RetrySettings::policy`](crate::config::RetrySettings::policy) to honor
//! the `retry` section of `config.json`.

use std::fmt::Display;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::CryptError;

/// How many times to try an operation and how long to wait between tries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(6, Duration::from_millis(1000))
    }
}

/// Terminal result of a retried operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryOutcome<T, E> {
    /// The operation succeeded on attempt number `attempts`
    Succeeded { value: T, attempts: u32 },
    /// Every attempt failed; `last_error` is from the final one
    Exhausted { last_error: E, attempts: u32 },
}

impl<T, E> RetryOutcome<T, E> {
    /// Number of attempts made
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Succeeded { attempts, .. } | Self::Exhausted { attempts, .. } => *attempts,
        }
    }

    /// Check if the operation eventually succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

impl<T, E: Display> RetryOutcome<T, E> {
    /// Turn exhaustion into [`CryptError::RetryExhausted`]
    pub fn into_result(self) -> Result<T, CryptError> {
        match self {
            Self::Succeeded { value, .. } => Ok(value),
            Self::Exhausted {
                last_error,
                attempts,
            } => Err(CryptError::RetryExhausted {
                attempts,
                last_error: last_error.to_string(),
            }),
        }
    }
}

impl RetryPolicy {
    /// Create a policy; `max_attempts` is clamped to at least one
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Total attempts, including the first
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before retry number `retry` (1 for the first retry)
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(retry)
    }

    /// Run `op` until it succeeds or attempts run out, sleeping the
    /// calling thread between attempts
    pub fn run<T, E, F>(&self, op: F) -> RetryOutcome<T, E>
    where
        E: Display,
        F: FnMut(u32) -> Result<T, E>,
    {
        self.run_with_sleep(op, std::thread::sleep)
    }

    /// Like [`run`](Self::run), with a caller-supplied sleep
    ///
    /// `op` receives the 1-based attempt number.
    pub fn run_with_sleep<T, E, F, S>(&self, mut op: F, mut sleep: S) -> RetryOutcome<T, E>
    where
        E: Display,
        F: FnMut(u32) -> Result<T, E>,
        S: FnMut(Duration),
    {
        let mut attempt = 1;
        loop {
            match op(attempt) {
                Ok(value) => {
                    debug!(attempt, "operation succeeded");
                    return RetryOutcome::Succeeded {
                        value,
                        attempts: attempt,
                    };
                }
                Err(e) if attempt >= self.max_attempts => {
                    warn!(attempt, error = %e, "giving up");
                    return RetryOutcome::Exhausted {
                        last_error: e,
                        attempts: attempt,
                    };
                }
                Err(e) => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        attempt,
                        error = %e,
                        delay_ms = delay.as_millis() as u64,
                        "attempt failed, retrying"
                    );
                    sleep(delay);
                    attempt += 1;
                }
            }
        }
    }
}
