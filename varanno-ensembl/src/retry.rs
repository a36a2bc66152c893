//! Bounded retry with exponential backoff.
//!
//! The schedule is deterministic: a fixed number of attempts, backoff
//! doubling after each transient failure, and an optional server-provided
//! wait (429 `Retry-After`) overriding the schedule for that step. Keeping
//! the loop generic over an attempt closure keeps it testable without a
//! network.

use std::thread;
use std::time::Duration;

use varanno_core::AnnotError;

/// Result of a single request attempt.
pub enum AttemptOutcome<T> {
    /// The request succeeded.
    Done(T),
    /// The request failed and must not be retried (4xx other than 429).
    Fatal(AnnotError),
    /// The request failed transiently. `wait` overrides the backoff schedule
    /// when the server supplied a hint; `error` is surfaced if the bound is
    /// exhausted.
    Transient {
        wait: Option<Duration>,
        error: AnnotError,
    },
}

/// Deterministic retry schedule.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
}

impl RetryPolicy {
    /// Runs `attempt` up to `max_attempts` times, sleeping between transient
    /// failures. The attempt closure receives the 1-based attempt number.
    pub fn run<T>(
        &self,
        mut attempt: impl FnMut(u32) -> AttemptOutcome<T>,
    ) -> Result<T, AnnotError> {
        let mut backoff = self.initial_backoff;
        for n in 1..=self.max_attempts.max(1) {
            match attempt(n) {
                AttemptOutcome::Done(value) => return Ok(value),
                AttemptOutcome::Fatal(error) => return Err(error),
                AttemptOutcome::Transient { wait, error } => {
                    if n >= self.max_attempts {
                        return Err(error);
                    }
                    log::debug!("attempt {} failed ({}), backing off", n, error);
                    thread::sleep(wait.unwrap_or(backoff));
                    backoff *= 2;
                }
            }
        }
        unreachable!("retry loop always returns within the attempt bound")
    }
}
