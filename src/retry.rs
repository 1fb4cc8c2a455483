//! Retry wrappers for fallible async operations.
//!
//! Two policies are offered. A fixed policy makes up to `attempts` calls
//! with a constant pause between them. An exponential policy makes one call
//! plus up to `retries` more, multiplying the pause after each failure up
//! to a ceiling.
//! Neither looks at the error: every failure is retried until the budget is
//! spent, and the last error is returned.

use crate::constants::{
    DEFAULT_BACKOFF_MULTIPLIER, DEFAULT_MAX_RETRY_DELAY_MS, DEFAULT_RETRY_ATTEMPTS,
    DEFAULT_RETRY_DELAY_MS,
};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// How often and how patiently to retry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RetryPolicy {
    Fixed {
        attempts: u32,
        delay: Duration,
    },
    Exponential {
        retries: u32,
        initial_delay: Duration,
        multiplier: f64,
        max_delay: Duration,
    },
}

impl RetryPolicy {
    pub fn fixed(attempts: u32, delay: Duration) -> Self {
        Self::Fixed { attempts, delay }
    }

    /// Multipliers below 1 (and NaN) are raised to 1
    pub fn exponential(retries: u32, initial_delay: Duration, multiplier: f64) -> Self {
        Self::Exponential {
            retries,
            initial_delay,
            multiplier: multiplier.max(1.0),
            max_delay: Duration::from_millis(DEFAULT_MAX_RETRY_DELAY_MS),
        }
    }

    /// Cap every exponential pause at `ceiling`; fixed policies are unchanged
    pub fn with_max_delay(self, ceiling: Duration) -> Self {
        match self {
            Self::Exponential {
                retries,
                initial_delay,
                multiplier,
                ..
            } => Self::Exponential {
                retries,
                initial_delay,
                multiplier,
                max_delay: ceiling,
            },
            fixed => fixed,
        }
    }

    /// Total number of calls the policy allows, never less than one
    pub fn max_attempts(&self) -> u32 {
        match self {
            Self::Fixed { attempts, .. } => (*attempts).max(1),
            Self::Exponential { retries, .. } => retries.saturating_add(1),
        }
    }

    /// Pause after the `failed`-th failed call (1-based)
    pub fn delay_after(&self, failed: u32) -> Duration {
        match self {
            Self::Fixed { delay, .. } => *delay,
            Self::Exponential {
                initial_delay,
                multiplier,
                max_delay,
                ..
            } => {
                let exponent = failed.saturating_sub(1).min(i32::MAX as u32) as i32;
                let seconds = initial_delay.as_secs_f64() * multiplier.powi(exponent);
                // Overflowing, negative or NaN products saturate at the ceiling
                Duration::try_from_secs_f64(seconds)
                    .map_or(*max_delay, |pause| pause.min(*max_delay))
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::exponential(
            DEFAULT_RETRY_ATTEMPTS,
            Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            DEFAULT_BACKOFF_MULTIPLIER,
        )
    }
}

/// Run `operation` until it succeeds or `policy` is exhausted
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts();
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!("Operation succeeded on attempt {}/{}", attempt, max_attempts);
                }
                return Ok(value);
            }
            Err(e) if attempt >= max_attempts => {
                warn!("All {} attempts failed, last error: {}", max_attempts, e);
                return Err(e);
            }
            Err(e) => {
                let pause = policy.delay_after(attempt);
                warn!(
                    "Attempt {}/{} failed: {}. Retrying in {} ms",
                    attempt,
                    max_attempts,
                    e,
                    pause.as_millis()
                );
                sleep(pause).await;
                attempt += 1;
            }
        }
    }
}

/// Fixed-delay retry with up to `attempts` calls
pub async fn retry_operation<T, E, F, Fut>(
    operation: F,
    attempts: u32,
    delay: Duration,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    retry(&RetryPolicy::fixed(attempts, delay), operation).await
}

/// Exponential-backoff retry with up to `retries` extra calls
pub async fn fetch_with_retry<T, E, F, Fut>(
    operation: F,
    retries: u32,
    initial_delay: Duration,
    multiplier: f64,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    retry(
        &RetryPolicy::exponential(retries, initial_delay, multiplier),
        operation,
    )
    .await
}
