//! Retry utilities with exponential backoff for resilient API calls.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first call
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Factor applied to the delay after every retry
    pub backoff_multiplier: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_millis(1000),
            backoff_multiplier: 2,
        }
    }
}

impl RetryConfig {
    /// Set the maximum number of attempts
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Set the delay before the first retry
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the backoff multiplier
    pub fn backoff_multiplier(mut self, multiplier: u32) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Delays slept between attempts when every attempt fails
    pub fn schedule(&self) -> Vec<Duration> {
        let retries = self.max_attempts.max(1) - 1;
        let mut delay = self.initial_delay;
        let mut delays = Vec::with_capacity(retries as usize);

        for _ in 0..retries {
            delays.push(delay);
            delay = delay.saturating_mul(self.backoff_multiplier);
        }

        delays
    }
}

/// Result of a retry operation
#[derive(Debug, Clone, PartialEq)]
pub enum RetryOutcome<T, E> {
    /// Operation succeeded
    Success(T),
    /// Every attempt failed
    Exhausted {
        /// Number of calls made
        attempts: u32,
        /// Error returned by the final call
        last_error: E,
    },
}

impl<T, E> RetryOutcome<T, E> {
    /// Whether the operation eventually succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, RetryOutcome::Success(_))
    }

    /// Convert into a plain `Result`, dropping the attempt count
    pub fn into_result(self) -> Result<T, E> {
        match self {
            RetryOutcome::Success(value) => Ok(value),
            RetryOutcome::Exhausted { last_error, .. } => Err(last_error),
        }
    }
}

/// Execute an async operation, retrying every failure with exponential backoff.
///
/// The delay starts at `initial_delay` and is multiplied after each retry.
/// No delay follows the final attempt.
pub async fn with_retry<T, E, F, Fut>(config: RetryConfig, mut operation: F) -> RetryOutcome<T, E>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempts = 0;
    let mut delay = config.initial_delay;

    loop {
        match operation().await {
            Ok(value) => {
                if attempts > 0 {
                    tracing::info!(
                        "Operation succeeded on attempt {} after {} failures",
                        attempts + 1,
                        attempts
                    );
                }
                return RetryOutcome::Success(value);
            }
            Err(error) => {
                attempts += 1;

                if attempts >= max_attempts {
                    tracing::error!("Operation failed after {} attempts: {}", attempts, error);
                    return RetryOutcome::Exhausted {
                        attempts,
                        last_error: error,
                    };
                }

                tracing::warn!(
                    "Attempt {}/{} failed: {}. Retrying in {:?}",
                    attempts,
                    max_attempts,
                    error,
                    delay
                );

                sleep(delay).await;
                delay = delay.saturating_mul(config.backoff_multiplier);
            }
        }
    }
}
