//! Retry policy shared by every network-calling component.
//!
//! A policy is a fixed attempt cap plus a randomized backoff window. The
//! delay before attempt `n + 1` is drawn uniformly from the window and scaled
//! by `n`.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;

/// Inclusive millisecond window a random delay is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Jitter {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Jitter {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// A window that always yields zero.
    pub const fn none() -> Self {
        Self::new(0, 0)
    }

    /// Draw one delay from the window.
    pub fn sample(&self) -> Duration {
        if self.max_ms <= self.min_ms {
            return Duration::from_millis(self.min_ms);
        }
        Duration::from_millis(rand::rng().random_range(self.min_ms..=self.max_ms))
    }

    /// Sleep for one sampled delay. Zero-length windows return immediately.
    pub async fn pause(&self) {
        let delay = self.sample();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Attempt cap and backoff window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Jitter,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Jitter) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Build the policy from crawler settings.
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(
            config.max_attempts,
            Jitter::new(config.retry_delay_min_ms, config.retry_delay_max_ms),
        )
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.backoff.sample() * attempt.max(1)
    }

    /// Run `op` until it succeeds or the attempt cap is reached.
    ///
    /// `op` receives the 1-based attempt number. No delay follows the final
    /// attempt.
    pub async fn run<T, E, F, Fut>(&self, context: &str, mut op: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Display,
    {
        let mut last_error = String::new();

        for attempt in 1..=self.max_attempts {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    log::debug!(
                        "{} failed (attempt {}/{}): {}",
                        context,
                        attempt,
                        self.max_attempts,
                        e
                    );
                    last_error = e.to_string();
                }
            }

            if attempt < self.max_attempts {
                let delay = self.backoff_for(attempt);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Err(AppError::RetriesExhausted {
            context: context.to_string(),
            attempts: self.max_attempts,
            last_error,
        })
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&CrawlerConfig::default())
    }
}
