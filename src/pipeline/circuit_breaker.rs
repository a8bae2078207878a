//! Circuit Breaker pattern implementation.
//!
//! Guards the full-table replace: an empty reconciled table is never written,
//! and a sharp drop in row count compared to the stored table aborts the
//! write unless forced.

use crate::error::{AppError, Result};
use crate::models::StorageConfig;

/// Circuit breaker configuration.
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Whether the drop check runs at all. Empty results are always refused.
    pub enabled: bool,
    /// Maximum allowed drop percentage (0-100). Default: 20%
    pub max_drop_percent: u8,
    /// Minimum previous row count to trigger the drop check.
    pub min_baseline: usize,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self::from(&StorageConfig::default())
    }
}

impl From<&StorageConfig> for CircuitBreakerConfig {
    fn from(storage: &StorageConfig) -> Self {
        Self {
            enabled: storage.circuit_breaker,
            max_drop_percent: storage.max_drop_percent,
            min_baseline: storage.min_baseline,
        }
    }
}

/// Circuit breaker for preventing bad table replacements.
#[derive(Debug, Clone, Default)]
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
}

/// Result of circuit breaker check.
#[derive(Debug, Clone)]
pub enum CircuitBreakerResult {
    /// Safe to proceed with the write
    Safe {
        current_count: usize,
        previous_count: usize,
    },
    /// No stored table yet, or too small to compare against
    ColdStart { current_count: usize },
    /// Drop check disabled in configuration
    Disabled { current_count: usize },
    /// Circuit breaker triggered - abort write
    Triggered {
        current_count: usize,
        previous_count: usize,
        drop_percent: f64,
    },
    /// Empty result - critical failure
    EmptyResult,
}

impl CircuitBreaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CircuitBreakerConfig) -> Self {
        Self { config }
    }

    /// Compare the row count about to be written with the stored one.
    pub fn check(&self, current_count: usize, previous_count: usize) -> CircuitBreakerResult {
        if current_count == 0 {
            return CircuitBreakerResult::EmptyResult;
        }

        if !self.config.enabled {
            return CircuitBreakerResult::Disabled { current_count };
        }

        if previous_count < self.config.min_baseline {
            return CircuitBreakerResult::ColdStart { current_count };
        }

        if current_count < previous_count {
            let drop = previous_count - current_count;
            let drop_percent = (drop as f64 / previous_count as f64) * 100.0;

            if drop_percent > self.config.max_drop_percent as f64 {
                return CircuitBreakerResult::Triggered {
                    current_count,
                    previous_count,
                    drop_percent,
                };
            }
        }

        CircuitBreakerResult::Safe {
            current_count,
            previous_count,
        }
    }

    /// Validate and return Ok if safe, Err if circuit breaker triggered.
    ///
    /// `force` lets a drop through but never an empty table.
    pub fn validate(&self, current_count: usize, previous_count: usize, force: bool) -> Result<()> {
        match self.check(current_count, previous_count) {
            CircuitBreakerResult::Safe {
                current_count,
                previous_count,
            } => {
                log::info!(
                    "Circuit breaker: SAFE ({} rows, was {})",
                    current_count,
                    previous_count
                );
                Ok(())
            }
            CircuitBreakerResult::ColdStart { current_count } => {
                log::info!(
                    "Circuit breaker: COLD START ({} rows, no usable previous table)",
                    current_count
                );
                Ok(())
            }
            CircuitBreakerResult::Disabled { current_count } => {
                log::debug!("Circuit breaker: disabled ({} rows)", current_count);
                Ok(())
            }
            CircuitBreakerResult::Triggered {
                current_count,
                previous_count,
                drop_percent,
            } => {
                if force {
                    log::warn!(
                        "Circuit breaker: forced past {} → {} rows ({:.1}% drop)",
                        previous_count,
                        current_count,
                        drop_percent
                    );
                    return Ok(());
                }
                log::error!(
                    "Circuit breaker: TRIGGERED! {} → {} rows ({:.1}% drop > {}% threshold)",
                    previous_count,
                    current_count,
                    drop_percent,
                    self.config.max_drop_percent
                );
                Err(AppError::CircuitBreakerTriggered {
                    current_count,
                    previous_count,
                    drop_percent,
                    threshold_percent: self.config.max_drop_percent,
                })
            }
            CircuitBreakerResult::EmptyResult => {
                log::error!("Circuit breaker: EMPTY RESULT - aborting write");
                Err(AppError::EmptyDataset)
            }
        }
    }
}
