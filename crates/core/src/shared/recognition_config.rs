use std::time::Duration;

use thiserror::Error;

use crate::shared::constants::{CANONICAL_SIZE, DEFAULT_COOLDOWN_MS};

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("threshold must be a finite number, got {0}")]
    Threshold(f64),
    #[error("canonical size must be positive")]
    CanonicalSize,
}

/// Tunables for the recognition engine and greeting throttle.
///
/// The acceptance threshold has no default: the right value depends on the
/// embedding model in use, so callers always supply it.
#[derive(Clone, Debug, PartialEq)]
pub struct RecognitionConfig {
    threshold: f64,
    cooldown: Duration,
    canonical_size: u32,
}

impl RecognitionConfig {
    pub fn new(threshold: f64) -> Result<Self, ConfigError> {
        if !threshold.is_finite() {
            return Err(ConfigError::Threshold(threshold));
        }
        Ok(Self {
            threshold,
            cooldown: Duration::from_millis(DEFAULT_COOLDOWN_MS),
            canonical_size: CANONICAL_SIZE,
        })
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_canonical_size(mut self, size: u32) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::CanonicalSize);
        }
        self.canonical_size = size;
        Ok(self)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn canonical_size(&self) -> u32 {
        self.canonical_size
    }
}
