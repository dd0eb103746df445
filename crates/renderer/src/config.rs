//! Configuration for the aggregation engine.

use ar_common::{ArError, ArResult};
use serde::{Deserialize, Serialize};

/// Glyphs per leaf task (and cells per transfer tile) unless overridden.
pub const DEFAULT_TASK_SIZE: usize = 100_000;

/// Configuration for [`ParallelRenderer`](crate::ParallelRenderer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Largest glyph range reduced by a single leaf task. Transfer tiles
    /// hold roughly this many cells.
    pub task_size: usize,

    /// Worker threads in the pool; 0 means one per available core.
    pub threads: usize,

    /// Track glyphs processed so `progress()` reports a fraction instead
    /// of the disabled sentinel.
    pub record_progress: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            task_size: DEFAULT_TASK_SIZE,
            threads: 0,
            record_progress: false,
        }
    }
}

impl RenderConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("AR_TASK_SIZE") {
            if let Ok(size) = val.parse() {
                config.task_size = size;
            }
        }

        if let Ok(val) = std::env::var("AR_THREADS") {
            if let Ok(threads) = val.parse() {
                config.threads = threads;
            }
        }

        if let Ok(val) = std::env::var("AR_RECORD_PROGRESS") {
            config.record_progress = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    pub fn with_task_size(mut self, task_size: usize) -> Self {
        self.task_size = task_size;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_progress(mut self, record_progress: bool) -> Self {
        self.record_progress = record_progress;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ArResult<()> {
        if self.task_size == 0 {
            return Err(ArError::ConfigError("task_size must be > 0".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = RenderConfig::default();
        assert_eq!(config.task_size, DEFAULT_TASK_SIZE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_task_size_rejected() {
        let config = RenderConfig::default().with_task_size(0);
        assert!(matches!(config.validate(), Err(ArError::ConfigError(_))));
    }

    #[test]
    fn test_serde_round_trip() {
        let config = RenderConfig::default().with_threads(3).with_progress(true);
        let json = serde_json::to_string(&config).unwrap();
        let back: RenderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
