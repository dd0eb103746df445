//! Progress accounting for aggregation runs.
//!
//! Leaf tasks add the number of glyphs they processed to one shared atomic
//! counter; `percent()` may be polled from any thread while a run is in
//! flight.

use std::sync::atomic::{AtomicU64, Ordering};

/// Returned by `percent()` when recording is disabled.
pub const PROGRESS_DISABLED: f64 = -1.0;

/// Thread-safe glyph counter with a disabled (no-op) mode.
#[derive(Debug)]
pub struct ProgressRecorder {
    enabled: bool,
    count: AtomicU64,
    expected: AtomicU64,
}

impl ProgressRecorder {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            count: AtomicU64::new(0),
            expected: AtomicU64::new(1),
        }
    }

    /// Recorder that ignores updates and reports the sentinel.
    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn counter() -> Self {
        Self::new(true)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Start a new run expecting `expected` glyphs.
    pub fn reset(&self, expected: u64) {
        if !self.enabled {
            return;
        }
        self.count.store(0, Ordering::SeqCst);
        self.expected.store(expected, Ordering::SeqCst);
    }

    /// Record `delta` more glyphs processed.
    #[inline]
    pub fn update(&self, delta: u64) {
        if self.enabled {
            self.count.fetch_add(delta, Ordering::Relaxed);
        }
    }

    /// Glyphs processed so far in the current run, `None` when disabled.
    pub fn count(&self) -> Option<u64> {
        self.enabled.then(|| self.count.load(Ordering::Relaxed))
    }

    /// Fraction of the current run completed, in `[0, 1]`, or
    /// [`PROGRESS_DISABLED`]. A run over zero glyphs reports 1.
    pub fn percent(&self) -> f64 {
        if !self.enabled {
            return PROGRESS_DISABLED;
        }
        let expected = self.expected.load(Ordering::SeqCst);
        if expected == 0 {
            return 1.0;
        }
        let count = self.count.load(Ordering::Relaxed);
        (count as f64 / expected as f64).min(1.0)
    }
}

impl Default for ProgressRecorder {
    fn default() -> Self {
        Self::disabled()
    }
}
