//! Data owned by the state machine between events.

use crate::config::DEFAULT_CYCLE_DURATION_MS;

// ---------------------------------------------------------------------------
// Press session
// ---------------------------------------------------------------------------

/// Exists only while the button is held; cleared on release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressSession {
    pub start_ms: u64,
}

impl PressSession {
    pub fn new(start_ms: u64) -> Self {
        Self { start_ms }
    }

    /// Hold time at `now_ms`.  Saturates at zero if the clock is behind
    /// the press timestamp.
    pub fn held_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.start_ms)
    }
}

// ---------------------------------------------------------------------------
// Cycle configuration
// ---------------------------------------------------------------------------

/// The configured cycle length.  Always > 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleConfig {
    duration_ms: u32,
}

impl CycleConfig {
    /// Wrap a loaded duration, substituting `fallback_ms` (or the built-in
    /// default if that is also zero) for a zero value.
    pub fn new(duration_ms: u32, fallback_ms: u32) -> Self {
        let duration_ms = match (duration_ms, fallback_ms) {
            (0, 0) => DEFAULT_CYCLE_DURATION_MS,
            (0, f) => f,
            (d, _) => d,
        };
        Self { duration_ms }
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// Replace the duration.  Zero is refused and leaves the value unchanged.
    pub fn update(&mut self, duration_ms: u32) -> bool {
        if duration_ms == 0 {
            return false;
        }
        self.duration_ms = duration_ms;
        true
    }
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_CYCLE_DURATION_MS,
        }
    }
}
