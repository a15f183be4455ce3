//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ FilterStateMachine / AppService (domain)
//! ```
//!
//! Driven adapters (indicator, actuator, clock, storage, event sinks)
//! implement these traits.  The state machine consumes them via generics,
//! so the domain core never touches hardware directly.  Blocking delays
//! use `embedded_hal::delay::DelayNs` rather than a port of our own.

use log::warn;

use crate::config::DEFAULT_CYCLE_DURATION_MS;
use crate::drivers::color::Color;
use crate::error::PersistenceError;

// ───────────────────────────────────────────────────────────────
// Indicator port (domain → single-pixel LED)
// ───────────────────────────────────────────────────────────────

pub trait IndicatorPort {
    /// Light the pixel and remember `color`.
    fn set_color(&mut self, color: Color);

    /// Dark, keeping the remembered colour.
    fn off(&mut self);

    /// Off if lit, otherwise relight the last colour set.
    fn toggle(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Actuator port (domain → control line)
// ───────────────────────────────────────────────────────────────

pub trait ActuatorPort {
    /// Drive the control line; `true` = HIGH (inactive).  Idempotent.
    fn set(&mut self, high: bool);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic milliseconds since boot.
pub trait MonotonicClock {
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Duration store port (domain ↔ NVS / file)
// ───────────────────────────────────────────────────────────────

/// Durable storage of the one persisted integer.
///
/// Implementors provide the typed [`store`](Self::store) and
/// [`fetch`](Self::fetch); the domain uses the provided
/// [`save`](Self::save) / [`load_or`](Self::load_or) wrappers, which never
/// fail: a failed save reports `false`, a failed load yields the default.
pub trait DurationStore {
    /// Write `duration_ms` (already known to be > 0).
    fn store(&mut self, duration_ms: u32) -> Result<(), PersistenceError>;

    /// Read the stored value.
    fn fetch(&self) -> Result<u32, PersistenceError>;

    /// Persist `duration_ms`.  Zero is rejected without touching the medium.
    fn save(&mut self, duration_ms: u32) -> bool {
        if duration_ms == 0 {
            warn!("Refusing to save non-positive duration");
            return false;
        }
        match self.store(duration_ms) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to save duration {}ms: {}", duration_ms, e);
                false
            }
        }
    }

    /// Stored duration, or `default_ms` when missing or unusable.
    fn load_or(&self, default_ms: u32) -> u32 {
        match self.fetch() {
            Ok(d) if d > 0 => d,
            Ok(_) => default_ms,
            Err(PersistenceError::NotFound) => default_ms,
            Err(e) => {
                warn!("Stored duration unusable ({}), using default", e);
                default_ms
            }
        }
    }

    /// Stored duration, or the built-in default.
    fn load(&self) -> u32 {
        self.load_or(DEFAULT_CYCLE_DURATION_MS)
    }
}
