//! Filter cycle state machine.
//!
//! ```text
//!                 short press
//!   ┌────────┐ ─────────────────▶ ┌──────────┐
//!   │  Idle  │                    │ Blinking │──┐ press / completion
//!   └────────┘ ◀───────────────── └──────────┘  │
//!     │   ▲  ▲       stop-to-idle                │
//!     │   │  └───────────────────────────────────┘
//!     │   │ release (save + flash, stop-to-idle)
//!     │   │          ┌──────────┐
//!     │   └───────── │ Training │ ◀── hold ≥ long-press threshold
//!     │              └──────────┘
//!     │ idle timeout ┌──────────┐
//!     └────────────▶ │ Sleeping │── short release ──▶ stop-to-idle
//!                    └──────────┘
//! ```
//!
//! The machine itself is in [`machine`]; [`context`] holds the small data
//! records it owns (press session, cycle duration).

pub mod context;
pub mod machine;

pub use machine::FilterStateMachine;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Exactly one of these is active at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum FilterState {
    /// Actuator inactive, indicator green, idle timer armed.
    #[default]
    Idle = 0,
    /// Cycle running: green blink until completion or a cancelling press.
    Blinking = 1,
    /// Button held past the long-press threshold; release captures the duration.
    Training = 2,
    /// Indicator dark after the idle timeout.
    Sleeping = 3,
}

impl FilterState {
    pub const COUNT: usize = 4;

    pub const ALL: [FilterState; Self::COUNT] =
        [Self::Idle, Self::Blinking, Self::Training, Self::Sleeping];

    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Blinking => "BLINKING",
            Self::Training => "TRAINING",
            Self::Sleeping => "SLEEPING",
        }
    }
}

impl core::fmt::Display for FilterState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
