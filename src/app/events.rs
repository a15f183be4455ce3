//! Outbound application events.
//!
//! The state machine emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (serial log, test recorder).

use crate::error::Error;
use crate::fsm::FilterState;
use crate::timers::TimerTag;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The controller has started (carries the loaded duration).
    Started { state: FilterState, duration_ms: u32 },

    /// The machine transitioned between states.
    StateChanged { from: FilterState, to: FilterState },

    /// A short press started a cycle.
    CycleStarted { duration_ms: u32 },

    /// A press during a cycle cancelled it.
    CycleCancelled,

    /// The completion timer fired.
    CycleCompleted,

    /// A Training hold was persisted and is now the cycle duration.
    TrainingSaved { duration_ms: u32 },

    /// A Training hold was not applied.
    TrainingRejected { captured_ms: u64, reason: Error },

    /// The control line was pulsed LOW.
    ActuatorPulsed { pulse_ms: u32 },

    /// A timer fired into a state it was not armed for; forced to Idle.
    FailSafe { state: FilterState, timer: TimerTag },
}
