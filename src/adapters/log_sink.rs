//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC on target, stderr on host).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { state, duration_ms } => {
                info!("START | state={} | duration={}ms", state, duration_ms);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {} -> {}", from, to);
            }
            AppEvent::CycleStarted { duration_ms } => {
                info!("CYCLE | started, {}ms", duration_ms);
            }
            AppEvent::CycleCancelled => {
                info!("CYCLE | cancelled by press");
            }
            AppEvent::CycleCompleted => {
                info!("CYCLE | completed");
            }
            AppEvent::TrainingSaved { duration_ms } => {
                info!(
                    "TRAIN | saved {}ms ({:.1} seconds)",
                    duration_ms,
                    *duration_ms as f32 / 1000.0
                );
            }
            AppEvent::TrainingRejected {
                captured_ms,
                reason,
            } => {
                warn!("TRAIN | rejected {}ms: {}", captured_ms, reason);
            }
            AppEvent::ActuatorPulsed { pulse_ms } => {
                info!("PULSE | control line LOW for {}ms", pulse_ms);
            }
            AppEvent::FailSafe { state, timer } => {
                warn!(
                    "SAFE | {} timer fired in {}, forced to IDLE",
                    timer.name(),
                    state
                );
            }
        }
    }
}
