//! Application service — the single execution context.
//!
//! [`AppService`] owns the [`ButtonMonitor`] and the
//! [`FilterStateMachine`].  Each call to [`service`](AppService::service)
//! drains every timer due at the current clock reading: the button-poll
//! timer samples the pin and feeds any edge to the machine, every other
//! tag goes to [`FilterStateMachine::on_timer`].  Handlers never run
//! concurrently, and the clock is re-read after each one so time spent
//! blocked inside a handler is observed by the next.
//!
//! ```text
//!  InputPin ──▶ ButtonMonitor ──edge──▶ ┌────────────────────┐ ──▶ EventSink
//!                     ▲                 │ FilterStateMachine │
//!         ButtonPoll ─┘   other tags ──▶│  TimerSet · State  │──▶ Indicator / Actuator
//!                                       └────────────────────┘ ◀─▶ DurationStore
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use log::info;

use crate::config::FilterConfig;
use crate::drivers::button::ButtonMonitor;
use crate::fsm::{FilterState, FilterStateMachine};
use crate::timers::TimerTag;

use super::ports::{ActuatorPort, DurationStore, EventSink, IndicatorPort, MonotonicClock};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

pub struct AppService<P: InputPin, H, S, E> {
    button: ButtonMonitor<P>,
    fsm: FilterStateMachine<H, S, E>,
}

impl<P, H, S, E> AppService<P, H, S, E>
where
    P: InputPin,
    H: IndicatorPort + ActuatorPort + MonotonicClock + DelayNs,
    S: DurationStore,
    E: EventSink,
{
    /// Does **not** touch hardware — call [`start`](Self::start) next.
    pub fn new(button: P, hw: H, store: S, sink: E, config: FilterConfig) -> Self {
        Self {
            button: ButtonMonitor::new(button),
            fsm: FilterStateMachine::new(hw, store, sink, config),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self) {
        self.fsm.start();
        info!("AppService started in {}", self.fsm.state());
    }

    /// Run every handler due now.  Returns the number of firings handled.
    pub fn service(&mut self) -> usize {
        let mut handled = 0;
        loop {
            let now = self.fsm.now_ms();
            let Some(firing) = self.fsm.take_due(now) else {
                break;
            };
            handled += 1;
            match firing.tag {
                TimerTag::ButtonPoll => {
                    if let Some(edge) = self.button.poll(now) {
                        self.fsm.on_edge(edge);
                    }
                }
                _ => self.fsm.on_timer(firing),
            }
        }
        handled
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn state(&self) -> FilterState {
        self.fsm.state()
    }

    pub fn machine(&self) -> &FilterStateMachine<H, S, E> {
        &self.fsm
    }

    pub fn machine_mut(&mut self) -> &mut FilterStateMachine<H, S, E> {
        &mut self.fsm
    }

    pub fn button(&self) -> &ButtonMonitor<P> {
        &self.button
    }
}
