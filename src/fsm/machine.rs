//! The filter cycle controller.
//!
//! [`FilterStateMachine`] owns the current state, the configured cycle
//! duration, the press session and every timer.  It is driven from one
//! execution context by two kinds of input:
//!
//! - button edges ([`on_edge`](FilterStateMachine::on_edge)), produced by
//!   the button-poll timer via `ButtonMonitor`;
//! - timer firings ([`on_timer`](FilterStateMachine::on_timer)), popped
//!   from its own [`TimerSet`].
//!
//! Every transition cancels the timers of the state being left before any
//! timer of the next state is armed, and every armed timer records the
//! state it belongs to.  A firing into any other state is treated as a
//! broken invariant and resolved by forcing the de-energized Idle state.
//!
//! The stop-to-idle action and the training flash patterns block the
//! context through `DelayNs`.  Nothing is polled while they run, so
//! edges that come and go inside that window are never seen.

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{ActuatorPort, DurationStore, EventSink, IndicatorPort, MonotonicClock};
use crate::config::FilterConfig;
use crate::drivers::button::ButtonEdge;
use crate::drivers::color::{Color, BLUE_LOW, GREEN_LOW, ORANGE_LOW, RED_LOW};
use crate::error::{validate_captured, Error, PersistenceError};
use crate::timers::{Firing, TimerMode, TimerSet, TimerTag};

use super::context::{CycleConfig, PressSession};
use super::FilterState;

pub struct FilterStateMachine<H, S, E> {
    hw: H,
    store: S,
    sink: E,
    config: FilterConfig,
    timers: TimerSet,
    state: FilterState,
    cycle: CycleConfig,
    press: Option<PressSession>,
    /// Set by a cancelling press, cleared at the end of its release.
    canceling: bool,
}

impl<H, S, E> FilterStateMachine<H, S, E>
where
    H: IndicatorPort + ActuatorPort + MonotonicClock + DelayNs,
    S: DurationStore,
    E: EventSink,
{
    /// Build the controller and load the persisted duration.  No hardware
    /// is touched until [`start`](Self::start).
    pub fn new(hw: H, store: S, sink: E, config: FilterConfig) -> Self {
        let loaded = store.load_or(config.default_cycle_ms);
        let cycle = CycleConfig::new(loaded, config.default_cycle_ms);
        Self {
            hw,
            store,
            sink,
            config,
            timers: TimerSet::new(),
            state: FilterState::Idle,
            cycle,
            press: None,
            canceling: false,
        }
    }

    /// Enter Idle: actuator inactive, green, button poll and idle timer armed.
    pub fn start(&mut self) {
        let now = self.hw.now_ms();
        self.hw.set(true);
        self.state = FilterState::Idle;
        self.hw.set_color(GREEN_LOW);
        self.timers.arm(
            TimerTag::ButtonPoll,
            self.config.button_poll_ms,
            TimerMode::Periodic,
            now,
            None,
        );
        self.arm_idle(now);
        info!(
            "Controller started in {} ({}ms cycle)",
            self.state,
            self.cycle.duration_ms()
        );
        self.sink.emit(&AppEvent::Started {
            state: self.state,
            duration_ms: self.cycle.duration_ms(),
        });
    }

    // ── Inputs ───────────────────────────────────────────────

    /// Next due timer at `now_ms`, if any.
    pub fn take_due(&mut self, now_ms: u64) -> Option<Firing> {
        self.timers.take_due(now_ms)
    }

    pub fn on_edge(&mut self, edge: ButtonEdge) {
        match edge {
            ButtonEdge::Press(t) => self.on_press(t),
            ButtonEdge::Release(t) => self.on_release(t),
        }
    }

    pub fn on_press(&mut self, at_ms: u64) {
        self.press = Some(PressSession::new(at_ms));
        if self.canceling {
            debug!("Press at {}ms recorded only (cancel in progress)", at_ms);
            return;
        }
        match self.state {
            FilterState::Idle => {
                self.hw.set_color(BLUE_LOW);
                self.timers.cancel(TimerTag::Idle);
                self.timers.arm(
                    TimerTag::LongPressCheck,
                    self.config.long_press_sample_ms,
                    TimerMode::Periodic,
                    at_ms,
                    Some(FilterState::Idle),
                );
            }
            FilterState::Blinking => {
                self.canceling = true;
                self.timers.cancel(TimerTag::Blink);
                self.timers.cancel(TimerTag::Completion);
                info!("Cycle cancelled by press");
                self.sink.emit(&AppEvent::CycleCancelled);
                self.stop_to_idle();
            }
            FilterState::Training | FilterState::Sleeping => {
                debug!("Press ignored in {}", self.state);
            }
        }
    }

    pub fn on_release(&mut self, at_ms: u64) {
        let held = self.press.take().map(|p| p.held_ms(at_ms));
        self.timers.cancel(TimerTag::LongPressCheck);

        if !self.canceling {
            match (self.state, held) {
                (FilterState::Idle, Some(h)) if h < u64::from(self.config.long_press_ms) => {
                    self.start_cycle(at_ms);
                }
                (FilterState::Idle, Some(h)) => {
                    // Hold crossed the threshold between samples.
                    self.set_state(FilterState::Training);
                    self.finish_training(h);
                }
                (FilterState::Training, h) => self.finish_training(h.unwrap_or(0)),
                (FilterState::Sleeping, Some(h)) if h < u64::from(self.config.long_press_ms) => {
                    self.stop_to_idle();
                }
                (state, _) => debug!("Release ignored in {}", state),
            }
        }
        self.canceling = false;
    }

    pub fn on_timer(&mut self, firing: Firing) {
        if firing.owner.is_some_and(|owner| owner != self.state) {
            self.fail_safe(firing.tag);
            return;
        }
        match firing.tag {
            TimerTag::LongPressCheck => self.check_long_press(),
            TimerTag::Blink => self.hw.toggle(),
            TimerTag::Completion => {
                info!("Cycle completed");
                self.sink.emit(&AppEvent::CycleCompleted);
                self.stop_to_idle();
            }
            TimerTag::Idle => {
                self.hw.off();
                self.set_state(FilterState::Sleeping);
            }
            TimerTag::ButtonPoll => {}
        }
    }

    // ── Accessors ────────────────────────────────────────────

    pub fn state(&self) -> FilterState {
        self.state
    }

    pub fn duration_ms(&self) -> u32 {
        self.cycle.duration_ms()
    }

    pub fn is_canceling(&self) -> bool {
        self.canceling
    }

    pub fn press(&self) -> Option<PressSession> {
        self.press
    }

    pub fn timers(&self) -> &TimerSet {
        &self.timers
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn now_ms(&self) -> u64 {
        self.hw.now_ms()
    }

    pub fn hw(&self) -> &H {
        &self.hw
    }

    pub fn hw_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn sink(&self) -> &E {
        &self.sink
    }

    // ── Transitions ──────────────────────────────────────────

    fn set_state(&mut self, to: FilterState) {
        let from = self.state;
        if from == to {
            return;
        }
        if from == FilterState::Idle {
            self.timers.cancel(TimerTag::Idle);
        }
        info!("FSM transition: {} -> {}", from, to);
        self.state = to;
        self.sink.emit(&AppEvent::StateChanged { from, to });
    }

    fn arm_idle(&mut self, now_ms: u64) {
        self.timers.arm(
            TimerTag::Idle,
            self.config.idle_timeout_ms,
            TimerMode::OneShot,
            now_ms,
            Some(FilterState::Idle),
        );
    }

    fn check_long_press(&mut self) {
        let now = self.hw.now_ms();
        match self.press {
            Some(p) if p.held_ms(now) >= u64::from(self.config.long_press_ms) => {
                self.enter_training(now);
            }
            Some(_) => {}
            None => self.timers.cancel(TimerTag::LongPressCheck),
        }
    }

    fn start_cycle(&mut self, now_ms: u64) {
        self.timers.cancel_scoped();
        self.set_state(FilterState::Blinking);
        self.hw.set_color(GREEN_LOW);
        let duration = self.cycle.duration_ms();
        self.timers.arm(
            TimerTag::Blink,
            self.config.blink_period_ms,
            TimerMode::Periodic,
            now_ms,
            Some(FilterState::Blinking),
        );
        self.timers.arm(
            TimerTag::Completion,
            duration,
            TimerMode::OneShot,
            now_ms,
            Some(FilterState::Blinking),
        );
        info!("Cycle started: {}ms", duration);
        self.sink.emit(&AppEvent::CycleStarted {
            duration_ms: duration,
        });
    }

    fn enter_training(&mut self, now_ms: u64) {
        self.timers.cancel_scoped();
        self.set_state(FilterState::Training);
        self.hw.set_color(BLUE_LOW);
        self.timers.arm(
            TimerTag::Blink,
            self.config.training_blink_period_ms,
            TimerMode::Periodic,
            now_ms,
            Some(FilterState::Training),
        );
    }

    fn finish_training(&mut self, captured_ms: u64) {
        self.timers.cancel_scoped();
        let outcome = validate_captured(captured_ms)
            .map_err(Error::from)
            .and_then(|d| {
                if self.store.save(d) {
                    Ok(d)
                } else {
                    Err(Error::Persistence(PersistenceError::Io))
                }
            });

        match outcome {
            Ok(d) => {
                self.cycle.update(d);
                info!("Training saved: {}ms", d);
                self.sink.emit(&AppEvent::TrainingSaved { duration_ms: d });
                self.flash(ORANGE_LOW, self.config.success_flash_ms);
            }
            Err(reason) => {
                warn!("Training rejected ({}ms): {}", captured_ms, reason);
                self.sink.emit(&AppEvent::TrainingRejected {
                    captured_ms,
                    reason,
                });
                self.flash(RED_LOW, self.config.error_flash_ms);
            }
        }
        self.stop_to_idle();
    }

    /// On/off `flash_count` times; blocks the context.
    fn flash(&mut self, color: Color, period_ms: u32) {
        for _ in 0..self.config.flash_count {
            self.hw.set_color(color);
            self.hw.delay_ms(period_ms);
            self.hw.off();
            self.hw.delay_ms(period_ms);
        }
    }

    /// Pulse the actuator, show red, return to Idle.  Blocks the context
    /// for the pulse plus the red display time.
    fn stop_to_idle(&mut self) {
        self.timers.cancel_scoped();

        let pulse = self.config.actuator_pulse_ms;
        self.hw.set(false);
        self.hw.delay_ms(pulse);
        self.hw.set(true);
        self.sink.emit(&AppEvent::ActuatorPulsed { pulse_ms: pulse });

        self.hw.set_color(RED_LOW);
        self.hw.delay_ms(self.config.red_display_ms);

        self.set_state(FilterState::Idle);
        self.hw.set_color(GREEN_LOW);
        let now = self.hw.now_ms();
        self.arm_idle(now);
    }

    /// A timer fired into a state it was not armed for.
    fn fail_safe(&mut self, tag: TimerTag) {
        let state = self.state;
        warn!(
            "{} timer fired in {}, forcing IDLE",
            tag.name(),
            state
        );
        self.timers.cancel_scoped();
        self.timers.cancel(tag);
        self.hw.set(true);
        self.canceling = false;
        self.set_state(FilterState::Idle);
        self.hw.set_color(GREEN_LOW);
        let now = self.hw.now_ms();
        self.arm_idle(now);
        self.sink.emit(&AppEvent::FailSafe { state, timer: tag });
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
