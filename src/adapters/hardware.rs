//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the status LED, the actuator control line, a blocking delay and
//! the uptime clock, exposing them through [`IndicatorPort`],
//! [`ActuatorPort`], [`DelayNs`] and [`MonotonicClock`].  The control pin
//! and the delay are any `embedded-hal` implementations (`PinDriver` and
//! `FreeRtos` on target); the LED goes through the LEDC channels set up
//! by `hw_init`, which are no-ops off-target.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::app::ports::{ActuatorPort, IndicatorPort, MonotonicClock};
use crate::drivers::actuator::ControlLine;
use crate::drivers::color::Color;
use crate::drivers::status_led::StatusLed;

use super::time::UptimeClock;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<O: OutputPin, D: DelayNs> {
    led: StatusLed,
    line: ControlLine<O>,
    delay: D,
    clock: UptimeClock,
}

impl<O: OutputPin, D: DelayNs> HardwareAdapter<O, D> {
    /// Takes the control pin and drives it inactive (HIGH) immediately.
    pub fn new(control_pin: O, delay: D) -> Self {
        Self {
            led: StatusLed::new(),
            line: ControlLine::new(control_pin),
            delay,
            clock: UptimeClock::new(),
        }
    }

    pub fn led(&self) -> &StatusLed {
        &self.led
    }

    pub fn line(&self) -> &ControlLine<O> {
        &self.line
    }
}

// ── IndicatorPort implementation ─────────────────────────────

impl<O: OutputPin, D: DelayNs> IndicatorPort for HardwareAdapter<O, D> {
    fn set_color(&mut self, color: Color) {
        self.led.set_color(color);
    }

    fn off(&mut self) {
        self.led.off();
    }

    fn toggle(&mut self) {
        self.led.toggle();
    }
}

// ── ActuatorPort implementation ──────────────────────────────

impl<O: OutputPin, D: DelayNs> ActuatorPort for HardwareAdapter<O, D> {
    fn set(&mut self, high: bool) {
        self.line.set(high);
    }
}

// ── Delay / clock ────────────────────────────────────────────

impl<O: OutputPin, D: DelayNs> DelayNs for HardwareAdapter<O, D> {
    fn delay_ns(&mut self, ns: u32) {
        self.delay.delay_ns(ns);
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

impl<O: OutputPin, D: DelayNs> MonotonicClock for HardwareAdapter<O, D> {
    fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }
}
