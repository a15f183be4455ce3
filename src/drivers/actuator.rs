//! Actuator control line driver.
//!
//! The UV/filter actuator is triggered by pulling its control line LOW.
//! The line idles HIGH (inactive), and the controller pulls it LOW for a
//! fixed pulse when a cycle completes or is cancelled.
//!
//! The pin is any `embedded-hal` [`OutputPin`]; write errors are logged
//! and the commanded level is still recorded, since the controller has no
//! better recovery than retrying on the next command.

use embedded_hal::digital::OutputPin;
use log::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineLevel {
    /// Actuator inactive (default).
    High,
    /// Actuator triggered.
    Low,
}

pub struct ControlLine<P: OutputPin> {
    pin: P,
    level: LineLevel,
    write_faults: u32,
}

impl<P: OutputPin> ControlLine<P> {
    /// Take ownership of the pin and drive it to the inactive level.
    pub fn new(pin: P) -> Self {
        let mut line = Self {
            pin,
            level: LineLevel::High,
            write_faults: 0,
        };
        line.drive(true);
        line
    }

    /// Drive the line; `true` = HIGH.  Repeating a level is harmless.
    pub fn set(&mut self, high: bool) {
        self.drive(high);
    }

    pub fn level(&self) -> LineLevel {
        self.level
    }

    pub fn is_active(&self) -> bool {
        self.level == LineLevel::Low
    }

    /// Number of pin writes the HAL rejected.
    pub fn write_faults(&self) -> u32 {
        self.write_faults
    }

    fn drive(&mut self, high: bool) {
        let result = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        if result.is_err() {
            self.write_faults = self.write_faults.saturating_add(1);
            warn!("Control line write failed (high={})", high);
        }
        self.level = if high { LineLevel::High } else { LineLevel::Low };
    }
}
