//! Single-pixel RGB status LED driver.
//!
//! Three LEDC PWM channels (CH0-2) drive a common-cathode RGB LED.
//! The driver remembers the last colour that was set, so `toggle()` after
//! `off()` brings back exactly that colour rather than a fixed default.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives three LEDC PWM channels via hw_init.
//! On host/test: tracks state in-memory only.

use crate::drivers::color::{Color, Rgb, GREEN_LOW};
use crate::drivers::hw_init;

pub struct StatusLed {
    /// Last colour set with `set_color`; survives `off()`.
    remembered: Color,
    lit: bool,
    output: Rgb,
}

impl StatusLed {
    pub fn new() -> Self {
        Self {
            remembered: GREEN_LOW,
            lit: false,
            output: (0, 0, 0),
        }
    }

    pub fn set_color(&mut self, color: Color) {
        self.remembered = color;
        self.lit = true;
        self.write(color.scaled());
    }

    pub fn off(&mut self) {
        self.lit = false;
        self.write((0, 0, 0));
    }

    /// Off if lit, otherwise relight the remembered colour.
    pub fn toggle(&mut self) {
        if self.lit {
            self.off();
        } else {
            self.set_color(self.remembered);
        }
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    pub fn remembered(&self) -> Color {
        self.remembered
    }

    /// Scaled components currently on the pins.
    pub fn output(&self) -> Rgb {
        self.output
    }

    fn write(&mut self, (r, g, b): Rgb) {
        hw_init::ledc_set(hw_init::LEDC_CH_LED_R, r);
        hw_init::ledc_set(hw_init::LEDC_CH_LED_G, g);
        hw_init::ledc_set(hw_init::LEDC_CH_LED_B, b);
        self.output = (r, g, b);
    }
}

impl Default for StatusLed {
    fn default() -> Self {
        Self::new()
    }
}
