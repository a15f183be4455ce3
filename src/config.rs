//! Timing parameters for the filter cycle timer.
//!
//! Every period and threshold the controller uses lives here.  None of
//! these are persisted: the only runtime-configurable value is the cycle
//! duration, which is trained with the button and stored separately
//! (see [`crate::persist`]).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Cycle duration used when nothing valid is persisted (50 s).
pub const DEFAULT_CYCLE_DURATION_MS: u32 = 50_000;

/// Timing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    // --- Input ---
    /// Button sampling cadence; doubles as the debounce window.
    pub button_poll_ms: u32,
    /// Minimum hold that enters Training (inclusive).
    pub long_press_ms: u32,
    /// Sampling period of the long-press check while the button is held.
    pub long_press_sample_ms: u32,

    // --- Indicator ---
    /// Green blink period while a cycle runs.
    pub blink_period_ms: u32,
    /// Rapid blue blink period in Training.
    pub training_blink_period_ms: u32,
    /// Idle time before the indicator is switched off.
    pub idle_timeout_ms: u32,
    /// Red display time at the end of stop-to-idle.
    pub red_display_ms: u32,
    /// On/off time of each success flash after a saved Training.
    pub success_flash_ms: u32,
    /// On/off time of each error flash.
    pub error_flash_ms: u32,
    /// Number of success / error flashes.
    pub flash_count: u8,

    // --- Actuator ---
    /// Width of the LOW pulse on the control line.
    pub actuator_pulse_ms: u32,

    // --- Cycle ---
    /// Fallback cycle duration.
    pub default_cycle_ms: u32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            // Input
            button_poll_ms: 100,
            long_press_ms: 2000,
            long_press_sample_ms: 100,

            // Indicator
            blink_period_ms: 500,
            training_blink_period_ms: 200,
            idle_timeout_ms: 5000,
            red_display_ms: 1000,
            success_flash_ms: 500,
            error_flash_ms: 250,
            flash_count: 3,

            // Actuator
            actuator_pulse_ms: 250,

            // Cycle
            default_cycle_ms: DEFAULT_CYCLE_DURATION_MS,
        }
    }
}

impl FilterConfig {
    /// Reject parameter sets the controller cannot run with.
    pub fn validate(&self) -> Result<()> {
        let periods = [
            self.button_poll_ms,
            self.long_press_ms,
            self.long_press_sample_ms,
            self.blink_period_ms,
            self.training_blink_period_ms,
            self.idle_timeout_ms,
            self.actuator_pulse_ms,
        ];
        if periods.contains(&0) {
            return Err(Error::Config("timer periods must be non-zero"));
        }
        if self.long_press_sample_ms > self.long_press_ms {
            return Err(Error::Config(
                "long_press_sample_ms must not exceed long_press_ms",
            ));
        }
        if self.default_cycle_ms == 0 {
            return Err(Error::Config("default_cycle_ms must be > 0"));
        }
        Ok(())
    }
}
