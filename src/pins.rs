//! GPIO / peripheral pin assignments for the filter timer board.
//!
//! Single source of truth.  Drivers reference this module rather than
//! hard-coding pin numbers; `main` takes the typed `gpioN` fields and
//! checks them against these constants at boot.

// ---------------------------------------------------------------------------
// User button (active-high with internal pull-down)
// ---------------------------------------------------------------------------

/// Momentary push-button: the only user input.
pub const BUTTON_GPIO: i32 = 16;

// ---------------------------------------------------------------------------
// Actuator control line
// ---------------------------------------------------------------------------

/// Digital output to the UV/filter actuator.
/// Idles HIGH (inactive); pulled LOW for one pulse on completion or cancel.
pub const CONTROL_GPIO: i32 = 3;

// ---------------------------------------------------------------------------
// Status LED (single RGB pixel on three LEDC channels)
// ---------------------------------------------------------------------------

pub const LED_R_GPIO: i32 = 11;
pub const LED_G_GPIO: i32 = 12;
pub const LED_B_GPIO: i32 = 13;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// LEDC frequency for RGB status LED (1 kHz).
pub const LED_PWM_FREQ_HZ: u32 = 1_000;
