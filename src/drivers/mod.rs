//! Button, indicator and actuator drivers, plus peripheral bring-up.

pub mod actuator;
pub mod button;
pub mod color;
pub mod hw_init;
pub mod status_led;
