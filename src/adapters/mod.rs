//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements          | Connects to                  |
//! |------------|---------------------|------------------------------|
//! | `hardware` | IndicatorPort       | RGB LED on LEDC CH0-2        |
//! |            | ActuatorPort        | control line GPIO            |
//! |            | DelayNs, Clock      | FreeRTOS delay, esp_timer    |
//! | `log_sink` | EventSink           | Serial log output            |
//! | `settings` | DurationStore       | NVS / in-memory, text file   |
//! | `time`     | MonotonicClock      | ESP32 system timer           |

pub mod hardware;
pub mod log_sink;
pub mod settings;
pub mod time;
