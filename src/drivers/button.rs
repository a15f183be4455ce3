//! Polled button edge detector.
//!
//! ## Hardware
//!
//! Active-high momentary switch with pull-down.  There is no interrupt:
//! the line is sampled on the button-poll timer (every 100 ms), and the
//! sampling interval itself is the debounce window.  Bounces shorter
//! than one poll period are never seen.
//!
//! ## Edge detection
//!
//! | Previous | Current | Event          |
//! |----------|---------|----------------|
//! | low      | high    | `Press(t)`     |
//! | high     | low     | `Release(t)`   |
//! | same     | same    | —              |
//!
//! A read error counts as "level unchanged", so the monitor itself never
//! fails.

use embedded_hal::digital::InputPin;
use log::{debug, warn};

/// Edge event emitted after a level change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEdge {
    Press(u64),
    Release(u64),
}

/// One sample of the raw input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub at_ms: u64,
    pub pressed: bool,
}

pub struct ButtonMonitor<P: InputPin> {
    pin: P,
    last_pressed: bool,
    read_faults: u32,
}

impl<P: InputPin> ButtonMonitor<P> {
    /// The line is assumed released at startup; a button held through
    /// boot reports its press on the first poll.
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            last_pressed: false,
            read_faults: 0,
        }
    }

    /// Sample the pin once.  Call from the button-poll timer.
    pub fn poll(&mut self, now_ms: u64) -> Option<ButtonEdge> {
        let pressed = match self.pin.is_high() {
            Ok(level) => level,
            Err(_) => {
                self.read_faults = self.read_faults.saturating_add(1);
                warn!("Button read failed, holding last level");
                self.last_pressed
            }
        };
        self.observe(Sample {
            at_ms: now_ms,
            pressed,
        })
    }

    /// Feed one sample through the edge detector.
    pub fn observe(&mut self, sample: Sample) -> Option<ButtonEdge> {
        if sample.pressed == self.last_pressed {
            return None;
        }
        self.last_pressed = sample.pressed;
        let edge = if sample.pressed {
            ButtonEdge::Press(sample.at_ms)
        } else {
            ButtonEdge::Release(sample.at_ms)
        };
        debug!("Button edge: {:?}", edge);
        Some(edge)
    }

    /// Lazily turn a stream of samples into edges.
    pub fn edges<I>(&mut self, samples: I) -> impl Iterator<Item = ButtonEdge>
    where
        I: IntoIterator<Item = Sample>,
    {
        samples.into_iter().filter_map(move |s| self.observe(s))
    }

    pub fn read_faults(&self) -> u32 {
        self.read_faults
    }
}

/// Fixed-cadence sample sequence over a level function, starting at `start_ms`.
pub fn sample_stream<F>(start_ms: u64, period_ms: u32, mut level_at: F) -> impl Iterator<Item = Sample>
where
    F: FnMut(u64) -> bool,
{
    (0u64..).map(move |n| {
        let at_ms = start_ms + n * u64::from(period_ms);
        Sample {
            at_ms,
            pressed: level_at(at_ms),
        }
    })
}
