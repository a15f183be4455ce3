//! Mock hardware for integration tests.
//!
//! Records every indicator, actuator and delay call against a simulated
//! clock so tests can assert on the full command history (with
//! timestamps) without touching real GPIO/PWM registers.  Delays advance
//! the shared clock, which is how the blocking stop-to-idle window shows
//! up in the timeline.

#![allow(dead_code)]

use std::cell::Cell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin};
use filtertimer::app::events::AppEvent;
use filtertimer::app::ports::{
    ActuatorPort, DurationStore, EventSink, IndicatorPort, MonotonicClock,
};
use filtertimer::app::service::AppService;
use filtertimer::config::FilterConfig;
use filtertimer::drivers::color::Color;
use filtertimer::error::PersistenceError;
use filtertimer::fsm::{FilterState, FilterStateMachine};

// ── Hardware call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum HwCall {
    SetColor(Color),
    Off,
    Toggle,
    Line(bool),
    Delay(u32),
}

// ── MockHw ────────────────────────────────────────────────────

pub struct MockHw {
    pub clock: Rc<Cell<u64>>,
    /// `(timestamp, call)` in issue order.
    pub calls: Vec<(u64, HwCall)>,
    pub line_high: bool,
    pub lit: Option<Color>,
    remembered: Option<Color>,
}

impl MockHw {
    pub fn new(clock: Rc<Cell<u64>>) -> Self {
        Self {
            clock,
            calls: Vec::new(),
            line_high: false,
            lit: None,
            remembered: None,
        }
    }

    fn record(&mut self, call: HwCall) {
        self.calls.push((self.clock.get(), call));
    }

    pub fn last_color(&self) -> Option<Color> {
        self.calls.iter().rev().find_map(|(_, c)| match c {
            HwCall::SetColor(color) => Some(*color),
            _ => None,
        })
    }

    pub fn count(&self, call: &HwCall) -> usize {
        self.calls.iter().filter(|(_, c)| c == call).count()
    }

    /// Timestamps of every control line write at `level`.
    pub fn line_writes(&self, level: bool) -> Vec<u64> {
        self.calls
            .iter()
            .filter(|(_, c)| *c == HwCall::Line(level))
            .map(|(t, _)| *t)
            .collect()
    }

    /// Calls issued at or after `t`.
    pub fn calls_since(&self, t: u64) -> Vec<HwCall> {
        self.calls
            .iter()
            .filter(|(at, _)| *at >= t)
            .map(|(_, c)| c.clone())
            .collect()
    }
}

impl IndicatorPort for MockHw {
    fn set_color(&mut self, color: Color) {
        self.record(HwCall::SetColor(color));
        self.lit = Some(color);
        self.remembered = Some(color);
    }

    fn off(&mut self) {
        self.record(HwCall::Off);
        self.lit = None;
    }

    fn toggle(&mut self) {
        self.record(HwCall::Toggle);
        self.lit = match self.lit {
            Some(_) => None,
            None => self.remembered,
        };
    }
}

impl ActuatorPort for MockHw {
    fn set(&mut self, high: bool) {
        self.record(HwCall::Line(high));
        self.line_high = high;
    }
}

impl MonotonicClock for MockHw {
    fn now_ms(&self) -> u64 {
        self.clock.get()
    }
}

impl DelayNs for MockHw {
    fn delay_ns(&mut self, ns: u32) {
        self.clock.set(self.clock.get() + u64::from(ns) / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.record(HwCall::Delay(ms));
        self.clock.set(self.clock.get() + u64::from(ms));
    }
}

// ── MockButton ────────────────────────────────────────────────

/// Active-high button whose level the test sets directly.
pub struct MockButton(pub Rc<Cell<bool>>);

impl ErrorType for MockButton {
    type Error = Infallible;
}

impl InputPin for MockButton {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.0.get())
    }
}

// ── MemStore ──────────────────────────────────────────────────

#[derive(Default)]
pub struct MemStore {
    pub value: Option<u32>,
    pub fail_writes: bool,
    pub writes: u32,
}

impl MemStore {
    pub fn holding(value: u32) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }
}

impl DurationStore for MemStore {
    fn store(&mut self, duration_ms: u32) -> Result<(), PersistenceError> {
        self.writes += 1;
        if self.fail_writes {
            return Err(PersistenceError::Io);
        }
        self.value = Some(duration_ms);
        Ok(())
    }

    fn fetch(&self) -> Result<u32, PersistenceError> {
        self.value.ok_or(PersistenceError::NotFound)
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl RecordingSink {
    pub fn transitions(&self) -> Vec<(FilterState, FilterState)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::StateChanged { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Rig: service + shared clock + button ─────────────────────

pub type Machine = FilterStateMachine<MockHw, MemStore, RecordingSink>;

/// Service step of the simulated main loop.
pub const STEP_MS: u64 = 10;

pub struct Rig {
    pub app: AppService<MockButton, MockHw, MemStore, RecordingSink>,
    pub clock: Rc<Cell<u64>>,
    pub button: Rc<Cell<bool>>,
}

impl Rig {
    pub fn new() -> Self {
        Self::with_store(MemStore::default())
    }

    /// Started rig at t = 0 using `store`.
    pub fn with_store(store: MemStore) -> Self {
        let clock = Rc::new(Cell::new(0));
        let button = Rc::new(Cell::new(false));
        let mut app = AppService::new(
            MockButton(button.clone()),
            MockHw::new(clock.clone()),
            store,
            RecordingSink::default(),
            FilterConfig::default(),
        );
        app.start();
        Self { app, clock, button }
    }

    pub fn now(&self) -> u64 {
        self.clock.get()
    }

    /// Step the main loop until the clock reaches `t`.  Blocking handlers
    /// may carry the clock past `t`.
    pub fn run_until(&mut self, t: u64) {
        while self.clock.get() < t {
            let next = (self.clock.get() + STEP_MS).min(t);
            self.clock.set(next);
            self.app.service();
        }
    }

    pub fn run_for(&mut self, ms: u64) {
        let t = self.now() + ms;
        self.run_until(t);
    }

    pub fn hold(&self) {
        self.button.set(true);
    }

    pub fn release(&self) {
        self.button.set(false);
    }

    pub fn state(&self) -> FilterState {
        self.app.state()
    }

    pub fn machine(&self) -> &Machine {
        self.app.machine()
    }

    pub fn hw(&self) -> &MockHw {
        self.app.machine().hw()
    }

    pub fn store(&self) -> &MemStore {
        self.app.machine().store()
    }

    pub fn events(&self) -> &[AppEvent] {
        &self.app.machine().sink().events
    }
}
