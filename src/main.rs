//! Filter Timer Firmware — Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter         LogEventSink    NvsDurationStore      │
//! │  (Indicator+Actuator     (EventSink)     (DurationStore)       │
//! │   +Delay+Clock)                                                │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │   AppService: ButtonMonitor · FilterStateMachine       │    │
//! │  │               TimerSet (one execution context)         │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{ensure, Result};
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{PinDriver, Pull};
use esp_idf_hal::peripherals::Peripherals;
use log::info;

use filtertimer::adapters::hardware::HardwareAdapter;
use filtertimer::adapters::log_sink::LogEventSink;
use filtertimer::adapters::settings::NvsDurationStore;
use filtertimer::app::service::AppService;
use filtertimer::config::FilterConfig;
use filtertimer::{drivers, pins};

/// Sleep between service passes.  Well under the 100 ms button poll.
const SERVICE_INTERVAL_MS: u32 = 10;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  FilterTimer v{}                  ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Peripherals ────────────────────────────────────────
    drivers::hw_init::init_peripherals()?;

    // Typed pin fields must match `pins::BUTTON_GPIO` / `pins::CONTROL_GPIO`.
    let peripherals = Peripherals::take()?;
    let mut button = PinDriver::input(peripherals.pins.gpio16)?;
    button.set_pull(Pull::Down)?;
    let control = PinDriver::output(peripherals.pins.gpio3)?;
    ensure!(
        button.pin() == pins::BUTTON_GPIO && control.pin() == pins::CONTROL_GPIO,
        "pin table out of sync: button=GPIO{} control=GPIO{}",
        button.pin(),
        control.pin()
    );
    info!(
        "Pins: button=GPIO{} control=GPIO{} led=GPIO{}/{}/{}",
        button.pin(),
        control.pin(),
        pins::LED_R_GPIO,
        pins::LED_G_GPIO,
        pins::LED_B_GPIO
    );

    let hw = HardwareAdapter::new(control, FreeRtos);

    // ── 3. Configuration ──────────────────────────────────────
    let config = FilterConfig::default();
    config.validate()?;

    let store = NvsDurationStore::new()?;
    let mut app = AppService::new(button, hw, store, LogEventSink::new(), config);
    let duration_ms = app.machine().duration_ms();
    info!(
        "Loaded configuration: {}ms ({:.1} seconds)",
        duration_ms,
        duration_ms as f32 / 1000.0
    );

    // ── 4. Service loop ───────────────────────────────────────
    app.start();

    info!("System ready. Entering service loop.");
    loop {
        app.service();
        FreeRtos::delay_ms(SERVICE_INTERVAL_MS);
    }
}
