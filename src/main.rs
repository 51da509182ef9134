//! SoftBloom Firmware: Main Entry Point
//!
//! Hexagonal architecture with a fixed-rate tick loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogEventSink   EmbeddedConfig  Esp32Time    │
//! │  (Sensor+Actuator) (EventSink)    (ConfigPort)    (ClockPort)  │
//! │  LedRing           ChaChaSource   UartConsole                  │
//! │  (LedPort)         (Uniform)      (commands)                   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  ModeMachine · Orchestrator · Regulators               │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::rmt::TxRmtDriver;
use esp_idf_hal::rmt::config::TransmitConfig;
use log::info;

use softbloom::adapters::config_source::EmbeddedConfig;
use softbloom::adapters::console::UartConsole;
use softbloom::adapters::hardware::HardwareAdapter;
use softbloom::adapters::log_sink::LogEventSink;
use softbloom::adapters::rng::ChaChaSource;
use softbloom::adapters::time::Esp32TimeAdapter;
use softbloom::app::ports::{ActuatorPort, ClockPort};
use softbloom::app::service::AppService;
use softbloom::drivers::led_ring::LedRing;
use softbloom::drivers::hw_init;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  SoftBloom v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Initialise hardware peripherals ────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Peripheral init failure is critical: log and halt.
        log::error!("{}: halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    let peripherals = Peripherals::take()?;
    // RMT channel 0 on pins::LED_RING_DATA_GPIO.
    let rmt = TxRmtDriver::new(
        peripherals.rmt.channel0,
        peripherals.pins.gpio8,
        &TransmitConfig::new().clock_divider(1),
    )?;

    // ── 3. Load config (or defaults) ──────────────────────────
    let config = EmbeddedConfig::new().load_or_default();

    // ── 4. Construct adapters ─────────────────────────────────
    let mut hw = HardwareAdapter::default();
    hw.all_off();
    let mut led = LedRing::new(config.led_brightness_cap, rmt);
    let mut log_sink = LogEventSink::new();
    let mut clock = Esp32TimeAdapter::new();
    let mut console = UartConsole::new();
    let rng = ChaChaSource::from_config(config.rng_seed);

    // ── 5. Construct app service ──────────────────────────────
    let mut app = AppService::new(config, rng);
    app.start(clock.now_ms(), &mut log_sink);
    let tick_ms = app.config().tick_interval_ms;

    info!("System ready. Entering tick loop ({} ms).", tick_ms);

    // ── 6. Tick loop ──────────────────────────────────────────
    loop {
        let started = clock.now_ms();

        if let Some(cmd) = console.poll() {
            app.handle_command(cmd, &mut log_sink);
        }

        app.tick(started, &mut hw, &mut led, &mut log_sink);

        let spent = clock.now_ms().wrapping_sub(started);
        FreeRtos::delay_ms(tick_ms.saturating_sub(spent).max(1));
    }
}
