//! Ventilation fan controller firmware: main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter         LogObserver       MonotonicClock      │
//! │  (LED + fan + strobe     (MachineObserver) (Clock)             │
//! │   + EspPlatform)                                               │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │     SystemService (event lock) ─▶ Machine (pure FSM)   │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Button ISRs ─▶ edge queue ─▶ ButtonGestures (input loop)      │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use log::{info, warn};

use ventfan::adapters::hardware::HardwareAdapter;
use ventfan::adapters::log_sink::LogObserver;
use ventfan::adapters::platform::EspPlatform;
use ventfan::adapters::time::MonotonicClock;
use ventfan::app::ports::Clock;
use ventfan::app::service::SystemService;
use ventfan::config::DeviceConfig;
use ventfan::drivers::button::{self, ButtonGestures};
use ventfan::drivers::fan::FanDriver;
use ventfan::drivers::hw_init::{self, LedcChannel};
use ventfan::drivers::status_led::StatusLed;
use ventfan::drivers::strobe::StrobeDriver;
use ventfan::events;

/// Board configuration baked in at build time.
const DEVICE_CONFIG_JSON: &str = include_str!("../config/device.json");

/// Input loop period.  Well under the button repeat interval.
const INPUT_POLL_MS: u32 = 10;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("VentFan v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Config ─────────────────────────────────────────────
    let config = match DeviceConfig::from_json(DEVICE_CONFIG_JSON) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Bundled config rejected ({}), using defaults", e);
            DeviceConfig::default()
        }
    };

    // ── 3. Peripherals ────────────────────────────────────────
    hw_init::bring_up()?;

    let hw = HardwareAdapter::new(
        StatusLed::new(
            LedcChannel::new(hw_init::LEDC_CH_LED_R),
            LedcChannel::new(hw_init::LEDC_CH_LED_G),
            LedcChannel::new(hw_init::LEDC_CH_LED_B),
        ),
        FanDriver::new(LedcChannel::new(hw_init::LEDC_CH_FAN)),
        StrobeDriver::new(LedcChannel::new(hw_init::LEDC_CH_STROBE)),
        EspPlatform::new(),
        FreeRtos,
    );

    // ── 4. Service ────────────────────────────────────────────
    let service = SystemService::with_observer(config, hw, LogObserver::new())?;
    let clock = MonotonicClock::new();
    let mut gestures = ButtonGestures::new(config.buttons);

    // Every boot is a power-on: cold start or deep-sleep wake.
    service.request_power_on();
    info!("System ready. Entering input loop.");

    // ── 5. Input loop ─────────────────────────────────────────
    loop {
        let now = clock.now();
        // Catch edges the ISR debounce dropped.
        button::resync_levels(now.as_millis() as u32, hw_init::button_pressed);

        events::drain_edges(|edge| {
            if let Some(event) = gestures.on_edge(edge) {
                service.process_event(event);
            }
        });

        if let Some(event) = gestures.poll(now) {
            service.process_event(event);
        }

        service.with_hardware(|hw| hw.tick_strobe(now));

        FreeRtos::delay_ms(INPUT_POLL_MS);
    }
}
