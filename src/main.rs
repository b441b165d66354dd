//! GasWatch Firmware — Main Entry Point
//!
//! Hexagonal architecture with a single cooperative control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter     LogNotificationSink   Esp32TimeAdapter    │
//! │  (Sensor+Actuator)   (NotificationSink)    (Clock)             │
//! │  WifiAdapter         Channel source/sink ◀──▶ console task     │
//! │  (Connectivity)      (Command+Notification)                    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Lifecycle · Calibration · Detection · Commands        │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::io::BufRead;

use anyhow::Result;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::gpio::{AnyOutputPin, PinDriver};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};
use log::{error, info, warn};

use gaswatch::adapters::channels::{
    ChannelCommandSource, ChannelNotificationSink, INBOX, OUTBOX, deliver_inbound, next_outbound,
};
use gaswatch::adapters::hardware::HardwareAdapter;
use gaswatch::adapters::log_sink::LogNotificationSink;
use gaswatch::adapters::time::Esp32TimeAdapter;
use gaswatch::adapters::wifi::WifiAdapter;
use gaswatch::app::service::{AppService, TickOutcome};
use gaswatch::config::SystemConfig;
use gaswatch::drivers::buzzer::Buzzer;
use gaswatch::drivers::hw_init::{self, ADC1_CH_GAS};
use gaswatch::drivers::watchdog::Watchdog;
use gaswatch::pins;
use gaswatch::sensors::gas::GasSensor;

/// Pause between control-loop iterations. Keeps the idle task fed.
const LOOP_PERIOD_MS: u32 = 10;
/// Time given to the console task to flush the `/reset` acknowledgement.
const RESTART_GRACE_MS: u32 = 500;

// ── Configuration ─────────────────────────────────────────────

fn load_config() -> SystemConfig {
    let Some(json) = option_env!("GASWATCH_CONFIG_JSON") else {
        info!("Config: built-in defaults");
        return SystemConfig::default();
    };
    match SystemConfig::from_json(json) {
        Ok(cfg) => {
            info!("Config: build-time override applied");
            cfg
        }
        Err(e) => {
            warn!("Config: override rejected ({}), using defaults", e);
            SystemConfig::default()
        }
    }
}

// ── Console transport ─────────────────────────────────────────
//
// Stand-in for the chat transport: lines typed on the serial console are
// queued as messages from the authorized sender, and every outbound
// notification is printed back.

fn spawn_console_transport(sender: heapless::String<32>) -> Result<()> {
    std::thread::Builder::new()
        .name("console-rx".into())
        .stack_size(4096)
        .spawn(move || {
            let stdin = std::io::stdin();
            let mut line = String::new();
            loop {
                line.clear();
                match stdin.lock().read_line(&mut line) {
                    Ok(n) if n > 0 => {
                        if !deliver_inbound(&INBOX, &sender, line.trim()) {
                            warn!("Console: inbox full, message dropped");
                        }
                    }
                    _ => FreeRtos::delay_ms(100),
                }
            }
        })?;

    std::thread::Builder::new()
        .name("console-tx".into())
        .stack_size(4096)
        .spawn(|| {
            loop {
                while let Some(msg) = next_outbound(&OUTBOX) {
                    println!("<< {}", msg);
                }
                FreeRtos::delay_ms(50);
            }
        })?;
    Ok(())
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  GasWatch v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = load_config();

    // ── 3. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals().map_err(|e| anyhow::anyhow!("HAL init failed: {e}"))?;

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    // SAFETY: the indicator GPIOs are not claimed anywhere else.
    let alert_led = PinDriver::output(unsafe { AnyOutputPin::new(pins::ALERT_LED_GPIO) })?;
    let status_led = PinDriver::output(unsafe { AnyOutputPin::new(pins::STATUS_LED_GPIO) })?;

    let mut hw = HardwareAdapter::new(
        GasSensor::new(ADC1_CH_GAS),
        alert_led,
        status_led,
        Buzzer::new(config.buzzer_tone_hz),
    );

    // ── 4. Network ────────────────────────────────────────────
    let wifi = BlockingWifi::wrap(
        EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs))?,
        sysloop,
    )?;
    let mut net = WifiAdapter::new(wifi, config.ping_host);
    if let Err(e) = net.set_credentials(
        option_env!("GASWATCH_WIFI_SSID").unwrap_or(""),
        option_env!("GASWATCH_WIFI_PASS").unwrap_or(""),
    ) {
        warn!("WiFi: build-time credentials rejected: {}", e);
    }

    // ── 5. Messaging ──────────────────────────────────────────
    spawn_console_transport(config.authorized_sender.clone())?;
    let mut inbox = ChannelCommandSource::new(&INBOX);
    let mut sink = (LogNotificationSink::new(), ChannelNotificationSink::new(&OUTBOX));

    // ── 6. Boot checks ────────────────────────────────────────
    let clock = Esp32TimeAdapter::new();
    let mut app = AppService::new(config);
    if let Err(e) = app.boot(&clock, &mut hw, &mut net, &mut sink) {
        error!("Boot failed: {}. Halted, power-cycle required", e);
    }

    // Armed after boot; the WiFi join above blocks.
    let mut watchdog = Watchdog::new(app.lifecycle().config().watchdog_timeout_ms);

    info!("System ready. Entering control loop.");

    // ── 7. Control loop ───────────────────────────────────────
    loop {
        match app.tick(&clock, &mut hw, &mut net, &mut inbox, &mut sink) {
            TickOutcome::Continue | TickOutcome::Halted => {}
            TickOutcome::RestartRequested => {
                info!("Restart requested, rebooting");
                FreeRtos::delay_ms(RESTART_GRACE_MS);
                esp_idf_svc::hal::reset::restart();
            }
        }

        watchdog.feed();
        FreeRtos::delay_ms(LOOP_PERIOD_MS);
    }
}
