//! HomeStat Firmware — Main Entry Point
//!
//! Hexagonal architecture around a single cooperative polling loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter      LogEventSink    NvsAdapter    UptimeClock│
//! │  (Sensor+Input+LEDs)  (EventSink)     (Config+NVS)  (clock)    │
//! │  WifiAdapter          HttpServer      PowerManager             │
//! │  (STA / setup AP)     (ServerPort)    (sleep/restart)          │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  ModeMachine · decide() · History · Debounce           │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Boot order matters: the bounded station join (up to 20 s, blocking by
//! design) runs *before* the watchdog subscribes, and everything after
//! that is the 100 ms polling loop.

use anyhow::Result;
use log::{info, warn};

use homestat::adapters::device_id;
use homestat::adapters::hardware::HardwareAdapter;
use homestat::adapters::http::HttpServerAdapter;
use homestat::adapters::log_sink::LogEventSink;
use homestat::adapters::nvs::NvsAdapter;
use homestat::adapters::time::UptimeClock;
use homestat::adapters::wifi::WifiAdapter;
use homestat::app::ports::{
    ConfigPort, ConnectivityPort, IndicatorPort, PowerPort, ServerPort, WakeLevel,
};
use homestat::app::service::{AppService, boot_mode};
use homestat::config::WifiCredentials;
use homestat::drivers::hw_init;
use homestat::drivers::status_led::StatusLeds;
use homestat::drivers::watchdog::Watchdog;
use homestat::history::TemperatureHistory;
use homestat::pins;
use homestat::power::PowerManager;
use homestat::sensors::temperature::TemperatureSensor;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("HomeStat v{} starting", env!("CARGO_PKG_VERSION"));

    // ── 2. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        // In production this triggers the watchdog reset after timeout.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // ── 3. Persistent state ───────────────────────────────────
    let mut nvs = match NvsAdapter::new() {
        Ok(n) => n,
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults and no persistence", e);
            // Continue without NVS — nothing persists this session.
            // On next reboot, NVS should self-heal.
            NvsAdapter::default()
        }
    };
    let config = match nvs.load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("config load failed ({}), using defaults", e);
            homestat::config::ThermostatConfig::default()
        }
    };
    let history = TemperatureHistory::load_or_init(&nvs);
    let credentials = WifiCredentials::load(&nvs);

    // ── 4. Device identity ────────────────────────────────────
    let mac = device_id::read_mac();
    let dev_id = device_id::device_id(&mac);
    let ap_ssid = device_id::ap_ssid(&mac);
    info!("Device ID: {} (setup AP: {})", dev_id, ap_ssid);

    // ── 5. Adapters ───────────────────────────────────────────
    let clock = UptimeClock::new();
    let mut sink = LogEventSink::new();
    let mut wifi = WifiAdapter::new();
    let mut server = HttpServerAdapter::new();
    let mut power = PowerManager::new();
    let mut hw = HardwareAdapter::new(
        TemperatureSensor::new(pins::TEMP_ADC_GPIO),
        StatusLeds::new(),
    );

    // ── 6. Boot mode: empty SSID → provisioning; else one bounded join ──
    let initial = boot_mode(&credentials, &mut wifi, config.join_timeout_secs, &mut sink);

    // Subscribe to the TWDT only after the blocking join is done.
    let watchdog = Watchdog::new();

    // ── 7. Service ────────────────────────────────────────────
    let tick_ms = u64::from(config.control_tick_interval_ms);
    let mut app = AppService::new(config, history, initial);
    app.start(clock.now_ms(), &mut sink);
    app.apply_effects(&mut server, &mut wifi, &ap_ssid);

    info!("System ready. Entering service loop.");

    // ── 8. Service loop ───────────────────────────────────────
    loop {
        std::thread::sleep(std::time::Duration::from_millis(tick_ms));
        let now_ms = clock.now_ms();

        // Inputs → decision → mode/sleep triggers → history sampling.
        app.tick(now_ms, &mut hw, &mut nvs, &mut sink);
        app.apply_effects(&mut server, &mut wifi, &ap_ssid);

        // Drain pending web requests through the installed route set.
        server.poll(&mut app, &mut nvs, &mut sink);

        // Provisioning saved new credentials: restart realizes the
        // provisioning → normal transition.
        if app.take_restart_request() {
            info!("credentials stored, restarting into station mode");
            server.teardown();
            wifi.disconnect();
            power.restart();
        }

        // Awake window expired: release everything and deep-sleep until
        // the mode button is pressed.  Config and history are already
        // durable (persisted on every mutation), so there is nothing to
        // flush here.
        if app.take_sleep_request() {
            server.teardown();
            wifi.disconnect();
            hw.all_off();
            power.halt_until_wake(pins::BUTTON_MODE_GPIO, WakeLevel::Low);
            // Not reached: execution resumes at boot on wake.
        }

        watchdog.feed();
    }
}
