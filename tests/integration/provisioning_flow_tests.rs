//! Integration tests for the provisioning flow.
//!
//! Covers the boot-mode decision (empty SSID, join success, bounded-join
//! fallback), the credential-save route, and the full long-press →
//! access point → save → restart sequence.

use crate::mock_hw::{LogSink, MemNvs, MockHardware, MockNet, MockServer};

use homestat::app::events::AppEvent;
use homestat::app::ports::{ConnectivityPort, ServerPort};
use homestat::app::service::{AppService, boot_mode};
use homestat::config::{ThermostatConfig, WifiCredentials};
use homestat::fsm::DeviceMode;
use homestat::history::TemperatureHistory;
use homestat::web::{Method, RouteSet, handlers};

fn make_app(initial: DeviceMode) -> (AppService, LogSink) {
    let mut sink = LogSink::new();
    let mut app = AppService::new(
        ThermostatConfig::default(),
        TemperatureHistory::new(),
        initial,
    );
    app.start(0, &mut sink);
    (app, sink)
}

// ── Boot-mode decision ────────────────────────────────────────

#[test]
fn empty_ssid_boots_provisioning_without_join() {
    let mut net = MockNet::new();
    let mut sink = LogSink::new();
    let creds = WifiCredentials::default();

    let mode = boot_mode(&creds, &mut net, 20, &mut sink);

    assert_eq!(mode, DeviceMode::Provisioning);
    assert_eq!(net.join_calls, 0, "no join attempt with the empty sentinel");
}

#[test]
fn successful_join_boots_normal() {
    let mut net = MockNet::new();
    let mut sink = LogSink::new();
    let creds = WifiCredentials::new("HomeNet", "password1").unwrap();

    let mode = boot_mode(&creds, &mut net, 20, &mut sink);

    assert_eq!(mode, DeviceMode::Normal);
    assert_eq!(net.join_calls, 1);
    assert!(net.is_connected());
}

#[test]
fn join_timeout_falls_back_to_provisioning() {
    let mut net = MockNet::new();
    net.fail_joins(1);
    let mut sink = LogSink::new();
    let creds = WifiCredentials::new("HomeNet", "password1").unwrap();

    let mode = boot_mode(&creds, &mut net, 20, &mut sink);

    assert_eq!(mode, DeviceMode::Provisioning);
    assert_eq!(net.join_calls, 1, "single bounded attempt, no retry loop");
    assert_eq!(sink.count(|e| matches!(e, AppEvent::JoinFailed)), 1);
}

// ── Credential save route ─────────────────────────────────────

#[test]
fn save_route_persists_credentials_and_requests_restart() {
    let (mut app, mut sink) = make_app(DeviceMode::Provisioning);
    let mut nvs = MemNvs::new();

    let response = handlers::dispatch(
        RouteSet::Provisioning,
        Method::Post,
        "/save",
        "ssid=My+Home&password=hunter2x",
        &mut app,
        &mut nvs,
        &mut sink,
    );

    assert_eq!(response.status, 200);
    let stored = WifiCredentials::load(&nvs);
    assert_eq!(stored.ssid.as_str(), "My Home");
    assert_eq!(stored.password.as_str(), "hunter2x");
    assert!(app.take_restart_request());
    assert_eq!(sink.count(|e| matches!(e, AppEvent::CredentialsSaved)), 1);

    // The stored credentials gate the next boot into normal mode.
    let mut net = MockNet::new();
    assert_eq!(boot_mode(&stored, &mut net, 20, &mut sink), DeviceMode::Normal);
}

#[test]
fn save_route_rejects_invalid_credentials() {
    let (mut app, mut sink) = make_app(DeviceMode::Provisioning);
    let mut nvs = MemNvs::new();

    let response = handlers::dispatch(
        RouteSet::Provisioning,
        Method::Post,
        "/save",
        "ssid=HomeNet&password=short",
        &mut app,
        &mut nvs,
        &mut sink,
    );

    assert_eq!(response.status, 400);
    assert!(!app.take_restart_request());
    assert!(!WifiCredentials::load(&nvs).is_provisioned());
}

#[test]
fn save_route_accepts_open_network() {
    let (mut app, mut sink) = make_app(DeviceMode::Provisioning);
    let mut nvs = MemNvs::new();

    let response = handlers::dispatch(
        RouteSet::Provisioning,
        Method::Post,
        "/save",
        "ssid=OpenCafe&password=",
        &mut app,
        &mut nvs,
        &mut sink,
    );

    assert_eq!(response.status, 200);
    assert!(WifiCredentials::load(&nvs).is_provisioned());
}

// ── Full long-press → provision → save sequence ───────────────

#[test]
fn full_reprovisioning_flow() {
    let mut sink = LogSink::new();
    let mut app = AppService::new(
        ThermostatConfig::default(),
        TemperatureHistory::new(),
        DeviceMode::Normal,
    );
    let mut hw = MockHardware::new();
    let mut nvs = MemNvs::new();
    let mut server = MockServer::new();
    let mut net = MockNet::new();

    app.start(0, &mut sink);
    app.apply_effects(&mut server, &mut net, "homestat-cafe01");
    assert_eq!(server.active_set(), Some(RouteSet::Normal));

    // Hold the mode button for 10 s of 100 ms polls.
    hw.press(false, false, true);
    let mut now_ms = 0;
    for _ in 0..110 {
        now_ms += 100;
        app.tick(now_ms, &mut hw, &mut nvs, &mut sink);
    }
    app.apply_effects(&mut server, &mut net, "homestat-cafe01");

    assert_eq!(app.mode(), DeviceMode::Provisioning);
    assert_eq!(server.active_set(), Some(RouteSet::Provisioning));
    assert_eq!(net.ap_started, vec!["homestat-cafe01".to_string()]);

    // A client on the setup AP saves credentials.
    let response = handlers::dispatch(
        RouteSet::Provisioning,
        Method::Post,
        "/save",
        "ssid=HomeNet&password=password1",
        &mut app,
        &mut nvs,
        &mut sink,
    );
    assert_eq!(response.status, 200);
    assert!(app.take_restart_request());

    // After the (simulated) reboot, the stored credentials boot normal.
    let creds = WifiCredentials::load(&nvs);
    let mut fresh_net = MockNet::new();
    assert_eq!(
        boot_mode(&creds, &mut fresh_net, 20, &mut sink),
        DeviceMode::Normal
    );
}
