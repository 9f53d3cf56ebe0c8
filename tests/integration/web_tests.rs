//! Integration tests for the web route sets and the HTTP server adapter.
//!
//! The status snapshot shape (including the integer heat-state wire
//! contract), config updates with the hysteresis floor clamp, and the
//! mode exclusivity of the two route sets.

use crate::mock_hw::{LogSink, MemNvs, MockHardware};

use homestat::adapters::http::HttpServerAdapter;
use homestat::app::ports::{ConfigPort, ServerPort};
use homestat::app::service::AppService;
use homestat::config::ThermostatConfig;
use homestat::fsm::DeviceMode;
use homestat::history::TemperatureHistory;
use homestat::web::{Method, RouteSet, handlers};

fn make_app(initial: DeviceMode) -> (AppService, MockHardware, MemNvs, LogSink) {
    let mut sink = LogSink::new();
    let mut app = AppService::new(
        ThermostatConfig::default(),
        TemperatureHistory::new(),
        initial,
    );
    app.start(0, &mut sink);
    (app, MockHardware::new(), MemNvs::new(), sink)
}

// ── Status route ──────────────────────────────────────────────

#[test]
fn status_reports_snapshot_with_wire_codes() {
    let (mut app, mut hw, mut nvs, mut sink) = make_app(DeviceMode::Normal);

    // Two seconds of cold readings: heating, two history samples.
    hw.temperature = Some(18.5);
    for t in 1..=20 {
        app.tick(t * 100, &mut hw, &mut nvs, &mut sink);
    }

    let response = handlers::dispatch(
        RouteSet::Normal,
        Method::Get,
        "/status",
        "",
        &mut app,
        &mut nvs,
        &mut sink,
    );
    assert_eq!(response.status, 200);
    assert_eq!(response.content_type, "application/json");

    let v: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(v["mode"], "NORMAL");
    assert_eq!(v["heat_state"], 2, "HEATING wire code");
    assert_eq!(v["heat_state_label"], "HEATING");
    assert!((v["setpoint_c"].as_f64().unwrap() - 21.0).abs() < 1e-6);
    assert!((v["hysteresis_c"].as_f64().unwrap() - 0.5).abs() < 1e-6);
    assert!((v["temperature_c"].as_f64().unwrap() - 18.5).abs() < 1e-3);
    let history = v["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|s| (s.as_f64().unwrap() - 18.5).abs() < 1e-3));
}

#[test]
fn status_encodes_missing_sample_as_null() {
    let (mut app, mut hw, mut nvs, mut sink) = make_app(DeviceMode::Normal);

    hw.temperature = None;
    for t in 1..=11 {
        app.tick(t * 100, &mut hw, &mut nvs, &mut sink);
    }

    let response = handlers::dispatch(
        RouteSet::Normal,
        Method::Get,
        "/status",
        "",
        &mut app,
        &mut nvs,
        &mut sink,
    );
    let v: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert!(v["temperature_c"].is_null());
    assert_eq!(v["heat_state"], 1, "missing sample is fail-safe ONTARGET");
    assert!(v["history"].as_array().unwrap().iter().all(|s| s.is_null()));
}

// ── Set route ─────────────────────────────────────────────────

#[test]
fn set_route_updates_and_persists_both_fields() {
    let (mut app, _hw, mut nvs, mut sink) = make_app(DeviceMode::Normal);

    let response = handlers::dispatch(
        RouteSet::Normal,
        Method::Post,
        "/set",
        "setpoint=23.5&hysteresis=1.0",
        &mut app,
        &mut nvs,
        &mut sink,
    );
    assert_eq!(response.status, 200);

    let config = app.current_config();
    assert!((config.setpoint_c - 23.5).abs() < f32::EPSILON);
    assert!((config.hysteresis_c - 1.0).abs() < f32::EPSILON);

    let stored = nvs.load_config().unwrap();
    assert!((stored.setpoint_c - 23.5).abs() < f32::EPSILON);
    assert!((stored.hysteresis_c - 1.0).abs() < f32::EPSILON);
}

#[test]
fn set_route_floor_clamps_hysteresis() {
    let (mut app, _hw, mut nvs, mut sink) = make_app(DeviceMode::Normal);

    let response = handlers::dispatch(
        RouteSet::Normal,
        Method::Post,
        "/set",
        "hysteresis=0.0",
        &mut app,
        &mut nvs,
        &mut sink,
    );
    assert_eq!(response.status, 200, "clamped, not rejected");

    let config = app.current_config();
    assert!((config.hysteresis_c - 0.1).abs() < f32::EPSILON);
    let stored = nvs.load_config().unwrap();
    assert!((stored.hysteresis_c - 0.1).abs() < f32::EPSILON);
}

#[test]
fn set_route_rejects_garbage() {
    let (mut app, _hw, mut nvs, mut sink) = make_app(DeviceMode::Normal);
    let before = app.current_config();

    for args in ["setpoint=warm", "hysteresis=", ""] {
        let response = handlers::dispatch(
            RouteSet::Normal,
            Method::Post,
            "/set",
            args,
            &mut app,
            &mut nvs,
            &mut sink,
        );
        assert_eq!(response.status, 400, "args={args:?}");
    }

    let after = app.current_config();
    assert!((after.setpoint_c - before.setpoint_c).abs() < f32::EPSILON);
    assert_eq!(nvs.config_saves, 0);
}

// ── Route-set exclusivity ─────────────────────────────────────

#[test]
fn routes_outside_the_installed_set_are_unreachable() {
    let (mut app, _hw, mut nvs, mut sink) = make_app(DeviceMode::Normal);

    // Provisioning routes against the normal set.
    let response = handlers::dispatch(
        RouteSet::Normal,
        Method::Post,
        "/save",
        "ssid=Evil&password=password1",
        &mut app,
        &mut nvs,
        &mut sink,
    );
    assert_eq!(response.status, 404);

    // Normal routes against the provisioning set.
    let response = handlers::dispatch(
        RouteSet::Provisioning,
        Method::Get,
        "/status",
        "",
        &mut app,
        &mut nvs,
        &mut sink,
    );
    assert_eq!(response.status, 404);
}

#[test]
fn setup_page_is_served_in_provisioning() {
    let (mut app, _hw, mut nvs, mut sink) = make_app(DeviceMode::Provisioning);

    let response = handlers::dispatch(
        RouteSet::Provisioning,
        Method::Get,
        "/",
        "",
        &mut app,
        &mut nvs,
        &mut sink,
    );
    assert_eq!(response.status, 200);
    assert_eq!(response.content_type, "text/html");
    assert!(response.body.contains("ssid"));
}

// ── Server adapter queue ──────────────────────────────────────

#[test]
fn server_adapter_dispatches_queued_requests() {
    let (mut app, _hw, mut nvs, mut sink) = make_app(DeviceMode::Normal);
    let mut server = HttpServerAdapter::new();
    server.install_routes(RouteSet::Normal);

    assert!(server.enqueue(Method::Post, "/set", "setpoint=24.0"));
    server.poll(&mut app, &mut nvs, &mut sink);

    assert_eq!(server.last_response().unwrap().status, 200);
    assert!((app.current_config().setpoint_c - 24.0).abs() < f32::EPSILON);
}

#[test]
fn server_adapter_404s_cross_set_requests() {
    let (mut app, _hw, mut nvs, mut sink) = make_app(DeviceMode::Provisioning);
    let mut server = HttpServerAdapter::new();
    server.install_routes(RouteSet::Provisioning);

    assert!(server.enqueue(Method::Get, "/status", ""));
    server.poll(&mut app, &mut nvs, &mut sink);

    assert_eq!(server.last_response().unwrap().status, 404);
}
