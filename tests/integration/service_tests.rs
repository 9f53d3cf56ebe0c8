//! Integration tests for the AppService control cycle.
//!
//! These drive `tick()` with injected time and mock ports, covering the
//! fixed per-iteration sequence (inputs → decision → mode/sleep →
//! sampling), button behaviour, the mode switch, and the sleep trigger.

use crate::mock_hw::{LogSink, MemNvs, MockHardware, MockNet, MockServer};

use homestat::app::events::AppEvent;
use homestat::app::ports::{ConfigPort, ConnectivityPort, IndicatorPort, PowerPort, ServerPort, WakeLevel};
use homestat::app::service::AppService;
use homestat::pins;
use homestat::power::PowerManager;
use homestat::config::ThermostatConfig;
use homestat::control::hysteresis::HeatState;
use homestat::fsm::DeviceMode;
use homestat::history::TemperatureHistory;
use homestat::web::RouteSet;

const TICK_MS: u64 = 100;

struct Rig {
    app: AppService,
    hw: MockHardware,
    nvs: MemNvs,
    sink: LogSink,
    now_ms: u64,
}

impl Rig {
    fn new(initial: DeviceMode) -> Self {
        let mut rig = Self {
            app: AppService::new(
                ThermostatConfig::default(),
                TemperatureHistory::new(),
                initial,
            ),
            hw: MockHardware::new(),
            nvs: MemNvs::new(),
            sink: LogSink::new(),
            now_ms: 0,
        };
        rig.app.start(0, &mut rig.sink);
        rig
    }

    /// Advance one control tick (100 ms).
    fn step(&mut self) {
        self.now_ms += TICK_MS;
        self.app
            .tick(self.now_ms, &mut self.hw, &mut self.nvs, &mut self.sink);
    }

    /// Advance whole seconds of ticks.
    fn run_secs(&mut self, secs: u64) {
        for _ in 0..(secs * 1000 / TICK_MS) {
            self.step();
        }
    }
}

// ── Sampling and decision ─────────────────────────────────────

#[test]
fn sampling_runs_on_the_one_second_cadence() {
    let mut rig = Rig::new(DeviceMode::Normal);
    rig.hw.temperature = Some(22.0);

    rig.run_secs(5);
    // First sample fires on the first tick (t=100 ms), then once per
    // second: t = 100, 1100, 2100, 3100, 4100.
    assert_eq!(rig.app.history().len(), 5);
    let all: Vec<_> = rig.app.history().read_ordered().collect();
    assert!(all.iter().all(|s| *s == Some(22.0)));
}

#[test]
fn decision_follows_the_sampled_temperature() {
    let mut rig = Rig::new(DeviceMode::Normal);

    // Default setpoint 21.0, deadband 0.5.  Well below band: heating.
    rig.hw.temperature = Some(19.0);
    rig.run_secs(2);
    assert_eq!(rig.app.heat_state(), HeatState::Heating);
    assert_eq!(rig.hw.last_shown(), Some(HeatState::Heating));

    // Well above band: cooling.
    rig.hw.temperature = Some(23.0);
    rig.run_secs(2);
    assert_eq!(rig.app.heat_state(), HeatState::Cooling);
    assert_eq!(rig.hw.last_shown(), Some(HeatState::Cooling));

    // Inside the band: on target.
    rig.hw.temperature = Some(21.1);
    rig.run_secs(2);
    assert_eq!(rig.app.heat_state(), HeatState::OnTarget);
}

#[test]
fn missing_sample_forces_on_target() {
    let mut rig = Rig::new(DeviceMode::Normal);

    rig.hw.temperature = Some(15.0);
    rig.run_secs(2);
    assert_eq!(rig.app.heat_state(), HeatState::Heating);

    // Sensor disconnects: fail-safe back to on-target, and the missing
    // sample lands in the history as the sentinel.
    rig.hw.temperature = None;
    rig.run_secs(2);
    assert_eq!(rig.app.heat_state(), HeatState::OnTarget);
    assert_eq!(rig.app.history().read_ordered().last(), Some(None));
}

#[test]
fn heat_state_change_emits_one_event() {
    let mut rig = Rig::new(DeviceMode::Normal);
    rig.hw.temperature = Some(19.0);
    rig.run_secs(3);

    let changes = rig
        .sink
        .count(|e| matches!(e, AppEvent::HeatStateChanged { .. }));
    assert_eq!(changes, 1, "steady heating must not re-emit");
}

#[test]
fn no_sampling_in_provisioning() {
    let mut rig = Rig::new(DeviceMode::Provisioning);
    rig.hw.temperature = Some(22.0);
    rig.run_secs(10);
    assert!(rig.app.history().is_empty());
    assert_eq!(rig.hw.sensor_reads, 0);
    assert_eq!(rig.app.heat_state(), HeatState::OnTarget);
}

// ── Buttons ───────────────────────────────────────────────────

#[test]
fn up_button_adjusts_setpoint_and_persists() {
    let mut rig = Rig::new(DeviceMode::Normal);

    rig.hw.press(true, false, false);
    rig.step();
    rig.hw.release_all();
    rig.step();

    let config = rig.app.current_config();
    assert!((config.setpoint_c - 21.5).abs() < f32::EPSILON);
    assert_eq!(rig.nvs.config_saves, 1, "mutation persisted immediately");
    // The persisted copy matches the live one.
    let stored = rig.nvs.load_config().unwrap();
    assert!((stored.setpoint_c - 21.5).abs() < f32::EPSILON);
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::SetpointChanged(_))),
        1
    );
}

#[test]
fn held_button_fires_once() {
    let mut rig = Rig::new(DeviceMode::Normal);

    rig.hw.press(false, true, false);
    rig.run_secs(3); // held for 3 s of polls
    rig.hw.release_all();
    rig.step();

    let config = rig.app.current_config();
    assert!((config.setpoint_c - 20.5).abs() < f32::EPSILON);
    assert_eq!(rig.nvs.config_saves, 1);
}

#[test]
fn both_adjust_buttons_fire_in_the_same_poll() {
    let mut rig = Rig::new(DeviceMode::Normal);

    rig.hw.press(true, true, false);
    rig.step();

    // +0.5 and -0.5 in one iteration: net zero, two persisted mutations.
    let config = rig.app.current_config();
    assert!((config.setpoint_c - 21.0).abs() < f32::EPSILON);
    assert_eq!(rig.nvs.config_saves, 2);
}

#[test]
fn adjust_buttons_are_inert_in_provisioning() {
    let mut rig = Rig::new(DeviceMode::Provisioning);

    rig.hw.press(true, false, false);
    rig.run_secs(1);
    rig.hw.release_all();
    rig.step();

    let config = rig.app.current_config();
    assert!((config.setpoint_c - 21.0).abs() < f32::EPSILON);
    assert_eq!(rig.nvs.config_saves, 0);
}

// ── Mode switch (long press) ──────────────────────────────────

#[test]
fn long_press_switches_to_provisioning() {
    let mut rig = Rig::new(DeviceMode::Normal);

    rig.hw.press(false, false, true);
    rig.run_secs(11); // hold past the 10 s threshold

    assert_eq!(rig.app.mode(), DeviceMode::Provisioning);
    assert_eq!(
        rig.sink.count(|e| matches!(
            e,
            AppEvent::ModeChanged {
                from: DeviceMode::Normal,
                to: DeviceMode::Provisioning,
            }
        )),
        1,
        "exactly one transition per continuous hold"
    );
}

#[test]
fn short_hold_does_not_switch() {
    let mut rig = Rig::new(DeviceMode::Normal);

    rig.hw.press(false, false, true);
    rig.run_secs(9); // released just before the threshold
    rig.hw.release_all();
    rig.run_secs(2);

    assert_eq!(rig.app.mode(), DeviceMode::Normal);
}

#[test]
fn mode_switch_swaps_route_set_and_starts_ap() {
    let mut rig = Rig::new(DeviceMode::Normal);
    let mut server = MockServer::new();
    let mut net = MockNet::new();

    rig.app.apply_effects(&mut server, &mut net, "homestat-test");
    assert_eq!(server.active_set(), Some(RouteSet::Normal));

    rig.hw.press(false, false, true);
    rig.run_secs(11);
    rig.app.apply_effects(&mut server, &mut net, "homestat-test");

    assert_eq!(server.active_set(), Some(RouteSet::Provisioning));
    assert_eq!(server.installs, vec![RouteSet::Normal, RouteSet::Provisioning]);
    assert_eq!(net.ap_started, vec!["homestat-test".to_string()]);
    assert_eq!(net.disconnects, 1, "station link dropped before the AP");
}

// ── Sleep scheduling ──────────────────────────────────────────

#[test]
fn sleep_requested_after_awake_duration() {
    let mut rig = Rig::new(DeviceMode::Normal);

    rig.run_secs(59);
    assert!(!rig.app.take_sleep_request());

    rig.run_secs(2);
    assert!(rig.app.take_sleep_request());
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, AppEvent::SleepRequested { awake_secs: 60 })),
        1
    );
    // Consumed: not raised again.
    rig.step();
    assert!(!rig.app.take_sleep_request());
}

#[test]
fn provisioning_never_auto_sleeps() {
    let mut rig = Rig::new(DeviceMode::Provisioning);
    rig.run_secs(300);
    assert!(!rig.app.take_sleep_request());
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::SleepRequested { .. })), 0);
}

#[test]
fn sleep_sequence_releases_everything_before_the_halt() {
    let mut rig = Rig::new(DeviceMode::Normal);
    let mut server = MockServer::new();
    let mut net = MockNet::new();
    let mut power = PowerManager::new();

    net.join("HomeNet", "password1", 20).unwrap();
    rig.app.apply_effects(&mut server, &mut net, "homestat-test");
    rig.run_secs(61);
    assert!(rig.app.take_sleep_request());

    // What the service loop does with the request.
    server.teardown();
    net.disconnect();
    rig.hw.all_off();
    power.halt_until_wake(pins::BUTTON_MODE_GPIO, WakeLevel::Low);

    assert!(server.active_set().is_none());
    assert_eq!(server.teardowns, 1);
    assert!(!net.is_connected());
    assert_eq!(rig.hw.all_off_calls, 1);
    assert_eq!(
        power.last_halt(),
        Some((pins::BUTTON_MODE_GPIO, WakeLevel::Low)),
        "wake armed on the mode button's active-low level"
    );
}

#[test]
fn switching_to_provisioning_cancels_pending_sleep() {
    let mut rig = Rig::new(DeviceMode::Normal);

    // Hold the mode button from t=30 s; the switch lands at ~40 s,
    // before the 60 s awake window expires.
    rig.run_secs(30);
    rig.hw.press(false, false, true);
    rig.run_secs(11);
    rig.hw.release_all();
    assert_eq!(rig.app.mode(), DeviceMode::Provisioning);

    rig.run_secs(120);
    assert!(!rig.app.take_sleep_request());
}
