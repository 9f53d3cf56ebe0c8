//! Mock adapters for integration tests.
//!
//! Record every port call so tests can assert on the full interaction
//! history without touching real GPIO, flash, or radio.

use std::collections::HashMap;

use homestat::app::events::AppEvent;
use homestat::app::ports::{
    ApInfo, ConfigPort, ConnectivityPort, EventSink, IndicatorPort, InputLevels, InputPort,
    SensorPort, ServerPort, StoragePort,
};
use homestat::config::ThermostatConfig;
use homestat::control::hysteresis::HeatState;
use homestat::error::{ConfigError, ConnectivityError, StorageError};
use homestat::web::RouteSet;

// ── MockHardware (sensor + buttons + LEDs) ────────────────────

pub struct MockHardware {
    /// Injected sample returned by the next sensor read.
    pub temperature: Option<f32>,
    /// Injected button levels (`true` = held down).
    pub levels: InputLevels,
    /// Every heat state rendered onto the LEDs, in order.
    pub shown: Vec<HeatState>,
    pub all_off_calls: u32,
    pub sensor_reads: u32,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            temperature: Some(21.0),
            levels: InputLevels::default(),
            shown: Vec::new(),
            all_off_calls: 0,
            sensor_reads: 0,
        }
    }

    pub fn last_shown(&self) -> Option<HeatState> {
        self.shown.last().copied()
    }

    pub fn press(&mut self, up: bool, down: bool, mode: bool) {
        self.levels = InputLevels { up, down, mode };
    }

    pub fn release_all(&mut self) {
        self.levels = InputLevels::default();
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_temperature(&mut self) -> Option<f32> {
        self.sensor_reads += 1;
        self.temperature
    }
}

impl InputPort for MockHardware {
    fn read_levels(&mut self) -> InputLevels {
        self.levels
    }
}

impl IndicatorPort for MockHardware {
    fn show_heat_state(&mut self, state: HeatState) {
        self.shown.push(state);
    }

    fn all_off(&mut self) {
        self.all_off_calls += 1;
    }
}

// ── MemNvs (storage + config persistence) ─────────────────────

const CONFIG_NS_KEY: &str = "thermostat::cfg";

pub struct MemNvs {
    store: HashMap<String, Vec<u8>>,
    pub config_saves: u32,
}

#[allow(dead_code)]
impl MemNvs {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
            config_saves: 0,
        }
    }
}

impl Default for MemNvs {
    fn default() -> Self {
        Self::new()
    }
}

impl StoragePort for MemNvs {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        match self.store.get(&format!("{namespace}::{key}")) {
            Some(v) => {
                let n = v.len().min(buf.len());
                buf[..n].copy_from_slice(&v[..n]);
                Ok(n)
            }
            None => Err(StorageError::NotFound),
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        self.store
            .insert(format!("{namespace}::{key}"), data.to_vec());
        Ok(())
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        self.store.remove(&format!("{namespace}::{key}"));
        Ok(())
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        self.store.contains_key(&format!("{namespace}::{key}"))
    }
}

impl ConfigPort for MemNvs {
    fn load_config(&self) -> Result<ThermostatConfig, ConfigError> {
        match self.store.get(CONFIG_NS_KEY) {
            Some(bytes) => {
                let mut cfg: ThermostatConfig =
                    postcard::from_bytes(bytes).map_err(|_| ConfigError::Corrupted)?;
                cfg.sanitize();
                Ok(cfg)
            }
            None => Ok(ThermostatConfig::default()),
        }
    }

    fn save_config(&mut self, config: &ThermostatConfig) -> Result<(), ConfigError> {
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
        self.store.insert(CONFIG_NS_KEY.to_string(), bytes);
        self.config_saves += 1;
        Ok(())
    }
}

// ── MockNet (connectivity) ────────────────────────────────────

pub struct MockNet {
    pub join_calls: u32,
    pub ap_started: Vec<String>,
    pub disconnects: u32,
    fail_joins: u32,
    connected: bool,
}

#[allow(dead_code)]
impl MockNet {
    pub fn new() -> Self {
        Self {
            join_calls: 0,
            ap_started: Vec::new(),
            disconnects: 0,
            fail_joins: 0,
            connected: false,
        }
    }

    pub fn fail_joins(&mut self, count: u32) {
        self.fail_joins = count;
    }
}

impl Default for MockNet {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectivityPort for MockNet {
    fn start_access_point(&mut self, ssid: &str) -> Result<ApInfo, ConnectivityError> {
        self.connected = false;
        self.ap_started.push(ssid.to_string());
        let mut address = heapless::String::new();
        address.push_str("192.168.4.1").unwrap();
        Ok(ApInfo { address })
    }

    fn join(
        &mut self,
        _ssid: &str,
        _password: &str,
        _timeout_secs: u32,
    ) -> Result<(), ConnectivityError> {
        self.join_calls += 1;
        if self.fail_joins > 0 {
            self.fail_joins -= 1;
            return Err(ConnectivityError::JoinTimeout);
        }
        self.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) {
        self.disconnects += 1;
        self.connected = false;
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

// ── MockServer (route table owner) ────────────────────────────

pub struct MockServer {
    active: Option<RouteSet>,
    pub installs: Vec<RouteSet>,
    pub teardowns: u32,
}

#[allow(dead_code)]
impl MockServer {
    pub fn new() -> Self {
        Self {
            active: None,
            installs: Vec::new(),
            teardowns: 0,
        }
    }
}

impl Default for MockServer {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerPort for MockServer {
    fn install_routes(&mut self, set: RouteSet) {
        assert!(
            self.active.is_none(),
            "route sets must never be simultaneously active"
        );
        self.active = Some(set);
        self.installs.push(set);
    }

    fn teardown(&mut self) {
        if self.active.take().is_some() {
            self.teardowns += 1;
        }
    }

    fn active_set(&self) -> Option<RouteSet> {
        self.active
    }
}

// ── LogSink (event recorder) ──────────────────────────────────

pub struct LogSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
