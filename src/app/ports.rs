//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensor, buttons, LEDs, storage, network, server, power)
//! implement these traits.  The [`AppService`](super::service::AppService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.  Every `tick` entry point takes an injected `now_ms` so tests
//! never read a live clock.

use crate::config::ThermostatConfig;
use crate::control::hysteresis::HeatState;
use crate::error::{ConfigError, ConnectivityError, StorageError};
use crate::web::RouteSet;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain the latest sample.
pub trait SensorPort {
    /// Request one temperature sample in °C.
    /// `None` is the missing sentinel (sensor fault or disconnect).
    fn read_temperature(&mut self) -> Option<f32>;
}

// ───────────────────────────────────────────────────────────────
// Input port (driven adapter: buttons → domain)
// ───────────────────────────────────────────────────────────────

/// Raw button levels, one poll per control tick.
///
/// The buttons are active-low with pull-ups; adapters invert the pin level
/// so `true` always means "held down".  Debouncing happens in the domain
/// (`drivers::button`), not here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputLevels {
    pub up: bool,
    pub down: bool,
    pub mode: bool,
}

pub trait InputPort {
    fn read_levels(&mut self) -> InputLevels;
}

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → LEDs)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the status LEDs.  Purely a renderer of the decision
/// engine's output; carries no control logic.
pub trait IndicatorPort {
    /// Drive the heat/cool LEDs from the current heat state.
    fn show_heat_state(&mut self, state: HeatState);

    /// All indicators off (pre-sleep shutdown).
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ NVS / flash)
// ───────────────────────────────────────────────────────────────

/// Persistent, namespaced key-value storage.
///
/// Write operations MUST be atomic and durable across power loss — the
/// ESP-IDF NVS API guarantees this natively; the in-memory simulation
/// achieves it trivially.  Typed accessors are provided on top of the raw
/// blob interface so callers never hand-roll encodings.
pub trait StoragePort {
    /// Read a value.  Returns the number of bytes written to `buf`.
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write a value atomically.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Delete a key.  Returns `Ok(())` even if the key didn't exist.
    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError>;

    /// Check whether a key exists without reading it.
    fn exists(&self, namespace: &str, key: &str) -> bool;

    // ── Typed helpers (little-endian fixed encodings) ─────────

    fn get_f32(&self, namespace: &str, key: &str, default: f32) -> f32 {
        let mut buf = [0u8; 4];
        match self.read(namespace, key, &mut buf) {
            Ok(4) => f32::from_le_bytes(buf),
            _ => default,
        }
    }

    fn put_f32(&mut self, namespace: &str, key: &str, value: f32) -> Result<(), StorageError> {
        self.write(namespace, key, &value.to_le_bytes())
    }

    fn get_u32(&self, namespace: &str, key: &str, default: u32) -> u32 {
        let mut buf = [0u8; 4];
        match self.read(namespace, key, &mut buf) {
            Ok(4) => u32::from_le_bytes(buf),
            _ => default,
        }
    }

    fn put_u32(&mut self, namespace: &str, key: &str, value: u32) -> Result<(), StorageError> {
        self.write(namespace, key, &value.to_le_bytes())
    }

    fn get_bool(&self, namespace: &str, key: &str, default: bool) -> bool {
        let mut buf = [0u8; 1];
        match self.read(namespace, key, &mut buf) {
            Ok(1) => buf[0] != 0,
            _ => default,
        }
    }

    fn put_bool(&mut self, namespace: &str, key: &str, value: bool) -> Result<(), StorageError> {
        self.write(namespace, key, &[u8::from(value)])
    }

    fn get_str(&self, namespace: &str, key: &str) -> Option<heapless::String<64>> {
        let mut buf = [0u8; 64];
        let len = self.read(namespace, key, &mut buf).ok()?;
        let s = core::str::from_utf8(&buf[..len]).ok()?;
        let mut out = heapless::String::new();
        out.push_str(s).ok()?;
        Some(out)
    }

    fn put_str(&mut self, namespace: &str, key: &str, value: &str) -> Result<(), StorageError> {
        self.write(namespace, key, value.as_bytes())
    }
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists the thermostat configuration.
///
/// Implementations sanitize on load (floor-clamp, never reject) so a
/// corrupt or out-of-range stored config degrades to safe defaults rather
/// than wedging the boot path.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`ThermostatConfig::default()`] if no stored config exists.
    fn load_config(&self) -> Result<ThermostatConfig, ConfigError>;

    /// Persist configuration.  Called on every mutation, before the next
    /// decision cycle observes the new values.
    fn save_config(&mut self, config: &ThermostatConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Connectivity port (driven adapter: domain ↔ Wi-Fi)
// ───────────────────────────────────────────────────────────────

/// Address info reported after the access point comes up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApInfo {
    /// Dotted-quad address clients reach the setup page on.
    pub address: heapless::String<16>,
}

/// Station-mode join and provisioning access point.  Exactly one of the
/// two roles is active at a time; the mode controller owns the switch.
pub trait ConnectivityPort {
    /// Bring up the provisioning access point under the given SSID.
    fn start_access_point(&mut self, ssid: &str) -> Result<ApInfo, ConnectivityError>;

    /// Join the stored network.  Blocks for at most `timeout_secs`; a
    /// timeout is reported as [`ConnectivityError::JoinTimeout`] and is
    /// recovered by the caller (provisioning fallback), never fatal.
    fn join(&mut self, ssid: &str, password: &str, timeout_secs: u32)
        -> Result<(), ConnectivityError>;

    /// Drop the station link or access point, releasing the interface.
    fn disconnect(&mut self);

    fn is_connected(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Request server port (driven adapter: domain ↔ HTTP)
// ───────────────────────────────────────────────────────────────

/// Installs mode-exclusive route tables.  The mode controller guarantees
/// that installing one set tears the other down first — the two sets are
/// never simultaneously active.
pub trait ServerPort {
    fn install_routes(&mut self, set: RouteSet);

    fn teardown(&mut self);

    /// The currently installed route set, if any.
    fn active_set(&self) -> Option<RouteSet>;
}

// ───────────────────────────────────────────────────────────────
// Power port (driven adapter: domain → deep sleep / reset)
// ───────────────────────────────────────────────────────────────

/// Pin level that wakes the device from deep sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeLevel {
    Low,
    High,
}

pub trait PowerPort {
    /// Enter deep sleep until `wake_gpio` reaches `level`.  Irreversible
    /// within the running process: execution resumes at boot.
    fn halt_until_wake(&mut self, wake_gpio: i32, level: WakeLevel);

    /// Software reset.  Used to realize the provisioning → normal
    /// transition after new credentials are persisted.
    fn restart(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log today;
/// a network sink would implement the same trait).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
