//! System configuration parameters
//!
//! All tunable parameters for the HomeStat controller, plus the persisted
//! Wi-Fi credentials. Values can be overridden via NVS or the web API.

use serde::{Deserialize, Serialize};

use crate::app::ports::StoragePort;
use crate::error::{ConnectivityError, StorageError};

/// Hard floor for the hysteresis deadband (°C).  Values below this are
/// silently clamped, never rejected — a zero deadband would make the relay
/// chatter on sensor noise.
pub const HYSTERESIS_FLOOR_C: f32 = 0.1;

/// Setpoint change per debounced button press (°C).
pub const SETPOINT_STEP_C: f32 = 0.5;

/// NVS namespace for credentials (encrypted partition on device).
const CRED_NAMESPACE: &str = "auth";
const CRED_KEY: &str = "wifi";

// ---------------------------------------------------------------------------
// Thermostat configuration
// ---------------------------------------------------------------------------

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThermostatConfig {
    // --- Control ---
    /// Target temperature (°C).  No upper clamp is applied.
    pub setpoint_c: f32,
    /// Full width of the deadband around the setpoint (°C, >= 0.1).
    pub hysteresis_c: f32,

    // --- Timing ---
    /// Service loop tick interval (milliseconds)
    pub control_tick_interval_ms: u32,
    /// Temperature sampling / history ingest interval (milliseconds)
    pub sample_interval_ms: u32,
    /// Awake duration before the deep-sleep request fires (seconds)
    pub awake_duration_secs: u32,
    /// Bounded station-join timeout at boot (seconds)
    pub join_timeout_secs: u32,
    /// Telemetry report interval (seconds)
    pub telemetry_interval_secs: u32,
}

impl Default for ThermostatConfig {
    fn default() -> Self {
        Self {
            // Control
            setpoint_c: 21.0,
            hysteresis_c: 0.5,

            // Timing
            control_tick_interval_ms: 100, // 10 Hz
            sample_interval_ms: 1000,      // 1 Hz
            awake_duration_secs: 60,
            join_timeout_secs: 20,
            telemetry_interval_secs: 60,
        }
    }
}

impl ThermostatConfig {
    /// Set the target temperature.  Returns `true` if the value changed.
    pub fn set_setpoint(&mut self, setpoint_c: f32) -> bool {
        if !setpoint_c.is_finite() {
            return false;
        }
        if (self.setpoint_c - setpoint_c).abs() > f32::EPSILON {
            self.setpoint_c = setpoint_c;
            true
        } else {
            false
        }
    }

    /// Set the hysteresis deadband, floor-clamping to [`HYSTERESIS_FLOOR_C`].
    /// Returns `true` if the stored value changed.
    pub fn set_hysteresis(&mut self, hysteresis_c: f32) -> bool {
        // f32::max treats NaN as "the other operand", so a NaN request
        // collapses to the floor as well.
        let clamped = hysteresis_c.max(HYSTERESIS_FLOOR_C);
        if (self.hysteresis_c - clamped).abs() > f32::EPSILON {
            self.hysteresis_c = clamped;
            true
        } else {
            false
        }
    }

    /// Repair any out-of-range values after a load from storage.
    pub fn sanitize(&mut self) {
        if !self.setpoint_c.is_finite() {
            self.setpoint_c = Self::default().setpoint_c;
        }
        if self.hysteresis_c.is_nan() || self.hysteresis_c < HYSTERESIS_FLOOR_C {
            self.hysteresis_c = Self::default().hysteresis_c;
        }
        if self.control_tick_interval_ms == 0 {
            self.control_tick_interval_ms = Self::default().control_tick_interval_ms;
        }
        if self.sample_interval_ms == 0 {
            self.sample_interval_ms = Self::default().sample_interval_ms;
        }
    }
}

// ---------------------------------------------------------------------------
// Wi-Fi credentials
// ---------------------------------------------------------------------------

/// Persisted station credentials.  An empty `ssid` is the sentinel for
/// "unprovisioned" and forces provisioning mode at boot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiCredentials {
    pub ssid: heapless::String<32>,
    pub password: heapless::String<64>,
}

impl WifiCredentials {
    pub fn new(ssid: &str, password: &str) -> Option<Self> {
        let mut creds = Self::default();
        creds.ssid.push_str(ssid).ok()?;
        creds.password.push_str(password).ok()?;
        Some(creds)
    }

    /// Validate and construct credentials: SSID 1-32 printable ASCII
    /// bytes; password empty (open network) or 8-64 bytes.
    pub fn validated(ssid: &str, password: &str) -> Result<Self, ConnectivityError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        Self::new(ssid, password).ok_or(ConnectivityError::InvalidSsid)
    }

    /// `false` while the unprovisioned sentinel (empty SSID) is stored.
    pub fn is_provisioned(&self) -> bool {
        !self.ssid.is_empty()
    }

    /// Load credentials from the auth namespace.  Absent or corrupt blobs
    /// yield the unprovisioned sentinel — corruption here is recovered by
    /// re-provisioning, never by a crash.
    pub fn load(storage: &dyn StoragePort) -> Self {
        let mut buf = [0u8; 128];
        match storage.read(CRED_NAMESPACE, CRED_KEY, &mut buf) {
            Ok(len) => match postcard::from_bytes::<Self>(&buf[..len]) {
                Ok(creds) => creds,
                Err(_) => {
                    log::warn!("credentials blob corrupt, treating as unprovisioned");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Persist credentials to the auth namespace.
    pub fn save(&self, storage: &mut dyn StoragePort) -> Result<(), StorageError> {
        let bytes = postcard::to_allocvec(self).map_err(|_| StorageError::IoError)?;
        storage.write(CRED_NAMESPACE, CRED_KEY, &bytes)
    }
}

// ---------------------------------------------------------------------------
// Credential validation
// ---------------------------------------------------------------------------

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

pub fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 {
        return Err(ConnectivityError::InvalidSsid);
    }
    if !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}
