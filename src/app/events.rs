//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them — today that is the serial log.

use crate::control::hysteresis::HeatState;
use crate::fsm::DeviceMode;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The application service has started (carries the boot mode).
    Started(DeviceMode),

    /// The mode controller switched device modes.
    ModeChanged { from: DeviceMode, to: DeviceMode },

    /// The decision engine's output changed.
    HeatStateChanged { from: HeatState, to: HeatState },

    /// The setpoint was mutated (button edge or remote set) and persisted.
    SetpointChanged(f32),

    /// The hysteresis was mutated (floor-clamped) and persisted.
    HysteresisChanged(f32),

    /// New station credentials were persisted; a restart follows.
    CredentialsSaved,

    /// The bounded station join at boot failed; falling back to provisioning.
    JoinFailed,

    /// The awake timer expired; the deep-sleep excursion begins.
    SleepRequested { awake_secs: u32 },

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone)]
pub struct TelemetryData {
    pub mode: DeviceMode,
    pub heat_state: HeatState,
    pub temperature_c: Option<f32>,
    pub setpoint_c: f32,
    pub hysteresis_c: f32,
    pub history_len: usize,
}
