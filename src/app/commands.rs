//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (button edges,
//! web routes) that the [`AppService`](super::service::AppService)
//! interprets and acts upon.  Every config mutation is persisted before
//! the next decision cycle observes it.

use crate::config::WifiCredentials;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Nudge the setpoint by a delta (±0.5 °C from the adjust buttons).
    AdjustSetpoint(f32),

    /// Set the setpoint to an absolute value (web API).
    SetSetpoint(f32),

    /// Set the hysteresis deadband (web API).  Floor-clamped to 0.1 °C.
    SetHysteresis(f32),

    /// Persist new station credentials and request a restart.  The
    /// provisioning → normal transition is only realized across the
    /// reboot, never in-process.
    SaveCredentials(WifiCredentials),
}
