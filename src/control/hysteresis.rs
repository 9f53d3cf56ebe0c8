//! Hysteresis (deadband) thermostat decision engine.
//!
//! The single place where heating/cooling truth is computed.  LEDs, the
//! status route, and telemetry are pure renderers of its output.
//!
//! ```text
//!            setpoint - h/2      setpoint      setpoint + h/2
//!  ───────────────┤─────────────────┼─────────────────┤───────────────
//!     HEATING     │             ONTARGET              │    COOLING
//! ```
//!
//! `decide` is a pure function: no side effects, no state retained between
//! calls, identical inputs always yield identical output.

use serde::Serialize;

/// Heat demand derived each cycle from the latest sample and config.
///
/// The `u8` discriminants are a stable wire contract: remote consumers of
/// the status route receive the heat state as this small integer.  Do not
/// reorder the variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(u8)]
pub enum HeatState {
    Cooling = 0,
    OnTarget = 1,
    Heating = 2,
}

impl HeatState {
    /// The wire integer reported to remote consumers.
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cooling => "COOLING",
            Self::OnTarget => "ONTARGET",
            Self::Heating => "HEATING",
        }
    }
}

/// Compute the heat state for the latest sample.
///
/// A missing sample (`None`, sensor fault or disconnect) is fail-safe:
/// the result is `OnTarget` so a broken probe can never drive unbounded
/// heating or cooling.  The deadband is symmetric: half the configured
/// hysteresis on either side of the setpoint, with both boundaries
/// inclusive in the `OnTarget` band.
pub fn decide(sample: Option<f32>, setpoint_c: f32, hysteresis_c: f32) -> HeatState {
    let Some(temperature_c) = sample else {
        return HeatState::OnTarget;
    };

    let half = hysteresis_c / 2.0;
    if temperature_c < setpoint_c - half {
        HeatState::Heating
    } else if temperature_c > setpoint_c + half {
        HeatState::Cooling
    } else {
        HeatState::OnTarget
    }
}
