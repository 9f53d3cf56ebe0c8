//! Shared mutable context threaded through every mode handler.
//!
//! `ModeContext` is the single struct that mode handlers read from and
//! write to.  It contains the latest temperature sample, the derived heat
//! state, configuration, the latched input signals, and the side-effect
//! block the service applies through its ports after each tick.  Think of
//! it as the "blackboard" in a blackboard architecture — the mode handlers
//! themselves never touch a port directly.

use crate::config::ThermostatConfig;
use crate::control::hysteresis::HeatState;
use crate::web::RouteSet;

// ---------------------------------------------------------------------------
// Side effects (written by mode handlers; applied by the service)
// ---------------------------------------------------------------------------

/// Port actions requested by the enter/exit handlers of a transition.
///
/// The service drains this block after every tick and applies it in a
/// fixed order: drop the station link, start the access point, then swap
/// the route table (tearing the previous set down first).  Keeping the
/// effects as plain data is what guarantees the two route sets are never
/// simultaneously active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeEffects {
    /// Install this route set after tearing down the active one.
    pub install_routes: Option<RouteSet>,
    /// Bring up the provisioning access point.
    pub start_access_point: bool,
    /// Release the station link (and any serving on it).
    pub drop_station_link: bool,
}

impl ModeEffects {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ---------------------------------------------------------------------------
// ModeContext
// ---------------------------------------------------------------------------

/// The shared context passed to every mode handler function.
pub struct ModeContext {
    // -- Timing --
    /// Ticks elapsed since the current mode was entered.
    pub ticks_in_mode: u64,
    /// Monotonic total tick count.
    pub total_ticks: u64,
    /// Duration of one tick in seconds (inverse of control loop frequency).
    pub tick_period_secs: f32,

    // -- Thermostat state --
    /// Latest temperature sample (`None` = missing / sensor fault).
    /// Refreshed on the sampling cadence while in normal mode; cleared in
    /// provisioning so the decision engine stays fail-safe there.
    pub latest_sample: Option<f32>,
    /// Decision engine output for `latest_sample`, recomputed every cycle.
    pub heat_state: HeatState,

    // -- Configuration --
    /// Live configuration (mutations are persisted by the service).
    pub config: ThermostatConfig,

    // -- Input signals (latched by the service before the tick) --
    /// The mode button completed a 10 s hold this cycle.  Consumed by the
    /// normal-mode update handler; at most one transition per hold.
    pub long_press_pending: bool,

    // -- Side effects --
    /// Port actions raised by handlers, drained by the service.
    pub effects: ModeEffects,
}

impl ModeContext {
    /// Create a new context with the given configuration.
    pub fn new(config: ThermostatConfig) -> Self {
        Self {
            ticks_in_mode: 0,
            total_ticks: 0,
            tick_period_secs: config.control_tick_interval_ms as f32 / 1000.0,
            latest_sample: None,
            heat_state: HeatState::OnTarget,
            config,
            long_press_pending: false,
            effects: ModeEffects::default(),
        }
    }

    /// Seconds elapsed since the current mode was entered.
    pub fn secs_in_mode(&self) -> f32 {
        self.ticks_in_mode as f32 * self.tick_period_secs
    }

    /// Drain the pending side effects, leaving the block empty.
    pub fn take_effects(&mut self) -> ModeEffects {
        core::mem::take(&mut self.effects)
    }
}
